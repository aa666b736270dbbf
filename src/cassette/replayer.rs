//! Replays recorded interactions from a cassette.

use std::collections::HashMap;
use std::path::Path;

use super::format::{Call, Cassette, Interaction};

/// Serves a cassette's interactions in order, one queue per [`Call`].
pub struct CassetteReplayer {
    queues: HashMap<Call, std::vec::IntoIter<Interaction>>,
    totals: HashMap<Call, usize>,
}

impl CassetteReplayer {
    /// Read and parse a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a cassette.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        tracing::debug!(
            name = %cassette.name,
            interactions = cassette.interactions.len(),
            "cassette loaded"
        );
        Ok(Self::new(cassette))
    }

    /// Build a replayer from an already parsed cassette.
    #[must_use]
    pub fn new(cassette: Cassette) -> Self {
        let mut grouped: HashMap<Call, Vec<Interaction>> = HashMap::new();
        for interaction in cassette.interactions {
            grouped
                .entry(interaction.call())
                .or_default()
                .push(interaction);
        }
        let totals = grouped
            .iter()
            .map(|(call, list)| (call.clone(), list.len()))
            .collect();
        let queues = grouped
            .into_iter()
            .map(|(call, list)| (call, list.into_iter()))
            .collect();
        Self { queues, totals }
    }

    /// Take the next interaction recorded for `call`.
    ///
    /// # Errors
    ///
    /// Returns a "Cassette exhausted" error when nothing (more) was recorded
    /// for the call.
    pub fn next_interaction(&mut self, call: &Call) -> Result<Interaction, String> {
        let Some(queue) = self.queues.get_mut(call) else {
            let mut available: Vec<String> = self.queues.keys().map(ToString::to_string).collect();
            available.sort();
            return Err(format!(
                "Cassette exhausted: no interactions recorded for {call}. Available: [{}]",
                available.join(", ")
            ));
        };
        queue.next().ok_or_else(|| {
            format!(
                "Cassette exhausted: all {} interactions for {call} have been consumed.",
                self.totals.get(call).copied().unwrap_or_default()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }
    }

    fn generate(seq: u64, text: &str) -> Interaction {
        Interaction {
            seq,
            port: "image_generator".into(),
            method: "generate".into(),
            input: json!({"parts": [{"text": text}]}),
            output: json!({"Ok": {"candidates": []}}),
        }
    }

    #[test]
    fn serves_in_recording_order_then_exhausts() {
        let recorded = vec![generate(0, "base"), generate(1, "smile")];
        let mut replayer = CassetteReplayer::new(cassette(recorded));
        let call = Call::generate();

        assert_eq!(replayer.next_interaction(&call).unwrap().seq, 0);
        assert_eq!(replayer.next_interaction(&call).unwrap().seq, 1);
        let err = replayer.next_interaction(&call).unwrap_err();
        let expected = "all 2 interactions for image_generator::generate";
        assert!(err.contains(expected), "{err}");
    }

    #[test]
    fn unrecorded_call_lists_what_is_available() {
        let mut replayer = CassetteReplayer::new(cassette(vec![generate(0, "base")]));
        let other = Call {
            port: "uploader".into(),
            method: "put".into(),
        };
        let err = replayer.next_interaction(&other).unwrap_err();
        let expected = "no interactions recorded for uploader::put";
        assert!(err.contains(expected), "{err}");
        assert!(err.contains("[image_generator::generate]"), "{err}");
    }

    #[test]
    fn load_reads_a_written_cassette() {
        let dir = std::env::temp_dir().join("avatar_studio_replayer_load");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("one.cassette.yaml");
        let recorded = cassette(vec![generate(0, "a lighthouse")]);
        std::fs::write(&path, serde_yaml::to_string(&recorded).unwrap()).unwrap();

        let mut replayer = CassetteReplayer::load(&path).unwrap();
        let interaction = replayer.next_interaction(&Call::generate()).unwrap();
        assert_eq!(interaction.input["parts"][0]["text"], "a lighthouse");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_rejects_malformed_and_missing_files() {
        let dir = std::env::temp_dir().join("avatar_studio_replayer_bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.cassette.yaml");
        std::fs::write(&path, "interactions: [not, a").unwrap();

        let err = CassetteReplayer::load(&path).err().unwrap();
        assert!(err.contains("Failed to parse cassette"), "{err}");
        let missing = Path::new("/nonexistent/cassette.yaml");
        let err = CassetteReplayer::load(missing).err().unwrap();
        assert!(err.contains("Failed to read cassette"), "{err}");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
