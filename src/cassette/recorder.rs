//! Records generator calls into a cassette file.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Call, Cassette, Interaction};

/// Where a finished recording went and what it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCassette {
    /// Path of the written YAML file.
    pub path: PathBuf,
    /// Number of recorded interactions.
    pub interactions: usize,
    /// How many of them recorded an error.
    pub failures: usize,
}

/// Accumulates interactions and writes them as a YAML cassette.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Create a recorder that will write to `path` on [`finish`](Self::finish).
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: commit.into(),
            interactions: Vec::new(),
        }
    }

    /// Append one call. Sequence numbers follow insertion order.
    pub fn record(&mut self, call: &Call, input: serde_json::Value, output: serde_json::Value) {
        self.interactions.push(Interaction {
            seq: self.interactions.len() as u64,
            port: call.port.clone(),
            method: call.method.clone(),
            input,
            output,
        });
    }

    #[cfg(test)]
    pub(crate) fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Write the cassette file, creating its directory if needed.
    ///
    /// An empty recording is still written so that a failed first call can
    /// be inspected.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be produced or the file cannot be
    /// written.
    pub fn finish(self) -> Result<RecordedCassette, std::io::Error> {
        let failures = self.interactions.iter().filter(|i| i.is_failure()).count();
        let interactions = self.interactions.len();
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette)
            .map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(RecordedCassette {
            path: self.path,
            interactions,
            failures,
        })
    }
}
