//! Replaying adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::format::Call;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::StudioError;
use crate::ports::image_generator::{GenerateFuture, GenerateRequest, ImageGenerator};

/// Serves recorded generation results from a cassette.
pub struct ReplayingImageGenerator {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageGenerator {
    /// Create a replaying generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageGenerator for ReplayingImageGenerator {
    fn generate(&self, request: &GenerateRequest) -> GenerateFuture<'_> {
        tracing::debug!(model = %request.model, "replaying generate");
        let output = next_output(&self.replayer, &Call::generate());
        Box::pin(async move {
            let output = output.map_err(StudioError::Config)?;
            replay_result(output).map_err(|e| StudioError::Api {
                status: 0,
                message: e.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};

    fn generator(outputs: Vec<serde_json::Value>) -> ReplayingImageGenerator {
        let interactions = outputs
            .into_iter()
            .enumerate()
            .map(|(seq, output)| Interaction {
                seq: seq as u64,
                port: "image_generator".into(),
                method: "generate".into(),
                input: json!({}),
                output,
            })
            .collect();
        let cassette = Cassette {
            name: "t".into(),
            recorded_at: chrono::Utc::now(),
            commit: "c".into(),
            interactions,
        };
        ReplayingImageGenerator::new(Arc::new(Mutex::new(CassetteReplayer::new(cassette))))
    }

    fn request() -> GenerateRequest {
        GenerateRequest {
            model: "gemini-2.5-flash-image".into(),
            parts: Vec::new(),
            aspect_ratio: None,
        }
    }

    #[tokio::test]
    async fn replays_error_as_api_failure_then_exhausts() {
        let generator = generator(vec![json!({"Err": "API error (429): quota"})]);

        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, StudioError::Api { status: 0, .. }));
        assert!(err.is_transport());

        let err = generator.generate(&request()).await.unwrap_err();
        let StudioError::Config(message) = &err else {
            panic!("expected a config error, got {err}");
        };
        assert!(message.contains("Cassette exhausted"), "{message}");
    }
}
