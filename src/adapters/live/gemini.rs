//! Live adapter for the Gemini `generateContent` API.

use reqwest::Client;

use crate::error::StudioError;
use crate::ports::image_generator::{GenerateFuture, GenerateRequest, ImageGenerator};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Live Gemini generator that calls the Google AI API.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
}

impl GeminiGenerator {
    /// Create a new Gemini generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

/// Build the JSON body for a `generateContent` call.
pub(crate) fn request_body(request: &GenerateRequest) -> serde_json::Value {
    let mut generation_config = serde_json::json!({
        "responseModalities": ["IMAGE"],
    });

    if let Some(ref ratio) = request.aspect_ratio {
        generation_config["imageConfig"] = serde_json::json!({ "aspectRatio": ratio });
    }

    serde_json::json!({
        "contents": [{
            "parts": request.parts
        }],
        "generationConfig": generation_config
    })
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, request: &GenerateRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{GEMINI_API_BASE}/{}:generateContent", request.model);
            let body = request_body(&request);

            tracing::debug!(
                model = %request.model,
                parts = request.parts.len(),
                "calling generateContent"
            );

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(StudioError::Api {
                    status: status.as_u16(),
                    message: response_text,
                });
            }

            serde_json::from_str(&response_text).map_err(|e| StudioError::Api {
                status: status.as_u16(),
                message: format!("Failed to parse response: {e}"),
            })
        })
    }
}
