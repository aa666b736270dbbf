//! Image generator port for the multimodal generation API.
//!
//! Requests and responses mirror the `generateContent` wire shape so they can
//! be recorded to and replayed from cassettes verbatim.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::codec::InlineImage;
use crate::error::StudioError;

/// One content part: either text or an inline image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline image content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineImage>,
}

impl Part {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline image part.
    #[must_use]
    pub fn image(image: InlineImage) -> Self {
        Self {
            text: None,
            inline_data: Some(image),
        }
    }
}

/// A request to generate content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// The resolved model identifier (e.g., `"gemini-2.5-flash-image"`).
    pub model: String,
    /// Text and image parts, in order.
    pub parts: Vec<Part>,
    /// Aspect ratio directive (e.g., `"16:9"`), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// Parts in the order the model produced them.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One response candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate content; absent when the candidate was blocked.
    #[serde(default)]
    pub content: Option<Content>,
}

/// Raw response of the generation API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Response candidates; may be empty.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// The base64 payload of the first inline image in the first candidate.
    ///
    /// Later candidates are never inspected.
    #[must_use]
    pub fn first_image(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .map(|inline| inline.data.as_str())
            .find(|data| !data.is_empty())
    }
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerateResponse, StudioError>> + Send + 'a>>;

/// Submits content requests to an external generation API.
pub trait ImageGenerator: Send + Sync {
    /// Submit one request and return the raw response.
    fn generate(&self, request: &GenerateRequest) -> GenerateFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(data: &str) -> Part {
        Part::image(InlineImage {
            mime_type: "image/png".into(),
            data: data.into(),
        })
    }

    fn candidate(parts: Vec<Part>) -> Candidate {
        Candidate {
            content: Some(Content { parts }),
        }
    }

    #[test]
    fn parses_wire_response() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here is your image"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBOR"}}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"totalTokenCount": 12}
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_image(), Some("iVBOR"));
    }

    #[test]
    fn empty_response_has_no_image() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_image().is_none());

        let json = r#"{"candidates":[{}]}"#;
        let blocked: GenerateResponse = serde_json::from_str(json).unwrap();
        assert!(blocked.first_image().is_none());
    }

    #[test]
    fn only_first_candidate_is_scanned() {
        let response = GenerateResponse {
            candidates: vec![
                candidate(vec![Part::text("sorry")]),
                candidate(vec![inline("AAAA")]),
            ],
        };
        assert!(response.first_image().is_none());
    }

    #[test]
    fn skips_empty_inline_data() {
        let parts = vec![inline(""), Part::text("x"), inline("BBBB"), inline("CCCC")];
        let response = GenerateResponse {
            candidates: vec![candidate(parts)],
        };
        assert_eq!(response.first_image(), Some("BBBB"));
    }

    #[test]
    fn part_serializes_in_wire_shape() {
        let json = serde_json::to_value(vec![Part::text("hi"), inline("AAAA")]).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"text": "hi"},
                {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
            ])
        );
    }
}
