//! Conversions between image bytes, base64 payloads and data URLs.

use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::StudioError;

/// Data-URL prefixes recognised on previously produced images.
const DATA_URL_PREFIXES: [&str; 4] = [
    "data:image/png;base64,",
    "data:image/jpeg;base64,",
    "data:image/jpg;base64,",
    "data:image/webp;base64,",
];

/// An image ready to be sent inline: MIME type plus base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    /// MIME type (e.g., `"image/png"`).
    pub mime_type: String,
    /// Base64 payload without any data-URL prefix.
    pub data: String,
}

impl InlineImage {
    /// Wrap a data URL (or bare base64) produced by an earlier generation.
    ///
    /// Generated results are always treated as PNG.
    #[must_use]
    pub fn from_data_url(url: &str) -> Self {
        Self {
            mime_type: "image/png".to_string(),
            data: strip_data_url_prefix(url).to_string(),
        }
    }
}

/// Base64-encode raw image bytes.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Remove a `data:image/...;base64,` prefix, leaving other strings unchanged.
#[must_use]
pub fn strip_data_url_prefix(url: &str) -> &str {
    DATA_URL_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .unwrap_or(url)
}

/// Build a PNG data URL from a base64 payload.
#[must_use]
pub fn to_data_url(data: &str) -> String {
    format!("data:image/png;base64,{data}")
}

/// Read an image file and encode it for inline transport.
///
/// # Errors
///
/// Returns [`StudioError::UnreadableImage`] if the file cannot be read or is
/// not a recognisable image.
pub fn read_image(path: &Path) -> Result<InlineImage, StudioError> {
    let bytes = std::fs::read(path)
        .map_err(|e| StudioError::UnreadableImage(format!("{}: {e}", path.display())))?;
    let format = image::guess_format(&bytes).map_err(|e| {
        StudioError::UnreadableImage(format!("{}: not a supported image ({e})", path.display()))
    })?;
    Ok(InlineImage {
        mime_type: format.to_mime_type().to_string(),
        data: encode(&bytes),
    })
}

/// Decode a data URL into its MIME type and raw bytes.
///
/// Bare base64 without a prefix is treated as PNG.
///
/// # Errors
///
/// Returns [`StudioError::UnreadableImage`] if the payload is not valid base64.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), StudioError> {
    let header = url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"));
    let (mime, payload) = match header {
        Some((mime, payload)) => (mime.to_string(), payload),
        None => ("image/png".to_string(), url),
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| StudioError::UnreadableImage(format!("invalid base64 payload: {e}")))?;
    Ok((mime, bytes))
}
