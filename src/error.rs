//! Unified error type for avatar-studio.

use thiserror::Error;

/// Errors that can occur while preparing or running a generation.
#[derive(Debug, Error)]
pub enum StudioError {
    /// The API call succeeded but no candidate carried an inline image.
    #[error("Generation failed: the model returned no image")]
    NoImageReturned,

    /// An API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A local image could not be read or encoded.
    #[error("Unreadable image: {0}")]
    UnreadableImage(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured.
    #[error("No API key for Gemini. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },
}

impl StudioError {
    /// Whether the remote call itself failed (network, auth, quota).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Network(_))
    }

    /// Message shown to the user when an operation fails.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoImageReturned | Self::Api { .. } | Self::Network(_) => {
                "Generation failed. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERIC: &str = "Generation failed. Please try again.";

    #[test]
    fn transport_classification() {
        let api = StudioError::Api {
            status: 429,
            message: "quota".into(),
        };
        assert!(api.is_transport());
        assert!(!StudioError::NoImageReturned.is_transport());
        assert!(!StudioError::UnreadableImage("x".into()).is_transport());
    }

    #[test]
    fn generic_message_for_generation_failures() {
        assert_eq!(StudioError::NoImageReturned.user_message(), GENERIC);
        let api = StudioError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(api.user_message(), GENERIC);
        let bad = StudioError::UnreadableImage("missing.png".into());
        assert!(bad.user_message().contains("missing.png"));
    }
}
