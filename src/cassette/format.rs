//! On-disk cassette format.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session of port interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable cassette name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Interactions in recording order.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One call through a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Sequence number across the whole cassette.
    pub seq: u64,
    /// Port name (e.g., `"image_generator"`).
    pub port: String,
    /// Method name (e.g., `"generate"`).
    pub method: String,
    /// Serialized request.
    pub input: serde_json::Value,
    /// Serialized `{"Ok": ...}` or `{"Err": "..."}` result.
    pub output: serde_json::Value,
}

impl Interaction {
    /// The port/method pair this interaction went through.
    #[must_use]
    pub fn call(&self) -> Call {
        Call {
            port: self.port.clone(),
            method: self.method.clone(),
        }
    }

    /// Whether the recorded result was an error.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.output.get("Err").is_some()
    }
}

/// A port/method pair, used to key interactions.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Call {
    /// Port name.
    pub port: String,
    /// Method name.
    pub method: String,
}

impl Call {
    /// `image_generator::generate`, the only call the studio makes.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            port: "image_generator".into(),
            method: "generate".into(),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.port, self.method)
    }
}
