//! `config.toml`: API key, tool defaults and a default avatar.
//!
//! ```toml
//! [keys]
//! gemini = "..."
//!
//! [defaults]
//! model = "nano-banana"
//! aspect_ratio = "1:1"
//! format = "png"
//!
//! [avatar]
//! bind_ethnicity = true
//!
//! [avatar.attributes]
//! hairColor = "Auburn hair"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::Attribute;

/// Environment variables checked for the Gemini key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Environment variable naming the config file.
const CONFIG_ENV_VAR: &str = "STUDIO_CONFIG";

/// Config location relative to `$HOME`.
const HOME_CONFIG_PATH: &str = ".config/avatar-studio/config.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API keys.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Values used when the matching CLI flag is omitted.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Starting point for `avatar` runs.
    #[serde(default)]
    pub avatar: AvatarDefaults,
}

/// API keys.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Tool-wide defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Model name or alias.
    pub model: String,
    /// Aspect ratio for avatar and photo runs.
    pub aspect_ratio: String,
    /// Output format.
    pub format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "nano-banana".to_string(),
            aspect_ratio: "1:1".to_string(),
            format: "png".to_string(),
        }
    }
}

/// Attribute values applied before any `--set` flag.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AvatarDefaults {
    /// Always align features with the chosen ethnicity.
    pub bind_ethnicity: bool,
    /// Attribute key to catalog value, e.g. `hairColor = "Auburn hair"`.
    pub attributes: BTreeMap<String, String>,
}

impl AvatarDefaults {
    /// The configured attribute values with their keys parsed.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first unknown or reserved attribute key.
    pub fn assignments(&self) -> Result<Vec<(Attribute, &str)>, String> {
        self.attributes
            .iter()
            .map(|(key, value)| {
                let attribute: Attribute = key
                    .parse()
                    .map_err(|e| format!("[avatar.attributes] {e}"))?;
                if !attribute.is_assignable() {
                    return Err(format!(
                        "[avatar.attributes] {attribute} is chosen with [defaults] model"
                    ));
                }
                Ok((attribute, value.as_str()))
            })
            .collect()
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist.
    ///
    /// The path is `explicit` if given, then `$STUDIO_CONFIG`, then
    /// `~/.config/avatar-studio/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn discover(explicit: Option<&str>) -> Result<Self, String> {
        let path = explicit
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .unwrap_or_else(default_config_path);
        tracing::debug!(path = %path.display(), "config file");
        Self::load(&path)
    }

    /// Load configuration from `path`, or return defaults if it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// The Gemini API key: `GEMINI_API_KEY`, then `API_KEY`, then the file.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        self.gemini_key_with(|name| std::env::var(name).ok())
    }

    fn gemini_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.is_empty()))
            .or_else(|| self.keys.gemini.clone())
    }
}

fn default_config_path() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from("avatar-studio.toml"),
        |home| PathBuf::from(home).join(HOME_CONFIG_PATH),
    )
}
