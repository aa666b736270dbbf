//! Model name resolution and validation.

use crate::catalog::{self, Attribute, MODEL};

/// Short name aliases for the supported image models.
const ALIASES: &[(&str, &str)] = &[
    ("nano-banana", "gemini-2.5-flash-image"),
    ("nano-banana-pro", "gemini-3-pro-image-preview"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    ALIASES
        .iter()
        .find(|&&(alias, _)| alias == name)
        .map_or_else(|| name.to_string(), |&(_, full)| full.to_string())
}

/// Check that a resolved model name is one of the catalog's image models.
///
/// # Errors
///
/// Returns an error listing the accepted models otherwise.
pub fn validate_model(model: &str) -> Result<(), String> {
    if catalog::contains(Attribute::Model, model) {
        return Ok(());
    }
    let valid: Vec<&str> = MODEL.iter().map(|o| o.value).collect();
    Err(format!(
        "Unsupported model '{model}'. Valid: {} (or the aliases nano-banana, nano-banana-pro)",
        valid.join(", ")
    ))
}
