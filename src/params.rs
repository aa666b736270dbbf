//! Validation of CLI parameters before any request is built.

use crate::catalog::{self, ASPECT_RATIO};

/// Validate that an aspect ratio is one the studio offers.
///
/// # Errors
///
/// Returns an error if the ratio is not recognized.
pub fn validate_aspect_ratio(ratio: &str) -> Result<(), String> {
    if catalog::label_of(ASPECT_RATIO, ratio).is_some() {
        Ok(())
    } else {
        let valid: Vec<&str> = ASPECT_RATIO.iter().map(|o| o.value).collect();
        Err(format!(
            "Unsupported aspect ratio '{ratio}'. Valid: {}",
            valid.join(", ")
        ))
    }
}

/// Validate the output format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), String> {
    match format {
        "jpeg" | "png" | "webp" => Ok(()),
        _ => Err(format!("Unsupported format '{format}'. Valid: png, jpeg, webp")),
    }
}

/// Parse a `key=value` attribute assignment.
///
/// # Errors
///
/// Returns an error if there is no `=`, the key is not a known attribute, or
/// the attribute is the model (which only `--model` chooses).
pub fn parse_assignment(input: &str) -> Result<(catalog::Attribute, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("Expected KEY=VALUE, got '{input}'"))?;
    let attribute: catalog::Attribute = key.trim().parse()?;
    if !attribute.is_assignable() {
        return Err(format!("{attribute} is chosen with --model, not --set"));
    }
    Ok((attribute, value.trim().to_string()))
}

/// Get the file extension for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "jpeg" => "jpg",
        "webp" => "webp",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Attribute;

    #[test]
    fn aspect_ratios_from_catalog() {
        for ratio in ["1:1", "16:9", "9:16", "4:3", "3:4"] {
            assert!(validate_aspect_ratio(ratio).is_ok(), "{ratio}");
        }
        let err = validate_aspect_ratio("21:9").unwrap_err();
        assert!(err.contains("Unsupported aspect ratio"));
        assert!(err.contains("16:9"));
    }

    #[test]
    fn validate_format_values() {
        assert!(validate_format("png").is_ok());
        assert!(validate_format("jpeg").is_ok());
        assert!(validate_format("webp").is_ok());
        assert!(validate_format("gif").is_err());
    }

    #[test]
    fn assignment_parsing() {
        let (attr, value) = parse_assignment("hairColor=Jet Black hair").unwrap();
        assert_eq!(attr, Attribute::HairColor);
        assert_eq!(value, "Jet Black hair");

        let (attr, value) = parse_assignment("gender=").unwrap();
        assert_eq!(attr, Attribute::Gender);
        assert!(value.is_empty());

        assert!(parse_assignment("gender").is_err());
        let err = parse_assignment("wings=two").unwrap_err();
        assert!(err.contains("Unknown attribute"), "{err}");
    }

    #[test]
    fn model_is_not_assignable() {
        let err = parse_assignment("model=nano-banana").unwrap_err();
        assert!(err.contains("--model"), "{err}");
    }

    #[test]
    fn format_extension_mapping() {
        assert_eq!(format_extension("jpeg"), "jpg");
        assert_eq!(format_extension("png"), "png");
        assert_eq!(format_extension("webp"), "webp");
    }
}
