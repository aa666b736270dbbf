//! File naming, image saving, and format conversion.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::codec;
use crate::error::StudioError;
use crate::params::format_extension;

/// Generate an output filename from a description and format.
///
/// Sanitizes the first 50 characters to kebab-case, appends a unix
/// timestamp, and adds the file extension.
#[must_use]
pub fn auto_filename(description: &str, format: &str) -> String {
    let sanitized = sanitize_for_filename(description, 50);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let ext = format_extension(format);
    format!("{sanitized}-{timestamp}.{ext}")
}

/// Sanitize a string for use in a filename.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true;

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    let trimmed = result.trim_end_matches('-');
    if trimmed.is_empty() {
        "image".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Decode a generated data URL and write it in the requested format.
///
/// Generated data URLs are always labelled PNG, so the real format is
/// sniffed from the bytes.
///
/// # Errors
///
/// Returns an error if the payload cannot be decoded, converted or written.
pub fn save_image(
    data_url: &str,
    target_format: &str,
    output_path: &Path,
) -> Result<(), StudioError> {
    let (declared, bytes) = codec::decode_data_url(data_url)?;
    let mime = image::guess_format(&bytes)
        .map_or(declared, |f| f.to_mime_type().to_string());

    if mime_matches_format(&mime, target_format) {
        std::fs::write(output_path, bytes).map_err(StudioError::Io)
    } else {
        convert_and_save(&bytes, target_format, output_path)
    }
}

fn mime_matches_format(mime: &str, format: &str) -> bool {
    matches!(
        (mime, format),
        ("image/jpeg", "jpeg") | ("image/png", "png") | ("image/webp", "webp")
    )
}

fn convert_and_save(
    data: &[u8],
    target_format: &str,
    output_path: &Path,
) -> Result<(), StudioError> {
    let img = image::load_from_memory(data)
        .map_err(|e| StudioError::ImageConversion(format!("Failed to decode image: {e}")))?;

    let image_format = match target_format {
        "jpeg" => image::ImageFormat::Jpeg,
        "png" => image::ImageFormat::Png,
        "webp" => image::ImageFormat::WebP,
        other => {
            return Err(StudioError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };

    // JPEG has no alpha channel.
    let img = if image_format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(output_path, image_format)
        .map_err(|e| StudioError::ImageConversion(format!("Failed to write {target_format}: {e}")))
}

/// Resolve the output path: use explicit path or auto-generate.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, description: &str, format: &str) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(description, format)),
    }
}

/// Path for the `index`-th (1-based) of `total` images sharing one base path.
#[must_use]
pub fn numbered_path(base: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return base.to_path_buf();
    }
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    match base.extension() {
        Some(ext) => base.with_file_name(format!("{stem}-{index}.{}", ext.to_string_lossy())),
        None => base.with_file_name(format!("{stem}-{index}")),
    }
}
