//! Prompt templates: the avatar compiler and the fixed request instructions.

use crate::avatar::{AvatarConfig, BackgroundMode};
use crate::catalog::{self, BACKGROUND_PRESETS, ROTATION_DIRECTIONS};
use crate::error::StudioError;

/// Background used when the prompt mode has no text.
pub const FALLBACK_BACKGROUND: &str = "Simple studio background";

/// Background clause for upload mode.
pub const UPLOAD_BACKGROUND_INSTRUCTION: &str = "Place the character naturally into the \
    environment of the reference background image provided.";

const LIGHTING: &str = "Lighting: Cinematic professional lighting, high detailed, sharp focus.";

/// Instruction sent with a subject photo and a background photo.
pub const COMPOSITE_INSTRUCTION: &str = "Create a photorealistic composite image. I have provided \
two images. The FIRST image contains a person (the subject). The SECOND image contains the \
background environment. Your task is to generate a new image where the person from the first \
image is placed naturally into the scene of the second image. Maintain the person's facial \
features, clothing, and general pose, but adapt the lighting, shadows, and perspective to \
realistically match the new background environment. Do not crop the person's head.";

const ICON_SUFFIX: &str = "Generate this as a high-quality vector icon, flat design, isolated on \
a pure white background, no shadow, clean edges, professional icon style.";

/// What a modification changes on an existing avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationKind {
    /// Facial expression.
    Expression,
    /// Head or body pose and camera angle.
    Pose,
}

impl ModificationKind {
    /// Wording used inside the instruction.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expression => "expression",
            Self::Pose => "pose/angle",
        }
    }
}

/// The background sentence of an avatar prompt.
///
/// `preset` is the externally drawn preset for random mode; without one the
/// first preset is used.
#[must_use]
pub fn background_clause(config: &AvatarConfig, preset: Option<&str>) -> String {
    match config.background_mode {
        BackgroundMode::Random => {
            format!("Background: {}.", preset.unwrap_or(BACKGROUND_PRESETS[0]))
        }
        BackgroundMode::Prompt => {
            let text = config.background_prompt.trim();
            let text = if text.is_empty() {
                FALLBACK_BACKGROUND
            } else {
                config.background_prompt.as_str()
            };
            format!("Background: {text}.")
        }
        BackgroundMode::Upload => UPLOAD_BACKGROUND_INSTRUCTION.to_string(),
    }
}

/// Render an avatar configuration into the full generation prompt.
#[must_use]
pub fn compile(config: &AvatarConfig, background_preset: Option<&str>) -> String {
    let c = config;
    let lines = [
        format!(
            "{} portrait of a {}, {}, {}.",
            c.art_style, c.gender, c.age, c.ethnicity
        ),
        format!("Body: {}.", c.body_type),
        format!(
            "Appearance: {}, {}, {}, {}, {}, {}.",
            c.skin_tone, c.face_shape, c.eye_shape, c.eye_color, c.nose_shape, c.lip_shape
        ),
        format!("Features: {}.", c.facial_features),
        format!(
            "Hair: {}, {}, {}.",
            c.hair_length, c.hair_color, c.hair_texture
        ),
        format!("Facial Hair: {}.", c.facial_hair),
        format!("Attire: {}.", c.clothing),
        format!("Accessories: {}.", c.accessories),
        format!("Expression: {}.", c.expression),
        format!("Composition: {}.", c.plan),
        background_clause(c, background_preset),
        LIGHTING.to_string(),
    ];
    lines.join("\n")
}

/// Short instruction that changes one aspect of an existing avatar.
#[must_use]
pub fn modification_instruction(kind: ModificationKind, value: &str) -> String {
    let kind = kind.as_str();
    format!(
        "Change the person's {kind} to {value}. Maintain the exact same identity, facial \
         features, ethnicity, age, hair, clothing and background. Only modify the {kind}."
    )
}

/// Pose value and label for an exact-degree rotation.
///
/// # Errors
///
/// Returns an error if the direction is unknown or the degree is not an
/// integer between 0 and 180.
pub fn rotation(direction: &str, degree: &str) -> Result<(String, String), StudioError> {
    let label = catalog::label_of(ROTATION_DIRECTIONS, direction).ok_or_else(|| {
        let valid: Vec<&str> = ROTATION_DIRECTIONS.iter().map(|o| o.value).collect();
        StudioError::InvalidArgument(format!(
            "Unsupported rotation '{direction}'. Valid: {}",
            valid.join(", ")
        ))
    })?;
    let degrees: u16 = degree
        .trim()
        .parse()
        .ok()
        .filter(|d| *d <= 180)
        .ok_or_else(|| {
            StudioError::InvalidArgument(format!("Rotation must be 0-180 degrees, got '{degree}'"))
        })?;
    Ok((
        format!("{direction} exactly by {degrees} degrees"),
        format!("{label} {degrees}°"),
    ))
}

/// Text sent alongside the base image of an avatar modification.
#[must_use]
pub fn modify_request(instruction: &str) -> String {
    format!(
        "Modify the attached image accurately based on this instruction: {instruction}. \
         Maintain the character's identity, facial features, and style perfectly. Only change \
         the specific attribute requested (expression, angle, or pose). Photorealistic, high \
         quality."
    )
}

/// Freeform prompt, optionally steered toward an isolated flat icon.
#[must_use]
pub fn freeform_request(prompt: &str, icon_mode: bool) -> String {
    if icon_mode {
        format!("{prompt}. {ICON_SUFFIX}")
    } else {
        prompt.to_string()
    }
}

/// Text sent alongside the base image of a remix.
#[must_use]
pub fn remix_request(instruction: &str) -> String {
    format!(
        "Edit the image based on this instruction: {instruction}. Be creative but respect the \
         original composition unless asked to change it."
    )
}

/// Reframing instruction for outpainting into a new aspect ratio.
#[must_use]
pub fn outpaint_request(target_ratio: &str, context: &str) -> String {
    let mut text = format!(
        "Reframing and Outpainting Task:\n\
         1. Take the input image and place it intelligently within a new canvas of aspect \
         ratio {target_ratio}.\n\
         2. Expand the scene (outpaint) to fill the new dimensions naturally.\n\
         3. Maintain the original subject, lighting, style, and high quality.\n\
         4. Make the transition between the original and new areas seamless and realistic."
    );
    if !context.is_empty() {
        text.push_str("\nAdditional Context/Instructions: ");
        text.push_str(context);
    }
    text
}
