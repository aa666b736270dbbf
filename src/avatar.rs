//! The avatar configuration record and its edits.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::catalog::{self, Attribute};
use crate::error::StudioError;

/// Where the avatar's background comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundMode {
    /// One of the fixed presets, drawn at compile time.
    #[default]
    Random,
    /// The user's free-text description.
    Prompt,
    /// An uploaded reference image.
    Upload,
}

impl BackgroundMode {
    /// Catalog value of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Prompt => "prompt",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackgroundMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "prompt" => Ok(Self::Prompt),
            "upload" => Ok(Self::Upload),
            _ => Err(format!("Unsupported background mode '{s}'. Valid: random, prompt, upload")),
        }
    }
}

/// Every attribute of an avatar. Empty strings mean "unset".
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct AvatarConfig {
    pub model: String,
    pub plan: String,
    pub aspect_ratio: String,
    pub gender: String,
    pub age: String,
    pub ethnicity: String,
    pub skin_tone: String,
    pub body_type: String,
    pub face_shape: String,
    pub eye_shape: String,
    pub eye_color: String,
    pub nose_shape: String,
    pub lip_shape: String,
    pub facial_features: String,
    pub hair_length: String,
    pub hair_color: String,
    pub hair_texture: String,
    pub facial_hair: String,
    pub clothing: String,
    pub accessories: String,
    pub art_style: String,
    pub expression: String,
    pub background_mode: BackgroundMode,
    pub background_prompt: String,
}

/// Neutral facial-features value favoured by [`AvatarConfig::randomize`].
pub const CLEAR_SKIN: &str = "Clear skin";
/// Neutral accessories value favoured by [`AvatarConfig::randomize`].
pub const NO_ACCESSORIES: &str = "No accessories";
/// Art style a randomized avatar starts from.
pub const DEFAULT_ART_STYLE: &str = "Photorealistic 8k";

/// Attributes resampled independently by [`AvatarConfig::randomize`].
const UNIFORM_ATTRIBUTES: [Attribute; 17] = [
    Attribute::Plan,
    Attribute::Gender,
    Attribute::Age,
    Attribute::Ethnicity,
    Attribute::SkinTone,
    Attribute::BodyType,
    Attribute::FaceShape,
    Attribute::EyeShape,
    Attribute::EyeColor,
    Attribute::NoseShape,
    Attribute::LipShape,
    Attribute::HairLength,
    Attribute::HairColor,
    Attribute::HairTexture,
    Attribute::FacialHair,
    Attribute::Clothing,
    Attribute::Expression,
];

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-image".to_string(),
            plan: String::new(),
            aspect_ratio: "1:1".to_string(),
            gender: String::new(),
            age: String::new(),
            ethnicity: String::new(),
            skin_tone: String::new(),
            body_type: String::new(),
            face_shape: String::new(),
            eye_shape: String::new(),
            eye_color: String::new(),
            nose_shape: String::new(),
            lip_shape: String::new(),
            facial_features: String::new(),
            hair_length: String::new(),
            hair_color: String::new(),
            hair_texture: String::new(),
            facial_hair: String::new(),
            clothing: String::new(),
            accessories: String::new(),
            art_style: String::new(),
            expression: String::new(),
            background_mode: BackgroundMode::Random,
            background_prompt: String::new(),
        }
    }
}

impl AvatarConfig {
    /// Read an attribute as its string value.
    #[must_use]
    pub fn get(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::BackgroundMode => self.background_mode.as_str(),
            other => self.text_field(other),
        }
    }

    fn text_field(&self, attribute: Attribute) -> &String {
        match attribute {
            Attribute::Gender => &self.gender,
            Attribute::Age => &self.age,
            Attribute::Ethnicity => &self.ethnicity,
            Attribute::SkinTone => &self.skin_tone,
            Attribute::BodyType => &self.body_type,
            Attribute::FaceShape => &self.face_shape,
            Attribute::EyeShape => &self.eye_shape,
            Attribute::EyeColor => &self.eye_color,
            Attribute::NoseShape => &self.nose_shape,
            Attribute::LipShape => &self.lip_shape,
            Attribute::FacialFeatures => &self.facial_features,
            Attribute::HairLength => &self.hair_length,
            Attribute::HairColor => &self.hair_color,
            Attribute::HairTexture => &self.hair_texture,
            Attribute::FacialHair => &self.facial_hair,
            Attribute::Clothing => &self.clothing,
            Attribute::Accessories => &self.accessories,
            Attribute::ArtStyle => &self.art_style,
            Attribute::Expression => &self.expression,
            Attribute::Plan => &self.plan,
            Attribute::AspectRatio => &self.aspect_ratio,
            Attribute::Model => &self.model,
            Attribute::BackgroundPrompt | Attribute::BackgroundMode => &self.background_prompt,
        }
    }

    fn text_field_mut(&mut self, attribute: Attribute) -> Option<&mut String> {
        let field = match attribute {
            Attribute::Gender => &mut self.gender,
            Attribute::Age => &mut self.age,
            Attribute::Ethnicity => &mut self.ethnicity,
            Attribute::SkinTone => &mut self.skin_tone,
            Attribute::BodyType => &mut self.body_type,
            Attribute::FaceShape => &mut self.face_shape,
            Attribute::EyeShape => &mut self.eye_shape,
            Attribute::EyeColor => &mut self.eye_color,
            Attribute::NoseShape => &mut self.nose_shape,
            Attribute::LipShape => &mut self.lip_shape,
            Attribute::FacialFeatures => &mut self.facial_features,
            Attribute::HairLength => &mut self.hair_length,
            Attribute::HairColor => &mut self.hair_color,
            Attribute::HairTexture => &mut self.hair_texture,
            Attribute::FacialHair => &mut self.facial_hair,
            Attribute::Clothing => &mut self.clothing,
            Attribute::Accessories => &mut self.accessories,
            Attribute::ArtStyle => &mut self.art_style,
            Attribute::Expression => &mut self.expression,
            Attribute::Plan => &mut self.plan,
            Attribute::AspectRatio => &mut self.aspect_ratio,
            Attribute::Model => &mut self.model,
            Attribute::BackgroundPrompt => &mut self.background_prompt,
            Attribute::BackgroundMode => return None,
        };
        Some(field)
    }

    /// Set one attribute, checking it against the catalog.
    ///
    /// An empty value clears the attribute. `backgroundPrompt` accepts any text.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the attribute's option set.
    pub fn set(&mut self, attribute: Attribute, value: &str) -> Result<(), StudioError> {
        if attribute == Attribute::BackgroundMode {
            self.background_mode = value.parse().map_err(StudioError::InvalidArgument)?;
            return Ok(());
        }
        if !attribute.is_free_text() && !value.is_empty() && !catalog::contains(attribute, value) {
            return Err(StudioError::InvalidArgument(format!(
                "'{value}' is not a valid {attribute}. See `avatar-studio options {attribute}`"
            )));
        }
        if let Some(field) = self.text_field_mut(attribute) {
            *field = value.to_string();
        }
        Ok(())
    }

    /// Resample every descriptive attribute.
    ///
    /// Facial features stay "Clear skin" and accessories stay "No accessories"
    /// unless their own draw clears the 0.7 and 0.5 thresholds respectively.
    /// The art style resets to photorealistic and the background to a random preset.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for attribute in UNIFORM_ATTRIBUTES {
            let value = catalog::random_value(attribute, rng);
            if let Some(field) = self.text_field_mut(attribute) {
                *field = value.to_string();
            }
        }

        self.facial_features = if rng.gen::<f64>() > 0.7 {
            catalog::random_value(Attribute::FacialFeatures, rng)
                .to_string()
        } else {
            CLEAR_SKIN.to_string()
        };
        self.accessories = if rng.gen::<f64>() > 0.5 {
            catalog::random_value(Attribute::Accessories, rng)
                .to_string()
        } else {
            NO_ACCESSORIES.to_string()
        };

        self.art_style = DEFAULT_ART_STYLE.to_string();
        self.background_mode = BackgroundMode::Random;
        self.background_prompt.clear();
    }

    /// Pick hair, eye and skin defaults that usually go with the chosen ethnicity.
    ///
    /// Ethnicities without a known pattern are left untouched.
    pub fn bind_features_to_ethnicity(&mut self) {
        if self.ethnicity.contains("Asian") {
            self.hair_color = "Black hair".into();
            self.eye_color = "Dark Brown eyes".into();
            self.hair_texture = "Straight hair".into();
        } else if self.ethnicity.contains("Scandinavian") {
            self.hair_color = "Ash Blonde hair".into();
            self.eye_color = "Blue eyes".into();
            self.skin_tone = "Pale Porcelain skin".into();
        } else if self.ethnicity.contains("African") {
            self.hair_color = "Black hair".into();
            self.eye_color = "Dark Brown eyes".into();
            self.hair_texture = "Coily/Afro hair".into();
            self.skin_tone = "Very Dark/Ebony skin".into();
        }
    }
}
