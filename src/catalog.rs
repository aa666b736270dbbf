//! Static option catalog for avatar attributes, modifications and backgrounds.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

/// One selectable choice: the value used in prompts and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionEntry {
    /// Stable identifier substituted into prompts.
    pub value: &'static str,
    /// Display text.
    pub label: &'static str,
}

const fn entry(value: &'static str, label: &'static str) -> OptionEntry {
    OptionEntry { value, label }
}

/// Configuration keys of an avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Attribute {
    Gender,
    Age,
    Ethnicity,
    SkinTone,
    BodyType,
    FaceShape,
    EyeShape,
    EyeColor,
    NoseShape,
    LipShape,
    FacialFeatures,
    HairLength,
    HairColor,
    HairTexture,
    FacialHair,
    Clothing,
    Accessories,
    ArtStyle,
    Expression,
    Plan,
    AspectRatio,
    Model,
    BackgroundMode,
    BackgroundPrompt,
}

impl Attribute {
    /// Every attribute, in configuration order.
    pub const ALL: [Attribute; 24] = [
        Self::Gender,
        Self::Age,
        Self::Ethnicity,
        Self::SkinTone,
        Self::BodyType,
        Self::FaceShape,
        Self::EyeShape,
        Self::EyeColor,
        Self::NoseShape,
        Self::LipShape,
        Self::FacialFeatures,
        Self::HairLength,
        Self::HairColor,
        Self::HairTexture,
        Self::FacialHair,
        Self::Clothing,
        Self::Accessories,
        Self::ArtStyle,
        Self::Expression,
        Self::Plan,
        Self::AspectRatio,
        Self::Model,
        Self::BackgroundMode,
        Self::BackgroundPrompt,
    ];

    /// The camelCase key used on the command line and in config files.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Age => "age",
            Self::Ethnicity => "ethnicity",
            Self::SkinTone => "skinTone",
            Self::BodyType => "bodyType",
            Self::FaceShape => "faceShape",
            Self::EyeShape => "eyeShape",
            Self::EyeColor => "eyeColor",
            Self::NoseShape => "noseShape",
            Self::LipShape => "lipShape",
            Self::FacialFeatures => "facialFeatures",
            Self::HairLength => "hairLength",
            Self::HairColor => "hairColor",
            Self::HairTexture => "hairTexture",
            Self::FacialHair => "facialHair",
            Self::Clothing => "clothing",
            Self::Accessories => "accessories",
            Self::ArtStyle => "artStyle",
            Self::Expression => "expression",
            Self::Plan => "plan",
            Self::AspectRatio => "aspectRatio",
            Self::Model => "model",
            Self::BackgroundMode => "backgroundMode",
            Self::BackgroundPrompt => "backgroundPrompt",
        }
    }

    /// Whether the attribute takes free text instead of a catalog value.
    #[must_use]
    pub fn is_free_text(self) -> bool {
        self == Self::BackgroundPrompt
    }

    /// Whether `--set` and `[avatar.attributes]` may change the attribute.
    ///
    /// The model is only chosen through `--model` or `[defaults] model`, so
    /// the stored configuration always names the model that is called.
    #[must_use]
    pub fn is_assignable(self) -> bool {
        self != Self::Model
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let keys: Vec<&str> = Self::ALL.iter().map(|a| a.key()).collect();
                format!("Unknown attribute '{s}'. Valid: {}", keys.join(", "))
            })
    }
}

/// Ordered choices for an attribute. Free-text attributes have none.
#[must_use]
pub fn list_options(attribute: Attribute) -> &'static [OptionEntry] {
    match attribute {
        Attribute::Gender => GENDER,
        Attribute::Age => AGE,
        Attribute::Ethnicity => ETHNICITY,
        Attribute::SkinTone => SKIN_TONE,
        Attribute::BodyType => BODY_TYPE,
        Attribute::FaceShape => FACE_SHAPE,
        Attribute::EyeShape => EYE_SHAPE,
        Attribute::EyeColor => EYE_COLOR,
        Attribute::NoseShape => NOSE_SHAPE,
        Attribute::LipShape => LIP_SHAPE,
        Attribute::FacialFeatures => FACIAL_FEATURES,
        Attribute::HairLength => HAIR_LENGTH,
        Attribute::HairColor => HAIR_COLOR,
        Attribute::HairTexture => HAIR_TEXTURE,
        Attribute::FacialHair => FACIAL_HAIR,
        Attribute::Clothing => CLOTHING,
        Attribute::Accessories => ACCESSORIES,
        Attribute::ArtStyle => ART_STYLE,
        Attribute::Expression => EXPRESSION,
        Attribute::Plan => PLAN,
        Attribute::AspectRatio => ASPECT_RATIO,
        Attribute::Model => MODEL,
        Attribute::BackgroundMode => BACKGROUND_MODE,
        Attribute::BackgroundPrompt => &[],
    }
}

/// Whether `value` is one of the catalog values for `attribute`.
#[must_use]
pub fn contains(attribute: Attribute, value: &str) -> bool {
    list_options(attribute).iter().any(|o| o.value == value)
}

/// Sample a value uniformly from the attribute's set.
///
/// Returns an empty string for free-text attributes.
pub fn random_value<R: Rng + ?Sized>(attribute: Attribute, rng: &mut R) -> &'static str {
    list_options(attribute).choose(rng).map_or("", |o| o.value)
}

/// Sample one of the background presets uniformly.
pub fn random_background<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    BACKGROUND_PRESETS
        .choose(rng)
        .copied()
        .unwrap_or(BACKGROUND_PRESETS[0])
}

/// Look up the display label of a value in an option list.
#[must_use]
pub fn label_of(options: &'static [OptionEntry], value: &str) -> Option<&'static str> {
    options.iter().find(|o| o.value == value).map(|o| o.label)
}

pub const MODEL: &[OptionEntry] = &[
    entry("gemini-2.5-flash-image", "Nano Banana (fast)"),
    entry("gemini-3-pro-image-preview", "Nano Banana Pro (quality)"),
];

pub const PLAN: &[OptionEntry] = &[
    entry("Extreme close-up of eyes/face", "Macro (eyes/face)"),
    entry("Close-up of face", "Face close-up"),
    entry("Chest-up portrait", "Chest up"),
    entry("Waist-up portrait", "Waist up"),
    entry("Knee-up portrait", "Knee up (American shot)"),
    entry("Full body shot", "Full body"),
    entry("Wide angle environmental", "Wide angle (with surroundings)"),
];

pub const ASPECT_RATIO: &[OptionEntry] = &[
    entry("1:1", "Square 1:1"),
    entry("16:9", "Landscape 16:9"),
    entry("9:16", "Portrait 9:16"),
    entry("4:3", "4:3"),
    entry("3:4", "3:4"),
];

pub const GENDER: &[OptionEntry] = &[
    entry("Male", "Man"),
    entry("Female", "Woman"),
    entry("Non-binary", "Non-binary"),
];

pub const AGE: &[OptionEntry] = &[
    entry("Child (5-10 years)", "Child (5-10)"),
    entry("Teenager (16-19 years)", "Teenager (16-19)"),
    entry("Young Adult (20-29 years)", "Young adult (20-29)"),
    entry("Adult (30-39 years)", "Adult (30-39)"),
    entry("Middle-aged (40-55 years)", "Middle-aged (40-55)"),
    entry("Elderly (60+ years)", "Elderly (60+)"),
    entry("Very Old (80+ years)", "Very old (80+)"),
];

pub const BODY_TYPE: &[OptionEntry] = &[
    entry("Average build", "Average"),
    entry("Slim/Slender", "Slim / slender"),
    entry("Athletic/Fit", "Athletic / fit"),
    entry("Muscular/Bodybuilder", "Muscular / bodybuilder"),
    entry("Curvy/Hourglass", "Curvy / hourglass"),
    entry("Plus size/Heavy", "Plus size / heavy"),
];

pub const ETHNICITY: &[OptionEntry] = &[
    entry(
        "Caucasian, Northern European, Scandinavian",
        "Scandinavian (Northern Europe)",
    ),
    entry(
        "Caucasian, Mediterranean, Southern European",
        "Mediterranean (Southern Europe)",
    ),
    entry("Slavic, Eastern European", "Slavic (Eastern Europe)"),
    entry(
        "East Asian (Chinese, Korean, Japanese)",
        "East Asia (China, Korea, Japan)",
    ),
    entry(
        "Southeast Asian (Vietnamese, Thai)",
        "Southeast Asia (Vietnam, Thailand)",
    ),
    entry(
        "South Asian (Indian, Pakistani)",
        "South Asia (India, Pakistan)",
    ),
    entry("Middle Eastern (Arab, Persian)", "Middle Eastern"),
    entry("African, Afro-American", "African / Afro-American"),
    entry("Latino/Hispanic", "Latino / Hispanic"),
    entry("Mixed ethnicity", "Mixed"),
    entry("Native American/Indigenous", "Native American / Indigenous"),
];

pub const SKIN_TONE: &[OptionEntry] = &[
    entry("Pale Porcelain skin", "Very fair (porcelain)"),
    entry("Fair European skin", "Fair (European)"),
    entry("Sun-kissed Tan skin", "Light tan"),
    entry("Deep Tan/Bronze skin", "Deep tan / bronze"),
    entry("Olive skin", "Olive"),
    entry("Light Brown skin", "Light brown"),
    entry("Dark Brown skin", "Dark brown"),
    entry("Very Dark/Ebony skin", "Ebony / very dark"),
];

pub const FACE_SHAPE: &[OptionEntry] = &[
    entry("Oval face shape", "Oval"),
    entry("Round face shape", "Round"),
    entry("Square face shape with strong jaw", "Square (strong jaw)"),
    entry("Rectangular/Oblong face", "Rectangular (oblong)"),
    entry("Triangle face shape", "Triangle"),
    entry("Diamond face shape", "Diamond"),
    entry("Heart-shaped face", "Heart"),
    entry("High cheekbones, chiseled", "Chiseled, high cheekbones"),
    entry("Soft, chubby cheeks", "Soft / chubby cheeks"),
];

pub const EYE_SHAPE: &[OptionEntry] = &[
    entry("Almond-shaped eyes", "Almond"),
    entry("Round, large eyes", "Round, large"),
    entry("Narrow, squinting eyes", "Narrow / squinting"),
    entry("Deep-set eyes", "Deep-set"),
    entry("Hooded eyes", "Hooded"),
    entry("Downturned eyes", "Downturned"),
    entry("Upturned (Cat) eyes", "Upturned (cat)"),
];

pub const EYE_COLOR: &[OptionEntry] = &[
    entry("Blue eyes", "Blue"),
    entry("Ice Blue eyes", "Ice blue"),
    entry("Grey eyes", "Grey"),
    entry("Green eyes", "Green"),
    entry("Emerald Green eyes", "Emerald"),
    entry("Amber eyes", "Amber"),
    entry("Hazel eyes", "Hazel"),
    entry("Light Brown eyes", "Light brown"),
    entry("Dark Brown eyes", "Dark brown"),
    entry("Black eyes", "Black"),
    entry("Heterochromia (different colors)", "Heterochromia"),
];

pub const FACIAL_FEATURES: &[OptionEntry] = &[
    entry("Clear skin", "Clear skin"),
    entry("Freckles", "Freckles"),
    entry("Beauty mark", "Beauty mark"),
    entry("Acne/Imperfections", "Acne / imperfections"),
    entry("Scar on face", "Facial scar"),
    entry("Dimples", "Dimples"),
    entry("Wrinkles/Aged skin", "Wrinkles"),
    entry("Rosy cheeks", "Rosy cheeks"),
];

pub const NOSE_SHAPE: &[OptionEntry] = &[
    entry("Straight nose", "Straight"),
    entry("Button nose", "Button"),
    entry("Roman/Aquiline nose", "Roman (aquiline)"),
    entry("Wide/Nubian nose", "Wide"),
    entry("Hawk nose", "Hawk"),
    entry("Small pointed nose", "Small, pointed"),
];

pub const LIP_SHAPE: &[OptionEntry] = &[
    entry("Average lips", "Average"),
    entry("Thin lips", "Thin"),
    entry("Full/Plump lips", "Full / plump"),
    entry("Cupid bow lips", "Cupid's bow"),
    entry("Wide mouth", "Wide mouth"),
];

pub const HAIR_LENGTH: &[OptionEntry] = &[
    entry("Bald/Shaved head", "Bald / shaved"),
    entry("Buzz cut", "Buzz cut"),
    entry("Short hair", "Short"),
    entry("Chin length bob", "Bob"),
    entry("Shoulder length hair", "Shoulder length"),
    entry("Mid-back length hair", "Mid-back"),
    entry("Waist length hair", "Waist length"),
    entry("Very long hair", "Very long"),
    entry("Receding hairline", "Receding hairline"),
];

pub const HAIR_COLOR: &[OptionEntry] = &[
    entry("Light Brown hair", "Light brown"),
    entry("Dark Brown hair", "Brown"),
    entry("Black hair", "Black"),
    entry("Jet Black hair", "Jet black"),
    entry("Ash Blonde hair", "Ash blonde"),
    entry("Golden Blonde hair", "Golden blonde"),
    entry("Platinum Blonde hair", "Platinum blonde"),
    entry("Red/Ginger hair", "Red / ginger"),
    entry("Auburn hair", "Auburn"),
    entry("Grey/Silver hair", "Grey / silver"),
    entry("White hair", "White"),
    entry("Dyed Pink hair", "Pink (dyed)"),
    entry("Dyed Blue hair", "Blue (dyed)"),
    entry("Dyed Green hair", "Green (dyed)"),
    entry("Rainbow hair", "Rainbow"),
];

pub const HAIR_TEXTURE: &[OptionEntry] = &[
    entry("Straight hair", "Straight"),
    entry("Wavy hair", "Wavy"),
    entry("Curly hair", "Curly"),
    entry("Coily/Afro hair", "Coily / afro"),
    entry("Braids/Dreadlocks", "Braids / dreadlocks"),
    entry("Messy/Tousled", "Messy / tousled"),
];

pub const FACIAL_HAIR: &[OptionEntry] = &[
    entry("Clean shaven", "Clean shaven"),
    entry("Light stubble", "Light stubble"),
    entry("Heavy stubble", "Heavy stubble"),
    entry("Short groomed beard", "Short groomed beard"),
    entry("Full thick beard", "Full beard"),
    entry("Long wizard beard", "Long beard"),
    entry("Mustache", "Mustache"),
    entry("Handlebar mustache", "Handlebar mustache"),
    entry("Goatee", "Goatee"),
];

pub const CLOTHING: &[OptionEntry] = &[
    entry("Casual T-shirt and jeans", "T-shirt and jeans"),
    entry("Business suit", "Business suit"),
    entry("Elegant evening gown/dress", "Evening dress"),
    entry("Hoodie and streetwear", "Hoodie / streetwear"),
    entry("Leather jacket and boots", "Leather jacket"),
    entry("Sportswear/Gym outfit", "Sportswear"),
    entry("Summer beachwear", "Beachwear"),
    entry("Cyberpunk/Sci-fi armor", "Cyberpunk / armor"),
    entry("Fantasy medieval armor", "Fantasy armor"),
    entry("Vintage 1950s style", "1950s vintage"),
    entry("Medical coat/Uniform", "Uniform / lab coat"),
];

pub const ACCESSORIES: &[OptionEntry] = &[
    entry("No accessories", "None"),
    entry("Prescription glasses", "Glasses"),
    entry("Sunglasses", "Sunglasses"),
    entry("Gold earrings", "Gold earrings"),
    entry("Pearl necklace", "Pearl necklace"),
    entry("Baseball cap", "Cap"),
    entry("Beanie hat", "Beanie"),
    entry("Wide brim hat", "Wide brim hat"),
    entry("Headphones", "Headphones"),
    entry("Nose piercing", "Nose piercing"),
    entry("Face tattoos", "Face tattoos"),
    entry("Scarf", "Scarf"),
];

pub const ART_STYLE: &[OptionEntry] = &[
    entry("Photorealistic 8k", "Photorealism (8k)"),
    entry("Cinematic movie scene", "Cinematic"),
    entry("Anime style", "Anime"),
    entry("3D Render (Pixar/Disney style)", "3D render (cartoon)"),
    entry("Cyberpunk Neon", "Cyberpunk neon"),
    entry("Oil Painting", "Oil painting"),
    entry("Digital Art Illustration", "Digital art"),
    entry("Black and White Noir", "Black & white noir"),
    entry("Vintage Polaroid", "Vintage polaroid"),
    entry("Studio Photography", "Studio photo"),
];

pub const EXPRESSION: &[OptionEntry] = &[
    entry("Neutral calm expression", "Neutral, calm"),
    entry("Happy smiling", "Happy smile"),
    entry("Serious intensity", "Serious"),
    entry("Friendly warm", "Friendly"),
    entry("Mysterious smirking", "Mysterious smirk"),
    entry("Sad melancholic", "Sad"),
    entry("Angry fierce", "Angry"),
    entry("Surprised shocked", "Surprised"),
    entry("Tired exhausted", "Tired"),
];

pub const BACKGROUND_MODE: &[OptionEntry] = &[
    entry("random", "Random preset"),
    entry("prompt", "Text description"),
    entry("upload", "Reference photo"),
];

/// Expression changes offered on a generated avatar.
pub const EMOTIONS: &[OptionEntry] = &[
    entry("Neutral calm expression", "Neutral"),
    entry("Slight smile", "Slight smile"),
    entry("Big wide smile", "Wide smile"),
    entry("Laughing", "Laughing"),
    entry("Surprised face", "Surprised"),
    entry("Angry face", "Angry"),
    entry("Furious shouting", "Furious"),
    entry("Crying sad face", "Crying"),
    entry("Winking", "Winking"),
    entry("Disgusted", "Disgusted"),
];

/// Pose and camera-angle changes offered on a generated avatar.
pub const POSES: &[OptionEntry] = &[
    entry("Turn head left", "Head left"),
    entry("Turn head right", "Head right"),
    entry("Tilt head down", "Tilt down"),
    entry("Tilt head up", "Tilt up"),
    entry("Low angle view", "Low angle"),
    entry("High angle view", "High angle"),
    entry("Turn body left", "Body left"),
    entry("Turn body right", "Body right"),
    entry("Back view", "Back view"),
    entry("Profile view (side)", "Profile"),
];

/// Directions accepted by the exact-degree rotation.
pub const ROTATION_DIRECTIONS: &[OptionEntry] = &[
    entry("Turn head left", "Head left"),
    entry("Turn head right", "Head right"),
    entry("Turn body left", "Body left"),
    entry("Turn body right", "Body right"),
];

/// Scenes drawn from when the background mode is random.
pub const BACKGROUND_PRESETS: [&str; 10] = [
    "Modern minimalist studio with soft lighting",
    "Cyberpunk city street at night with neon lights",
    "Sunny tropical beach with palm trees",
    "Cozy wooden library with books",
    "Futuristic spaceship interior",
    "Autumn forest with falling leaves",
    "Busy New York city street",
    "Fantasy magical forest",
    "Grunge alleyway with graffiti",
    "Luxury penthouse apartment",
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn every_catalog_attribute_has_unique_values() {
        for attr in Attribute::ALL {
            let options = list_options(attr);
            if attr.is_free_text() {
                assert!(options.is_empty());
                continue;
            }
            assert!(!options.is_empty(), "{attr} has no options");
            let unique: HashSet<&str> = options.iter().map(|o| o.value).collect();
            assert_eq!(unique.len(), options.len(), "{attr} has duplicate values");
        }
    }

    #[test]
    fn attribute_keys_round_trip() {
        for attr in Attribute::ALL {
            assert_eq!(attr.key().parse::<Attribute>().unwrap(), attr);
        }
        let loose: Attribute = "SKINTONE".parse().unwrap();
        assert_eq!(loose, Attribute::SkinTone);
        assert!("height".parse::<Attribute>().is_err());
    }

    #[test]
    fn only_the_model_is_reserved() {
        for attr in Attribute::ALL {
            assert_eq!(attr.is_assignable(), attr != Attribute::Model, "{attr}");
        }
        assert!(contains(Attribute::Model, "gemini-2.5-flash-image"));
    }

    #[test]
    fn random_value_stays_in_set() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            for attr in Attribute::ALL {
                let value = random_value(attr, &mut rng);
                if attr.is_free_text() {
                    assert_eq!(value, "");
                } else {
                    assert!(contains(attr, value), "{value} not in {attr}");
                }
            }
        }
    }

    #[test]
    fn random_background_is_a_preset() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let preset = random_background(&mut rng);
            assert!(BACKGROUND_PRESETS.contains(&preset));
            seen.insert(preset);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn rotation_directions_are_poses() {
        for dir in ROTATION_DIRECTIONS {
            assert_eq!(label_of(POSES, dir.value), Some(dir.label));
        }
        assert_eq!(EMOTIONS.len(), 10);
        assert_eq!(POSES.len(), 10);
    }
}
