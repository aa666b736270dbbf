//! CLI argument parsing with clap.

use std::ffi::OsString;

use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};

/// Avatar, photo and outpainting studio on top of the Gemini image API.
#[derive(Parser, Debug)]
#[command(name = "avatar-studio", version, about)]
pub struct Cli {
    /// Model name or short alias (defaults to the config file, then nano-banana).
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output format: png, jpeg, webp.
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Tool to run.
    #[command(subcommand)]
    pub command: Command,
}

/// The studio's tools.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place the person from one photo into the scene of another.
    Composite(CompositeArgs),
    /// Generate an avatar from attributes, then optionally modify it.
    Avatar(AvatarArgs),
    /// Generate an image from a free-text prompt, then optionally remix it.
    Photo(PhotoArgs),
    /// Extend an image onto a new aspect ratio.
    Outpaint(OutpaintArgs),
    /// List avatar attributes, or the values of one attribute.
    Options(OptionsArgs),
}

/// Arguments for `composite`.
#[derive(Args, Debug)]
pub struct CompositeArgs {
    /// Photo containing the person.
    #[arg(long)]
    pub subject: String,

    /// Photo of the background scene.
    #[arg(long)]
    pub background: String,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for `avatar`.
#[derive(Args, Debug)]
pub struct AvatarArgs {
    /// Set an attribute, e.g. `--set hairColor="Auburn hair"`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,

    /// Start from a random configuration; `--set` values are applied on top.
    #[arg(long)]
    pub randomize: bool,

    /// Seed for `--randomize` and the background preset draw.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Align skin tone, eyes and hair with the chosen ethnicity.
    #[arg(long)]
    pub bind_ethnicity: bool,

    /// Reference image used as the background (switches to upload mode).
    #[arg(long, conflicts_with = "background_prompt")]
    pub background_image: Option<String>,

    /// Describe the background in words (switches to prompt mode).
    #[arg(long)]
    pub background_prompt: Option<String>,

    /// Aspect ratio (1:1, 16:9, 9:16, 4:3, 3:4).
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Expression change applied after the base generation. Repeatable.
    #[arg(long)]
    pub emotion: Vec<String>,

    /// Pose change applied after the base generation. Repeatable.
    #[arg(long)]
    pub pose: Vec<String>,

    /// Exact rotation direction, e.g. "Turn head left".
    #[arg(long, requires = "degrees")]
    pub rotate: Option<String>,

    /// Rotation in degrees (0-180).
    #[arg(long, requires = "rotate")]
    pub degrees: Option<String>,

    /// Apply every edit to the base image instead of chaining them.
    #[arg(long)]
    pub from_base: bool,

    /// Print the compiled prompt and exit without calling the API.
    #[arg(long)]
    pub dry_run: bool,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for `photo`.
#[derive(Args, Debug)]
pub struct PhotoArgs {
    /// Text prompt describing the desired image.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<String>,

    /// Aspect ratio (1:1, 16:9, 9:16, 4:3, 3:4).
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Render as an isolated flat icon on white.
    #[arg(long)]
    pub icon: bool,

    /// Edit instruction applied to the result in place. Repeatable.
    #[arg(long)]
    pub remix: Vec<String>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for `outpaint`.
#[derive(Args, Debug)]
pub struct OutpaintArgs {
    /// Image to extend.
    pub source: String,

    /// Target aspect ratio (1:1, 16:9, 9:16, 4:3, 3:4).
    #[arg(short, long)]
    pub ratio: String,

    /// Optional description of what should fill the new area.
    #[arg(long, default_value = "")]
    pub context: String,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for `options`.
#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Attribute key (e.g. `hairColor`), or `emotions`, `poses`, `rotations`, `backgrounds`.
    pub attribute: Option<String>,
}

/// Where each avatar edit flag appeared on the command line.
///
/// Edits run in this order, so `--pose A --emotion B` poses first.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EditPositions {
    /// Argument index of each `--emotion` value.
    pub emotion: Vec<usize>,
    /// Argument index of each `--pose` value.
    pub pose: Vec<usize>,
    /// Argument index of the `--rotate` value.
    pub rotate: Option<usize>,
}

impl EditPositions {
    fn from_matches(matches: &ArgMatches) -> Self {
        let indices = |id: &str| -> Vec<usize> {
            matches
                .indices_of(id)
                .map(|indices| indices.collect())
                .unwrap_or_default()
        };
        Self {
            emotion: indices("emotion"),
            pose: indices("pose"),
            rotate: matches.index_of("rotate"),
        }
    }
}

impl Cli {
    /// Parse arguments, also recording the position of each avatar edit.
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments, `--help` or `--version`.
    pub fn try_parse_ordered<I, T>(args: I) -> Result<(Self, EditPositions), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = Self::command();
        let matches = command.try_get_matches_from_mut(args)?;
        let positions = matches
            .subcommand_matches("avatar")
            .map(EditPositions::from_matches)
            .unwrap_or_default();
        let cli = Self::from_arg_matches(&matches)
            .map_err(|e| e.format(&mut command))?;
        Ok((cli, positions))
    }
}

impl PhotoArgs {
    /// Resolve the prompt from either the positional argument or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if neither prompt nor prompt-file is provided,
    /// or if the file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a prompt string or use -p/--prompt-file",
            ))
        }
    }
}
