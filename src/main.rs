//! Avatar Studio - avatar, photo and outpainting tools on the Gemini image API.

mod adapters;
mod avatar;
mod cassette;
mod catalog;
mod cli;
mod client;
mod codec;
mod config;
mod context;
mod error;
mod model;
mod output;
mod params;
mod ports;
mod prompt;
mod session;
mod studio;

use std::path::Path;
use std::process;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::avatar::BackgroundMode;
use crate::catalog::{
    Attribute, OptionEntry, BACKGROUND_PRESETS, EMOTIONS, POSES, ROTATION_DIRECTIONS,
};
use crate::cli::{AvatarArgs, Cli, Command, EditPositions, OutpaintArgs, PhotoArgs};
use crate::client::GenerationClient;
use crate::codec::InlineImage;
use crate::config::Config;
use crate::context::{RecordingSession, ServiceContext};
use crate::error::StudioError;
use crate::model::{resolve_model, validate_model};
use crate::output::{numbered_path, resolve_output_path, save_image};
use crate::params::{parse_assignment, validate_aspect_ratio, validate_format};
use crate::prompt::ModificationKind;
use crate::session::{RequestStatus, Session};
use crate::studio::Studio;

#[tokio::main]
async fn main() {
    let (cli, positions) = Cli::try_parse_ordered(std::env::args_os())
        .unwrap_or_else(|e| e.exit());
    init_tracing(cli.verbose);

    if let Err(e) = run(cli, &positions).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("avatar_studio={level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// A fully validated unit of work; building one never touches the network.
enum Job {
    Composite {
        subject: InlineImage,
        background: InlineImage,
    },
    Avatar {
        session: Session,
        rng: StdRng,
        edits: Vec<Edit>,
        from_base: bool,
    },
    Photo {
        prompt: String,
        aspect_ratio: String,
        icon: bool,
        remixes: Vec<String>,
    },
    Outpaint {
        source: InlineImage,
        ratio: String,
        context: String,
    },
}

/// A change applied to the latest avatar after the base generation.
enum Edit {
    Modify {
        kind: ModificationKind,
        value: String,
        label: String,
    },
    Rotate {
        direction: String,
        degrees: String,
    },
}

async fn run(cli: Cli, positions: &EditPositions) -> Result<(), StudioError> {
    let config = Config::discover(cli.config.as_deref())
        .map_err(StudioError::Config)?;

    let requested = cli
        .model
        .clone()
        .unwrap_or_else(|| config.defaults.model.clone());
    let model = resolve_model(&requested);
    validate_model(&model)
        .map_err(StudioError::InvalidArgument)?;
    let format = cli
        .format
        .clone()
        .unwrap_or_else(|| config.defaults.format.clone());
    validate_format(&format)
        .map_err(StudioError::InvalidArgument)?;

    tracing::debug!(%model, requested = %requested, %format, "resolved settings");

    let (job, output, description) = match cli.command {
        Command::Options(args) => return print_options(args.attribute.as_deref()),
        Command::Composite(args) => {
            let job = Job::Composite {
                subject: codec::read_image(Path::new(&args.subject))?,
                background: codec::read_image(Path::new(&args.background))?,
            };
            (job, args.output, "composite".to_string())
        }
        Command::Avatar(args) => {
            let output = args.output.clone();
            let Some(job) = plan_avatar(args, positions, &model, &config)? else {
                return Ok(());
            };
            (job, output, "avatar".to_string())
        }
        Command::Photo(args) => {
            let output = args.output.clone();
            let (job, prompt) = plan_photo(args, &config)?;
            (job, output, prompt)
        }
        Command::Outpaint(args) => {
            let output = args.output.clone();
            let description = format!("outpaint {}", args.ratio);
            (plan_outpaint(args)?, output, description)
        }
    };

    // Create context based on mode (live / recording / replaying)
    let (ctx, recording) = create_context(&config)?;
    let client = GenerationClient::new(ctx.generator, model);

    let (session, result) = execute(client, job).await;
    finish_recording(recording);

    // Whatever was produced before a failure is still written out.
    save_history(&session, output.as_deref(), &description, &format)?;
    if let RequestStatus::Failed(message) = session.status() {
        eprintln!("{message}");
    }
    result
}

fn plan_avatar(
    args: AvatarArgs,
    positions: &EditPositions,
    model: &str,
    config: &Config,
) -> Result<Option<Job>, StudioError> {
    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let mut session = Session::new();

    if args.randomize {
        session.apply_randomize(&mut rng);
    }
    session.apply_edit(Attribute::Model, model)?;

    let aspect_ratio = args
        .aspect_ratio
        .unwrap_or_else(|| config.defaults.aspect_ratio.clone());
    validate_aspect_ratio(&aspect_ratio)
        .map_err(StudioError::InvalidArgument)?;
    session.apply_edit(Attribute::AspectRatio, &aspect_ratio)?;

    let configured = config.avatar.assignments().map_err(StudioError::Config)?;
    for (attribute, value) in configured {
        session.apply_edit(attribute, value)?;
    }
    for assignment in &args.assignments {
        let (attribute, value) = parse_assignment(assignment)
            .map_err(StudioError::InvalidArgument)?;
        session.apply_edit(attribute, &value)?;
    }
    if args.bind_ethnicity || config.avatar.bind_ethnicity {
        session.config.bind_features_to_ethnicity();
    }
    if let Some(ref path) = args.background_image {
        session.set_background_image(codec::read_image(Path::new(path))?);
    } else if let Some(text) = args.background_prompt {
        session.config.background_prompt = text;
        session.set_background_mode(BackgroundMode::Prompt);
    } else if session.config.background_mode == BackgroundMode::Upload {
        return Err(StudioError::InvalidArgument(
            "backgroundMode=upload requires --background-image".to_string(),
        ));
    }

    // Edits run in command-line order; positions missing from `positions`
    // sort last and keep their flag grouping.
    let at = |indices: &[usize], i: usize| indices.get(i).copied().unwrap_or(usize::MAX);
    let mut edits = Vec::new();
    for (i, value) in args.emotion.into_iter().enumerate() {
        let label = catalog_label(EMOTIONS, &value, "emotion")?;
        let kind = ModificationKind::Expression;
        let edit = Edit::Modify { kind, value, label };
        edits.push((at(&positions.emotion, i), edit));
    }
    for (i, value) in args.pose.into_iter().enumerate() {
        let label = catalog_label(POSES, &value, "pose")?;
        let kind = ModificationKind::Pose;
        let edit = Edit::Modify { kind, value, label };
        edits.push((at(&positions.pose, i), edit));
    }
    if let (Some(direction), Some(degrees)) = (args.rotate, args.degrees) {
        prompt::rotation(&direction, &degrees)?;
        let position = positions.rotate.unwrap_or(usize::MAX);
        edits.push((position, Edit::Rotate { direction, degrees }));
    }
    edits.sort_by_key(|&(position, _)| position);
    let edits = edits.into_iter().map(|(_, edit)| edit).collect();

    for attribute in Attribute::ALL {
        let value = session.config.get(attribute);
        tracing::debug!(%attribute, value, "avatar attribute");
    }

    if args.dry_run {
        let preset = catalog::random_background(&mut rng);
        println!("{}", prompt::compile(&session.config, Some(preset)));
        return Ok(None);
    }

    Ok(Some(Job::Avatar {
        session,
        rng,
        edits,
        from_base: args.from_base,
    }))
}

fn plan_photo(args: PhotoArgs, config: &Config) -> Result<(Job, String), StudioError> {
    let prompt = args.resolve_prompt()?;
    if prompt.trim().is_empty() {
        return Err(StudioError::InvalidArgument("Prompt must not be empty".to_string()));
    }
    let aspect_ratio = args
        .aspect_ratio
        .unwrap_or_else(|| config.defaults.aspect_ratio.clone());
    validate_aspect_ratio(&aspect_ratio)
        .map_err(StudioError::InvalidArgument)?;
    if args.remix.iter().any(|r| r.trim().is_empty()) {
        return Err(StudioError::InvalidArgument(
            "Remix instruction must not be empty".to_string(),
        ));
    }

    let job = Job::Photo {
        prompt: prompt.clone(),
        aspect_ratio,
        icon: args.icon,
        remixes: args.remix,
    };
    Ok((job, prompt))
}

fn plan_outpaint(args: OutpaintArgs) -> Result<Job, StudioError> {
    validate_aspect_ratio(&args.ratio)
        .map_err(StudioError::InvalidArgument)?;
    let source = codec::read_image(Path::new(&args.source))?;
    Ok(Job::Outpaint {
        source,
        ratio: args.ratio,
        context: args.context,
    })
}

fn catalog_label(
    options: &'static [OptionEntry],
    value: &str,
    what: &str,
) -> Result<String, StudioError> {
    catalog::label_of(options, value)
        .map(str::to_string)
        .ok_or_else(|| {
            StudioError::InvalidArgument(format!(
                "Unknown {what} '{value}'. See `avatar-studio options {what}s`"
            ))
        })
}

fn create_context(
    config: &Config,
) -> Result<(ServiceContext, Option<RecordingSession>), StudioError> {
    let replay_path = std::env::var("STUDIO_REPLAY").ok();
    let is_recording = std::env::var("STUDIO_REC")
        .is_ok_and(|v| v == "true" || v == "1");

    if let Some(ref cassette_path) = replay_path {
        tracing::debug!(cassette = %cassette_path, "replaying");
        Ok((ServiceContext::replaying(Path::new(cassette_path))?, None))
    } else if is_recording {
        tracing::debug!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(config)?;
        Ok((ctx, Some(session)))
    } else {
        Ok((ServiceContext::live(config)?, None))
    }
}

fn finish_recording(recording: Option<RecordingSession>) {
    if let Some(session) = recording {
        match session.finish() {
            Ok(recorded) => eprintln!(
                "Cassette saved: {} ({} interactions, {} failed)",
                recorded.path.display(),
                recorded.interactions,
                recorded.failures
            ),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }
}

/// Run a job and hand back its session, including after a failure.
async fn execute(client: GenerationClient, job: Job) -> (Session, Result<(), StudioError>) {
    let mut studio = Studio::new(client);
    let result = run_job(&mut studio, job).await;
    (studio.session, result)
}

async fn run_job(studio: &mut Studio, job: Job) -> Result<(), StudioError> {
    match job {
        Job::Composite {
            subject,
            background,
        } => {
            studio.composite(&subject, &background).await?;
        }
        Job::Avatar {
            session,
            mut rng,
            edits,
            from_base,
        } => {
            studio.session = session;
            let base = studio.generate_avatar(&mut rng).await?;
            for edit in edits {
                if from_base {
                    studio.session.select(base)?;
                }
                match edit {
                    Edit::Modify { kind, value, label } => {
                        studio.modify(kind, &value, &label).await?;
                    }
                    Edit::Rotate { direction, degrees } => {
                        studio.rotate(&direction, &degrees).await?;
                    }
                }
            }
        }
        Job::Photo {
            prompt,
            aspect_ratio,
            icon,
            remixes,
        } => {
            studio.generate_photo(&prompt, &aspect_ratio, icon).await?;
            for instruction in remixes {
                studio.remix(&instruction, &aspect_ratio).await?;
            }
        }
        Job::Outpaint {
            source,
            ratio,
            context,
        } => {
            studio.outpaint(&source, &ratio, &context).await?;
        }
    }
    Ok(())
}

/// Write every artifact in creation order.
fn save_history(
    session: &Session,
    output: Option<&str>,
    description: &str,
    format: &str,
) -> Result<(), StudioError> {
    let artifacts: Vec<_> = session.history().iter().rev().collect();
    let base = resolve_output_path(output, description, format);

    for (i, artifact) in artifacts.iter().enumerate() {
        let path = numbered_path(&base, i + 1, artifacts.len());
        save_image(&artifact.url, format, &path)?;
        tracing::info!(id = %artifact.id, label = %artifact.label, "saved artifact");
        eprintln!("Saved: {}", path.display());
    }
    Ok(())
}

fn print_options(attribute: Option<&str>) -> Result<(), StudioError> {
    let Some(name) = attribute else {
        for attribute in Attribute::ALL {
            let count = catalog::list_options(attribute).len();
            if attribute.is_free_text() {
                println!("{attribute}\t(free text)");
            } else {
                println!("{attribute}\t{count} options");
            }
        }
        println!("emotions\t{} options", EMOTIONS.len());
        println!("poses\t{} options", POSES.len());
        println!("rotations\t{} options", ROTATION_DIRECTIONS.len());
        println!("backgrounds\t{} presets", BACKGROUND_PRESETS.len());
        return Ok(());
    };

    let options = match name {
        "emotions" => EMOTIONS,
        "poses" => POSES,
        "rotations" => ROTATION_DIRECTIONS,
        "backgrounds" => {
            for preset in BACKGROUND_PRESETS {
                println!("{preset}");
            }
            return Ok(());
        }
        other => {
            let attribute: Attribute = other.parse().map_err(StudioError::InvalidArgument)?;
            if attribute.is_free_text() {
                println!("{attribute} accepts free text");
                return Ok(());
            }
            catalog::list_options(attribute)
        }
    };

    for option in options {
        println!("{}\t{}", option.value, option.label);
    }
    Ok(())
}
