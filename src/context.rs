//! Service context that selects the live, recording or replaying generator.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::gemini::GeminiGenerator;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::recorder::{CassetteRecorder, RecordedCassette};
use crate::cassette::replayer::CassetteReplayer;
use crate::config::{Config, API_KEY_ENV_VARS};
use crate::error::StudioError;
use crate::ports::ImageGenerator;

/// Directory, relative to the working directory, that recordings go under.
const CASSETTE_ROOT: &str = ".avatar-studio/cassettes";

/// Bundles the port trait objects for one run.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// Every generator built on this session must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<RecordedCassette, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        let recorded = recorder
            .finish()
            .map_err(|e| format!("Failed to write cassette: {e}"))?;
        tracing::debug!(
            path = %recorded.path.display(),
            interactions = recorded.interactions,
            "cassette written"
        );
        Ok(recorded)
    }
}

impl ServiceContext {
    /// Create a live context calling the Gemini API.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured.
    pub fn live(config: &Config) -> Result<Self, StudioError> {
        let key = config
            .gemini_key()
            .ok_or_else(|| StudioError::MissingApiKey {
                env_var: API_KEY_ENV_VARS[0].to_string(),
            })?;
        Ok(Self {
            generator: Box::new(GeminiGenerator::new(key)),
        })
    }

    /// Create a recording context that wraps the live adapter with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), StudioError> {
        let live_ctx = Self::live(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(CASSETTE_ROOT)
            .join(&timestamp)
            .join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-image_generator"),
            commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(live_ctx.generator, Arc::clone(&recorder));
        let ctx = Self {
            generator: Box::new(generator),
        };
        Ok((ctx, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, StudioError> {
        let replayer = CassetteReplayer::load(path)
            .map_err(|e| StudioError::Config(format!("Failed to load cassette: {e}")))?;
        let generator = ReplayingImageGenerator::new(Arc::new(Mutex::new(replayer)));
        Ok(Self {
            generator: Box::new(generator),
        })
    }
}

/// Current git commit hash, or "unknown" if unavailable.
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
