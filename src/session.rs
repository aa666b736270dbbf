//! Per-tool session state and its transitions.

use std::fmt;

use rand::Rng;

use crate::avatar::{AvatarConfig, BackgroundMode};
use crate::catalog::Attribute;
use crate::client::GeneratedImage;
use crate::codec::InlineImage;
use crate::error::StudioError;

/// Identifier of a generated artifact, increasing in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactId(pub u64);

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an artifact came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Produced from a prompt (avatar, photo, composite, outpaint).
    Original,
    /// Produced by modifying a previous artifact.
    Modification,
}

/// One generated image in the session history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Unique id.
    pub id: ArtifactId,
    /// PNG data URL.
    pub url: String,
    /// Exact text sent to the API.
    pub prompt: String,
    /// Original or modification.
    pub kind: ArtifactKind,
    /// Short description of what changed.
    pub label: String,
}

/// Status of the most recent request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestStatus {
    /// Nothing outstanding.
    #[default]
    Idle,
    /// A request has been issued and not yet resolved.
    InFlight,
    /// The last request failed; holds the message shown to the user.
    Failed(String),
}

/// Everything one tool instance holds: configuration, uploads and history.
#[derive(Debug, Default)]
pub struct Session {
    /// Avatar configuration (unused by the photo and outpaint tools).
    pub config: AvatarConfig,
    background: Option<InlineImage>,
    history: Vec<GeneratedArtifact>,
    selected: Option<ArtifactId>,
    status: RequestStatus,
    next_id: u64,
}

impl Session {
    /// A fresh session with default configuration and empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts, most recent first.
    #[must_use]
    pub fn history(&self) -> &[GeneratedArtifact] {
        &self.history
    }

    /// Status of the most recent request.
    #[must_use]
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// The uploaded background reference, if any.
    #[must_use]
    pub fn background(&self) -> Option<&InlineImage> {
        self.background.as_ref()
    }

    /// The artifact currently displayed.
    #[must_use]
    pub fn selected_artifact(&self) -> Option<&GeneratedArtifact> {
        let id = self.selected?;
        self.history.iter().find(|a| a.id == id)
    }

    /// Display a different artifact from the history.
    ///
    /// # Errors
    ///
    /// Returns an error if no artifact has the given id.
    pub fn select(&mut self, id: ArtifactId) -> Result<(), StudioError> {
        if self.history.iter().any(|a| a.id == id) {
            self.selected = Some(id);
            Ok(())
        } else {
            Err(StudioError::InvalidArgument(format!("No artifact with id {id}")))
        }
    }

    /// Edit one configuration field.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not valid for the attribute.
    pub fn apply_edit(&mut self, attribute: Attribute, value: &str) -> Result<(), StudioError> {
        self.config.set(attribute, value)?;
        Ok(())
    }

    /// Resample the configuration and drop any uploaded background.
    pub fn apply_randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.config.randomize(rng);
        self.background = None;
    }

    /// Attach a background reference image; switches the mode to upload.
    pub fn set_background_image(&mut self, image: InlineImage) {
        self.background = Some(image);
        self.config.background_mode = BackgroundMode::Upload;
    }

    /// Choose the background mode.
    ///
    /// An uploaded image survives the switch and is used again when upload
    /// mode comes back. Only [`Self::apply_randomize`] drops it.
    pub fn set_background_mode(&mut self, mode: BackgroundMode) {
        self.config.background_mode = mode;
    }

    /// Mark a request as issued.
    pub fn begin_generation(&mut self) {
        self.status = RequestStatus::InFlight;
    }

    /// Prepend a new artifact, select it and return to idle.
    pub fn complete_generation(
        &mut self,
        image: GeneratedImage,
        kind: ArtifactKind,
        label: impl Into<String>,
    ) -> ArtifactId {
        let id = self.allocate_id();
        let artifact = GeneratedArtifact {
            id,
            url: image.data_url,
            prompt: image.prompt,
            kind,
            label: label.into(),
        };
        self.history.insert(0, artifact);
        self.selected = Some(id);
        self.status = RequestStatus::Idle;
        id
    }

    /// Overwrite the displayed artifact in place and return to idle.
    ///
    /// The slot keeps its position in the history but gets a fresh id.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is selected.
    pub fn replace_selected(
        &mut self,
        image: GeneratedImage,
        label: impl Into<String>,
    ) -> Result<ArtifactId, StudioError> {
        let current = self.selected.ok_or_else(no_selection)?;
        let id = self.allocate_id();
        let slot = self
            .history
            .iter_mut()
            .find(|a| a.id == current)
            .ok_or_else(no_selection)?;
        *slot = GeneratedArtifact {
            id,
            url: image.data_url,
            prompt: image.prompt,
            kind: slot.kind,
            label: label.into(),
        };
        self.selected = Some(id);
        self.status = RequestStatus::Idle;
        Ok(id)
    }

    /// Record a failure; the session stays usable.
    pub fn fail_generation(&mut self, error: &StudioError) {
        self.status = RequestStatus::Failed(error.user_message());
    }

    fn allocate_id(&mut self) -> ArtifactId {
        self.next_id += 1;
        ArtifactId(self.next_id)
    }
}

fn no_selection() -> StudioError {
    StudioError::InvalidArgument("No image selected; generate one first".to_string())
}
