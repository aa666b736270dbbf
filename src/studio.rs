//! Runs generation operations against a session.

use std::future::Future;

use rand::Rng;

use crate::avatar::BackgroundMode;
use crate::catalog;
use crate::client::{GeneratedImage, GenerationClient};
use crate::codec::InlineImage;
use crate::error::StudioError;
use crate::prompt::{self, ModificationKind};
use crate::session::{ArtifactId, ArtifactKind, Session};

/// Label given to the first generation of an avatar.
pub const BASE_GENERATION_LABEL: &str = "Base Generation";

/// Run one request with the session's in-flight and failure bookkeeping.
async fn tracked<F>(
    session: &mut Session,
    model: &str,
    operation: &str,
    request: F,
) -> Result<GeneratedImage, StudioError>
where
    F: Future<Output = Result<GeneratedImage, StudioError>>,
{
    session.begin_generation();
    tracing::info!(operation, model, "generation started");

    match request.await {
        Ok(image) => {
            tracing::info!(operation, "generation succeeded");
            Ok(image)
        }
        Err(e) => {
            match &e {
                StudioError::NoImageReturned => {
                    tracing::warn!(operation, "model response contained no image");
                }
                e if e.is_transport() => {
                    tracing::error!(operation, error = %e, "generation request failed");
                }
                e => tracing::warn!(operation, error = %e, "generation aborted"),
            }
            session.fail_generation(&e);
            Err(e)
        }
    }
}

/// One tool instance: a session plus the client it generates with.
pub struct Studio {
    client: GenerationClient,
    /// The tool's state.
    pub session: Session,
}

impl Studio {
    /// Create a studio with a fresh session.
    #[must_use]
    pub fn new(client: GenerationClient) -> Self {
        Self {
            client,
            session: Session::new(),
        }
    }

    fn selected_url(&self) -> Result<String, StudioError> {
        self.session
            .selected_artifact()
            .map(|a| a.url.clone())
            .ok_or_else(|| {
                StudioError::InvalidArgument("No image selected; generate one first".to_string())
            })
    }

    /// Compile the avatar configuration and generate a new base image.
    ///
    /// # Errors
    ///
    /// Returns the generation error after recording it in the session.
    pub async fn generate_avatar<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<ArtifactId, StudioError> {
        let preset = catalog::random_background(rng);
        let text = prompt::compile(&self.session.config, Some(preset));
        let reference = match self.session.config.background_mode {
            BackgroundMode::Upload => self.session.background().cloned(),
            BackgroundMode::Random | BackgroundMode::Prompt => None,
        };
        let aspect_ratio = self.session.config.aspect_ratio.clone();

        let image = tracked(
            &mut self.session,
            self.client.model(),
            "avatar",
            self.client.generate_avatar(&text, &aspect_ratio, reference.as_ref()),
        )
        .await?;
        let label = BASE_GENERATION_LABEL;
        Ok(self.session.complete_generation(image, ArtifactKind::Original, label))
    }

    /// Change the expression or pose of the selected avatar; appends a new artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is selected or the generation fails.
    pub async fn modify(
        &mut self,
        kind: ModificationKind,
        value: &str,
        label: &str,
    ) -> Result<ArtifactId, StudioError> {
        let base = self.selected_url()?;
        let instruction = prompt::modification_instruction(kind, value);
        let aspect_ratio = self.session.config.aspect_ratio.clone();

        let image = tracked(
            &mut self.session,
            self.client.model(),
            "modify",
            self.client.modify_avatar(&base, &instruction, &aspect_ratio),
        )
        .await?;
        Ok(self.session.complete_generation(image, ArtifactKind::Modification, label))
    }

    /// Rotate head or body of the selected avatar by an exact number of degrees.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown direction, a degree outside 0-180, no
    /// selection, or a failed generation.
    pub async fn rotate(
        &mut self,
        direction: &str,
        degree: &str,
    ) -> Result<ArtifactId, StudioError> {
        let (value, label) = prompt::rotation(direction, degree)?;
        self.modify(ModificationKind::Pose, &value, &label).await
    }

    /// Generate an image from free text.
    ///
    /// # Errors
    ///
    /// Returns the generation error after recording it in the session.
    pub async fn generate_photo(
        &mut self,
        text: &str,
        aspect_ratio: &str,
        icon_mode: bool,
    ) -> Result<ArtifactId, StudioError> {
        if text.trim().is_empty() {
            return Err(StudioError::InvalidArgument("Prompt must not be empty".to_string()));
        }
        let image = tracked(
            &mut self.session,
            self.client.model(),
            "photo",
            self.client.generate_freeform(text, aspect_ratio, icon_mode),
        )
        .await?;
        Ok(self.session.complete_generation(image, ArtifactKind::Original, "Photo"))
    }

    /// Edit the displayed image in place.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is selected, the instruction is blank, or
    /// the generation fails.
    pub async fn remix(
        &mut self,
        instruction: &str,
        aspect_ratio: &str,
    ) -> Result<ArtifactId, StudioError> {
        if instruction.trim().is_empty() {
            return Err(StudioError::InvalidArgument(
                "Remix instruction must not be empty".to_string(),
            ));
        }
        let base = self.selected_url()?;
        let image = tracked(
            &mut self.session,
            self.client.model(),
            "remix",
            self.client.remix(&base, instruction, aspect_ratio),
        )
        .await?;
        self.session.replace_selected(image, format!("Remix: {instruction}"))
    }

    /// Reframe an uploaded image onto a new aspect ratio.
    ///
    /// # Errors
    ///
    /// Returns the generation error after recording it in the session.
    pub async fn outpaint(
        &mut self,
        source: &InlineImage,
        target_ratio: &str,
        context: &str,
    ) -> Result<ArtifactId, StudioError> {
        let image = tracked(
            &mut self.session,
            self.client.model(),
            "outpaint",
            self.client.outpaint(source, target_ratio, context),
        )
        .await?;
        let label = format!("Outpaint {target_ratio}");
        Ok(self.session.complete_generation(image, ArtifactKind::Original, label))
    }

    /// Place a subject photo into a background photo.
    ///
    /// # Errors
    ///
    /// Returns the generation error after recording it in the session.
    pub async fn composite(
        &mut self,
        subject: &InlineImage,
        background: &InlineImage,
    ) -> Result<ArtifactId, StudioError> {
        let image = tracked(
            &mut self.session,
            self.client.model(),
            "composite",
            self.client.composite(subject, background),
        )
        .await?;
        Ok(self.session.complete_generation(image, ArtifactKind::Original, "Composite"))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::BACKGROUND_PRESETS;
    use crate::client::testing::{FakeGenerator, Scripted};
    use crate::ports::image_generator::GenerateResponse;
    use crate::session::RequestStatus;

    fn studio(script: Vec<Scripted>) -> (Studio, FakeGenerator) {
        let fake = FakeGenerator::new(script);
        let client = GenerationClient::new(Box::new(fake.clone()), "gemini-2.5-flash-image");
        (Studio::new(client), fake)
    }

    #[tokio::test]
    async fn avatar_generation_records_compiled_prompt() {
        let (mut studio, fake) = studio(vec![Scripted::Image("AVATAR")]);
        let mut rng = StdRng::seed_from_u64(1);
        studio.session.apply_randomize(&mut rng);
        studio.session.config.aspect_ratio = "9:16".into();

        let id = studio.generate_avatar(&mut rng).await.unwrap();

        let artifact = studio.session.selected_artifact().unwrap();
        assert_eq!(artifact.id, id);
        assert_eq!(artifact.kind, ArtifactKind::Original);
        assert_eq!(artifact.label, BASE_GENERATION_LABEL);
        assert_eq!(artifact.url, "data:image/png;base64,AVATAR");
        assert!(artifact.prompt.contains(&studio.session.config.hair_color));
        let has_preset = |p: &&str| artifact.prompt.contains(p);
        assert!(BACKGROUND_PRESETS.iter().any(has_preset));

        let request = &fake.requests()[0];
        assert_eq!(request.aspect_ratio.as_deref(), Some("9:16"));
        assert_eq!(request.parts.len(), 1);
    }

    fn jpeg(data: &str) -> InlineImage {
        InlineImage {
            mime_type: "image/jpeg".into(),
            data: data.into(),
        }
    }

    #[tokio::test]
    async fn upload_mode_sends_background_reference() {
        let (mut studio, fake) = studio(vec![Scripted::Image("AVATAR")]);
        studio.session.set_background_image(jpeg("BG"));

        let mut rng = StdRng::seed_from_u64(2);
        studio.generate_avatar(&mut rng).await.unwrap();

        let request = &fake.requests()[0];
        assert_eq!(request.parts.len(), 2);
        let text = request.parts[0].text.as_deref().unwrap();
        assert!(text.contains(prompt::UPLOAD_BACKGROUND_INSTRUCTION));
    }

    #[tokio::test]
    async fn uploaded_background_returns_with_upload_mode() {
        let script = vec![Scripted::Image("PROMPTED"), Scripted::Image("UPLOADED")];
        let (mut studio, fake) = studio(script);
        let mut rng = StdRng::seed_from_u64(4);
        studio.session.set_background_image(jpeg("BG"));

        studio.session.set_background_mode(BackgroundMode::Prompt);
        studio.generate_avatar(&mut rng).await.unwrap();
        studio.session.set_background_mode(BackgroundMode::Upload);
        studio.generate_avatar(&mut rng).await.unwrap();

        let requests = fake.requests();
        assert_eq!(requests[0].parts.len(), 1);
        assert_eq!(requests[1].parts.len(), 2);
        let reference = requests[1].parts[1].inline_data.as_ref().unwrap();
        assert_eq!(reference.data, "BG");
    }

    #[tokio::test]
    async fn remix_replaces_while_modification_appends() {
        // Same precondition for both: one generated image, selected.
        let (mut remixed, _) = studio(vec![Scripted::Image("BASE"), Scripted::Image("REMIX")]);
        let (mut modified, _) = studio(vec![Scripted::Image("BASE"), Scripted::Image("SMILE")]);
        let harbor = "a harbor at dawn";
        remixed.generate_photo(harbor, "1:1", false).await.unwrap();
        modified.generate_photo(harbor, "1:1", false).await.unwrap();
        assert_eq!(remixed.session.history().len(), 1);
        assert_eq!(modified.session.history().len(), 1);

        remixed.remix("make it winter", "1:1").await.unwrap();
        assert_eq!(remixed.session.history().len(), 1);
        let shown = remixed.session.selected_artifact().unwrap();
        assert_eq!(shown.url, "data:image/png;base64,REMIX");

        let smile = "Slight smile";
        let kind = ModificationKind::Expression;
        modified.modify(kind, smile, smile).await.unwrap();
        assert_eq!(modified.session.history().len(), 2);
        let top = modified.session.selected_artifact().unwrap();
        assert_eq!(top.kind, ArtifactKind::Modification);
        assert_eq!(top.url, "data:image/png;base64,SMILE");
    }

    #[tokio::test]
    async fn custom_rotation_goes_through_modification() {
        let (mut studio, fake) = studio(vec![Scripted::Image("BASE"), Scripted::Image("TURNED")]);
        let mut rng = StdRng::seed_from_u64(3);
        studio.generate_avatar(&mut rng).await.unwrap();

        studio.rotate("Turn head left", "90").await.unwrap();

        assert_eq!(studio.session.history().len(), 2);
        let artifact = studio.session.selected_artifact().unwrap();
        assert_eq!(artifact.kind, ArtifactKind::Modification);
        assert_eq!(artifact.label, "Head left 90°");
        assert!(artifact.prompt.contains("Turn head left"));
        assert!(artifact.prompt.contains("90"));

        let request = &fake.requests()[1];
        let text = request.parts[0].text.as_deref().unwrap();
        assert!(text.starts_with("Modify the attached image accurately"));
        assert!(!text.contains("Edit the image based on this instruction"));
        assert_eq!(request.parts[1].inline_data.as_ref().unwrap().data, "BASE");
    }

    #[tokio::test]
    async fn invalid_rotation_never_calls_api() {
        let (mut studio, fake) = studio(vec![Scripted::Image("BASE")]);
        studio.generate_photo("a face", "1:1", false).await.unwrap();

        assert!(studio.rotate("Turn head left", "270").await.is_err());
        assert_eq!(fake.requests().len(), 1);
        assert_eq!(studio.session.history().len(), 1);
    }

    #[tokio::test]
    async fn failures_land_in_session_state() {
        let (mut studio, _) = studio(vec![
            Scripted::Response(GenerateResponse::default()),
            Scripted::Api(503),
            Scripted::Image("OK"),
        ]);

        let kite = "a kite";
        let err = studio.generate_photo(kite, "1:1", false).await.unwrap_err();
        assert!(matches!(err, StudioError::NoImageReturned));
        assert!(matches!(studio.session.status(), RequestStatus::Failed(_)));
        assert!(studio.session.history().is_empty());

        let err = studio.generate_photo(kite, "1:1", false).await.unwrap_err();
        assert!(err.is_transport());

        studio.generate_photo(kite, "1:1", false).await.unwrap();
        assert_eq!(studio.session.status(), &RequestStatus::Idle);
        assert_eq!(studio.session.history().len(), 1);
    }

    #[tokio::test]
    async fn modify_requires_selection() {
        let (mut studio, fake) = studio(vec![]);
        let back = "Back view";
        let err = studio
            .modify(ModificationKind::Pose, back, back)
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::InvalidArgument(_)));
        assert!(studio.remix("brighter", "1:1").await.is_err());
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn composite_and_outpaint_append_originals() {
        let (mut studio, _) = studio(vec![Scripted::Image("COMP"), Scripted::Image("WIDE")]);
        let photo = jpeg("P");

        studio.composite(&photo, &photo).await.unwrap();
        studio.outpaint(&photo, "16:9", "").await.unwrap();

        let history = studio.session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].label, "Outpaint 16:9");
        assert_eq!(history[1].label, "Composite");
        let mode = studio.session.config.background_mode;
        assert_eq!(mode, BackgroundMode::Random);
    }
}
