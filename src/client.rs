//! Generation client: builds content requests and extracts the resulting image.

use crate::codec::{self, InlineImage};
use crate::error::StudioError;
use crate::ports::{GenerateRequest, ImageGenerator, Part};
use crate::prompt;

/// A successful generation: the image and the exact text that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// PNG data URL of the result.
    pub data_url: String,
    /// The text part sent to the API.
    pub prompt: String,
}

/// Issues the studio's request shapes against an [`ImageGenerator`].
pub struct GenerationClient {
    generator: Box<dyn ImageGenerator>,
    model: String,
}

impl GenerationClient {
    /// Create a client that sends every request to `model`.
    pub fn new(generator: Box<dyn ImageGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    /// The model requests are sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one text part plus inline images and return the first image produced.
    async fn submit(
        &self,
        text: String,
        images: Vec<InlineImage>,
        aspect_ratio: Option<&str>,
    ) -> Result<GeneratedImage, StudioError> {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(Part::text(text.clone()));
        parts.extend(images.into_iter().map(Part::image));

        let request = GenerateRequest {
            model: self.model.clone(),
            parts,
            aspect_ratio: aspect_ratio.map(str::to_string),
        };

        let response = self.generator.generate(&request).await?;
        let data = response.first_image().ok_or(StudioError::NoImageReturned)?;

        Ok(GeneratedImage {
            data_url: codec::to_data_url(data),
            prompt: text,
        })
    }

    /// Place the subject of the first image into the scene of the second.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::NoImageReturned`] if the response has no image,
    /// or the transport error if the call fails.
    pub async fn composite(
        &self,
        subject: &InlineImage,
        background: &InlineImage,
    ) -> Result<GeneratedImage, StudioError> {
        self.submit(
            prompt::COMPOSITE_INSTRUCTION.to_string(),
            vec![subject.clone(), background.clone()],
            None,
        )
        .await
    }

    /// Generate an avatar from a compiled prompt.
    ///
    /// `reference` is the uploaded background, sent only in upload mode.
    ///
    /// # Errors
    ///
    /// See [`GenerationClient::composite`].
    pub async fn generate_avatar(
        &self,
        prompt: &str,
        aspect_ratio: &str,
        reference: Option<&InlineImage>,
    ) -> Result<GeneratedImage, StudioError> {
        let images = reference
            .map(|image| InlineImage {
                mime_type: "image/png".to_string(),
                data: image.data.clone(),
            })
            .into_iter()
            .collect();
        self.submit(prompt.to_string(), images, Some(aspect_ratio))
            .await
    }

    /// Apply a short modification instruction to an existing avatar.
    ///
    /// # Errors
    ///
    /// See [`GenerationClient::composite`].
    pub async fn modify_avatar(
        &self,
        base_data_url: &str,
        instruction: &str,
        aspect_ratio: &str,
    ) -> Result<GeneratedImage, StudioError> {
        self.submit(
            prompt::modify_request(instruction),
            vec![InlineImage::from_data_url(base_data_url)],
            Some(aspect_ratio),
        )
        .await
    }

    /// Generate an image from free text, optionally as an isolated icon.
    ///
    /// # Errors
    ///
    /// See [`GenerationClient::composite`].
    pub async fn generate_freeform(
        &self,
        prompt: &str,
        aspect_ratio: &str,
        icon_mode: bool,
    ) -> Result<GeneratedImage, StudioError> {
        self.submit(
            prompt::freeform_request(prompt, icon_mode),
            Vec::new(),
            Some(aspect_ratio),
        )
        .await
    }

    /// Edit an existing image with a free-text instruction.
    ///
    /// # Errors
    ///
    /// See [`GenerationClient::composite`].
    pub async fn remix(
        &self,
        base_data_url: &str,
        instruction: &str,
        aspect_ratio: &str,
    ) -> Result<GeneratedImage, StudioError> {
        self.submit(
            prompt::remix_request(instruction),
            vec![InlineImage::from_data_url(base_data_url)],
            Some(aspect_ratio),
        )
        .await
    }

    /// Reframe an image onto a canvas of `target_ratio`, filling the new area.
    ///
    /// # Errors
    ///
    /// See [`GenerationClient::composite`].
    pub async fn outpaint(
        &self,
        source: &InlineImage,
        target_ratio: &str,
        context: &str,
    ) -> Result<GeneratedImage, StudioError> {
        self.submit(
            prompt::outpaint_request(target_ratio, context),
            vec![source.clone()],
            Some(target_ratio),
        )
        .await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeGenerator, Scripted};
    use super::*;
    use crate::ports::image_generator::{Candidate, Content, GenerateResponse};

    fn client(script: Vec<Scripted>) -> (GenerationClient, FakeGenerator) {
        let fake = FakeGenerator::new(script);
        let client = GenerationClient::new(Box::new(fake.clone()), "gemini-2.5-flash-image");
        (client, fake)
    }

    fn jpeg(data: &str) -> InlineImage {
        InlineImage {
            mime_type: "image/jpeg".into(),
            data: data.into(),
        }
    }

    #[tokio::test]
    async fn returns_png_data_url_and_sent_text() {
        let (client, fake) = client(vec![Scripted::Image("RESULT")]);
        let image = client
            .generate_freeform("a lighthouse", "16:9", false)
            .await
            .unwrap();

        assert_eq!(image.data_url, "data:image/png;base64,RESULT");
        assert_eq!(image.prompt, "a lighthouse");
        let requests = fake.requests();
        assert_eq!(requests[0].model, "gemini-2.5-flash-image");
        assert_eq!(requests[0].aspect_ratio.as_deref(), Some("16:9"));
        assert_eq!(requests[0].parts, vec![Part::text("a lighthouse")]);
    }

    #[tokio::test]
    async fn missing_image_is_no_image_returned() {
        let refusal = Content {
            parts: vec![Part::text("I can't")],
        };
        let text_only = GenerateResponse {
            candidates: vec![Candidate {
                content: Some(refusal),
            }],
        };
        let (client, _) = client(vec![
            Scripted::Response(GenerateResponse::default()),
            Scripted::Response(text_only),
        ]);

        for _ in 0..2 {
            let result = client.generate_freeform("x", "1:1", false).await;
            assert!(matches!(result, Err(StudioError::NoImageReturned)));
        }
    }

    #[tokio::test]
    async fn transport_errors_pass_through_unchanged() {
        let (client, _) = client(vec![Scripted::Api(429)]);
        let base = "data:image/png;base64,AAAA";
        let err = client.remix(base, "snow", "1:1").await.unwrap_err();
        assert!(matches!(err, StudioError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn composite_sends_both_images_without_aspect_ratio() {
        let (client, fake) = client(vec![Scripted::Image("C")]);
        let (subject, scene) = (jpeg("SUBJECT"), jpeg("SCENE"));
        client.composite(&subject, &scene).await.unwrap();

        let request = &fake.requests()[0];
        assert!(request.aspect_ratio.is_none());
        assert_eq!(request.parts.len(), 3);
        let text = request.parts[0].text.as_deref();
        assert_eq!(text, Some(prompt::COMPOSITE_INSTRUCTION));
        assert_eq!(request.parts[1].inline_data.as_ref(), Some(&subject));
        assert_eq!(request.parts[2].inline_data.as_ref(), Some(&scene));
    }

    #[tokio::test]
    async fn avatar_reference_is_optional() {
        let (client, fake) = client(vec![Scripted::Image("A"), Scripted::Image("B")]);
        let background = jpeg("BG");
        client
            .generate_avatar("portrait", "3:4", None)
            .await
            .unwrap();
        client
            .generate_avatar("portrait", "3:4", Some(&background))
            .await
            .unwrap();

        let requests = fake.requests();
        assert_eq!(requests[0].parts.len(), 1);
        assert_eq!(requests[1].parts.len(), 2);
        let reference = requests[1].parts[1].inline_data.as_ref().unwrap();
        assert_eq!(reference.data, "BG");
        assert_eq!(reference.mime_type, "image/png");
    }

    #[tokio::test]
    async fn modification_strips_data_url_prefix() {
        let (client, fake) = client(vec![Scripted::Image("M")]);
        let instruction = "Change the person's expression to Laughing.";
        let image = client
            .modify_avatar("data:image/png;base64,BASE", instruction, "1:1")
            .await
            .unwrap();

        let request = &fake.requests()[0];
        assert_eq!(request.parts[1].inline_data.as_ref().unwrap().data, "BASE");
        assert!(image.prompt.contains(instruction));
        assert!(image.prompt.starts_with("Modify the attached image accurately"));
    }

    #[tokio::test]
    async fn outpaint_uses_target_ratio() {
        let (client, fake) = client(vec![Scripted::Image("O")]);
        let source = jpeg("SRC");
        client.outpaint(&source, "9:16", "more sky").await.unwrap();

        let request = &fake.requests()[0];
        assert_eq!(request.aspect_ratio.as_deref(), Some("9:16"));
        let text = request.parts[0].text.as_deref().unwrap();
        assert!(text.contains("aspect ratio 9:16"));
        assert!(text.contains("more sky"));
        assert_eq!(request.parts[1].inline_data.as_ref(), Some(&source));
    }

    #[tokio::test]
    async fn icon_mode_changes_text_only() {
        let (client, fake) = client(vec![Scripted::Image("I")]);
        let image = client
            .generate_freeform("a rocket", "1:1", true)
            .await
            .unwrap();
        assert!(image.prompt.contains("vector icon"));
        assert_eq!(fake.requests()[0].parts.len(), 1);
    }
}
