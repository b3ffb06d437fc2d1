use std::sync::Arc;

use super::{host::ImageHost, image_client::require_prompt, transport::BackendTransport};
use crate::{
    error::{GatewayError, Result},
    logger,
    models::{EditByUrlRequest, GeneratedImage, ImageLocation},
};

pub const EDIT_BY_URL_PATH: &str = "generative/image/nanoBanana";

/// Edits an image the backend fetches by URL. Local images go through the
/// external host first so the backend has something public to fetch.
#[derive(Clone)]
pub struct EditClient {
    transport: BackendTransport,
    host: Arc<dyn ImageHost>,
}

impl EditClient {
    pub fn new(transport: BackendTransport, host: Arc<dyn ImageHost>) -> Self {
        Self { transport, host }
    }

    pub async fn upload(&self, image: &[u8]) -> Result<String> {
        let _timer = logger::timer("image upload");
        self.host
            .upload(image)
            .await
            .map_err(|e| e.during("image upload"))
    }

    /// A supplied local image wins over `url`; `url` is otherwise used verbatim.
    pub async fn resolve_image_url(
        &self,
        local_image: Option<&[u8]>,
        url: Option<&str>,
    ) -> Result<String> {
        if let Some(image) = local_image.filter(|bytes| !bytes.is_empty()) {
            return self.upload(image).await;
        }
        match url {
            Some(url) if !url.trim().is_empty() => Ok(url.to_string()),
            _ => Err(GatewayError::ValidationError(
                "Please upload an image or provide an image URL".into(),
            )),
        }
    }

    pub async fn edit(
        &self,
        prompt: &str,
        local_image: Option<&[u8]>,
        url: Option<&str>,
    ) -> Result<GeneratedImage> {
        require_prompt(prompt, "Please enter a prompt")?;
        let image_url = self.resolve_image_url(local_image, url).await?;
        log::info!("Editing {} with prompt: '{}'", image_url, prompt);

        let request = EditByUrlRequest {
            prompt: prompt.to_string(),
            image_url,
        };
        let _timer = logger::timer("image edit");
        self.send_edit(&request)
            .await
            .map_err(|e| e.during("image edit"))
    }

    async fn send_edit(&self, request: &EditByUrlRequest) -> Result<GeneratedImage> {
        let envelope = self
            .transport
            .post_envelope(
                EDIT_BY_URL_PATH,
                request,
                self.transport.config().generation_timeout,
            )
            .await?;
        let data = envelope.into_object("Unknown editing error occurred")?;
        let location = ImageLocation::from_data(data)?;

        self.transport.load_image(location).await
    }
}
