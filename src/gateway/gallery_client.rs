use serde_json::Value;

use super::transport::BackendTransport;
use crate::{
    error::{GatewayError, Result},
    logger,
    models::{GalleryEntry, ImageRecord},
};

pub const IMAGES_PATH: &str = "images";

/// Backend ids are opaque tokens. Anything that could change the request path is refused.
fn image_path(image_id: &str) -> Result<String> {
    let id = image_id.trim();
    if id.is_empty() {
        return Err(GatewayError::ValidationError("Image ID is required".into()));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(GatewayError::ValidationError(format!(
            "Invalid image ID: {}",
            id
        )));
    }
    Ok(format!("{}/{}", IMAGES_PATH, id))
}

#[derive(Clone)]
pub struct GalleryClient {
    transport: BackendTransport,
}

impl GalleryClient {
    pub fn new(transport: BackendTransport) -> Self {
        Self { transport }
    }

    /// URLs of every stored image, in backend order.
    pub async fn list(&self) -> Result<Vec<String>> {
        let _timer = logger::timer("gallery listing");
        let envelope = self
            .transport
            .get_envelope(IMAGES_PATH, self.transport.config().list_timeout)
            .await
            .map_err(|e| e.during("gallery listing"))?;

        let urls = envelope
            .into_array("Failed to load images")?
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<GalleryEntry>(item) {
                Ok(entry) => Some(entry.into_url()),
                Err(e) => {
                    log::debug!("Skipping gallery entry without a URL: {}", e);
                    None
                }
            })
            .collect::<Vec<_>>();

        log::info!("Gallery returned {} images", urls.len());
        Ok(urls)
    }

    /// Metadata of one stored image.
    pub async fn get(&self, image_id: &str) -> Result<ImageRecord> {
        let path = image_path(image_id)?;
        let _timer = logger::timer("image lookup");
        let envelope = self
            .transport
            .get_envelope(&path, self.transport.config().list_timeout)
            .await
            .map_err(|e| e.during("image lookup"))?;

        let data = envelope.into_object("Image not found")?;
        Ok(serde_json::from_value(Value::Object(data))?)
    }

    pub async fn delete(&self, image_id: &str) -> Result<()> {
        let path = image_path(image_id)?;
        let _timer = logger::timer("image deletion");
        self.transport
            .delete_envelope(&path, self.transport.config().list_timeout)
            .await
            .map_err(|e| e.during("image deletion"))?
            .into_data("Failed to delete image")?;

        log::info!("Deleted image {}", image_id.trim());
        Ok(())
    }
}
