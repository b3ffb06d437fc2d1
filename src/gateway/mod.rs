pub mod edit_client;
pub mod gallery_client;
pub mod host;
pub mod image_client;
pub mod outcome;
pub mod transport;

use crate::{
    config::GatewayConfig,
    error::{GatewayError, Result},
    mask::MaskInput,
    models::{
        DiffusionOptions, GeneratedImage, ImageModel, ImageRecord, InpaintOptions,
        LucidOriginOptions, ModelInfo,
    },
};
use reqwest::Client;
use std::sync::Arc;

pub use edit_client::EditClient;
pub use gallery_client::GalleryClient;
pub use host::{ImageHost, ImgbbHost};
pub use image_client::{ImageClient, InpaintBody};
pub use outcome::Outcome;
pub use transport::BackendTransport;

/// Entry point for every user action against the backend.
///
/// The sub-clients return typed [`Result`]s. The methods on this type are the
/// boundary: they never fail, they turn every error into an [`Outcome::Warning`].
#[derive(Clone)]
pub struct GatewayClient {
    image_client: ImageClient,
    gallery_client: GalleryClient,
    edit_client: EditClient,
    config: Arc<GatewayConfig>,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("imagegate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::ConfigError(format!("Cannot build HTTP client: {}", e)))?;
        let host = Arc::new(ImgbbHost::new(
            http.clone(),
            config.imgbb.clone(),
            config.generation_timeout,
        ));
        Ok(Self::with_image_host(http, config, host))
    }

    pub fn with_image_host(http: Client, config: GatewayConfig, host: Arc<dyn ImageHost>) -> Self {
        let config = Arc::new(config);
        let transport = BackendTransport::new(http, config.clone());

        Self {
            image_client: ImageClient::new(transport.clone()),
            gallery_client: GalleryClient::new(transport.clone()),
            edit_client: EditClient::new(transport, host),
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn gallery(&self) -> &GalleryClient {
        &self.gallery_client
    }

    pub fn edit(&self) -> &EditClient {
        &self.edit_client
    }

    pub fn supported_models(&self) -> Vec<ModelInfo> {
        crate::models::supported_models()
    }

    pub async fn generate_image(
        &self,
        prompt: &str,
        steps: u32,
        model: ImageModel,
    ) -> Outcome<GeneratedImage> {
        self.image_client.generate(prompt, steps, model).await.into()
    }

    pub async fn inpaint_image(
        &self,
        image: Option<&[u8]>,
        mask: Option<&MaskInput>,
        prompt: &str,
        options: &InpaintOptions,
    ) -> Outcome<GeneratedImage> {
        self.image_client
            .inpaint(image, mask, prompt, options)
            .await
            .into()
    }

    pub async fn sdxl_image(&self, prompt: &str, options: &DiffusionOptions) -> Outcome<GeneratedImage> {
        self.image_client.sdxl(prompt, options).await.into()
    }

    pub async fn image_to_image(
        &self,
        image: Option<&[u8]>,
        prompt: &str,
        options: &DiffusionOptions,
    ) -> Outcome<GeneratedImage> {
        self.image_client
            .image_to_image(image, prompt, options)
            .await
            .into()
    }

    pub async fn lucid_origin_image(
        &self,
        prompt: &str,
        options: &LucidOriginOptions,
    ) -> Outcome<GeneratedImage> {
        self.image_client.lucid_origin(prompt, options).await.into()
    }

    pub async fn list_images(&self) -> Outcome<Vec<String>> {
        self.gallery_client.list().await.into()
    }

    pub async fn get_image(&self, image_id: &str) -> Outcome<ImageRecord> {
        self.gallery_client.get(image_id).await.into()
    }

    pub async fn delete_image(&self, image_id: &str) -> Outcome<()> {
        self.gallery_client.delete(image_id).await.into()
    }

    pub async fn upload_to_external_host(&self, image: &[u8]) -> Outcome<String> {
        self.edit_client.upload(image).await.into()
    }

    pub async fn edit_by_url(
        &self,
        prompt: &str,
        local_image: Option<&[u8]>,
        url: Option<&str>,
    ) -> Outcome<GeneratedImage> {
        self.edit_client.edit(prompt, local_image, url).await.into()
    }
}
