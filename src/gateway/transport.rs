use reqwest::{Client, Response, Url};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::GatewayConfig,
    error::{GatewayError, Result},
    models::{ApiEnvelope, GeneratedImage, ImageLocation, ImageOrigin},
};

/// Shared HTTP plumbing for every backend call: one `reqwest::Client`, the
/// immutable config, envelope decoding and image retrieval.
#[derive(Clone)]
pub struct BackendTransport {
    http: Client,
    config: Arc<GatewayConfig>,
}

impl BackendTransport {
    pub fn new(http: Client, config: Arc<GatewayConfig>) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub async fn post_envelope<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<ApiEnvelope> {
        let url = self.config.endpoint(path);
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        read_envelope(response).await
    }

    pub async fn get_envelope(&self, path: &str, timeout: Duration) -> Result<ApiEnvelope> {
        let url = self.config.endpoint(path);
        log::debug!("GET {}", url);

        let response = self.http.get(&url).timeout(timeout).send().await?;

        read_envelope(response).await
    }

    pub async fn delete_envelope(&self, path: &str, timeout: Duration) -> Result<ApiEnvelope> {
        let url = self.config.endpoint(path);
        log::debug!("DELETE {}", url);

        let response = self.http.delete(&url).timeout(timeout).send().await?;

        read_envelope(response).await
    }

    /// Turns a `relativePath` into a full URL. Absolute URLs pass through. A path
    /// starting with `/` lands on the backend origin, any other path below the base URL.
    pub fn resolve_url(&self, path: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(path) {
            if url.has_host() {
                return Ok(url);
            }
        }
        let base = Url::parse(&format!("{}/", self.config.base_url())).map_err(|e| {
            GatewayError::ConfigError(format!(
                "Invalid API base URL '{}': {}",
                self.config.base_url(),
                e
            ))
        })?;
        base.join(path).map_err(|e| {
            GatewayError::ResponseError(format!("Invalid image path '{}': {}", path, e))
        })
    }

    pub async fn load_image(&self, location: ImageLocation) -> Result<GeneratedImage> {
        match location {
            ImageLocation::Relative(path) => {
                let url = self.resolve_url(&path)?;
                self.fetch_image(url).await
            }
            ImageLocation::Url(raw) => {
                let url = Url::parse(&raw).map_err(|e| {
                    GatewayError::ResponseError(format!("Invalid image URL '{}': {}", raw, e))
                })?;
                self.fetch_image(url).await
            }
            ImageLocation::Absolute(path) => read_local_image(&path).await,
        }
    }

    async fn fetch_image(&self, url: Url) -> Result<GeneratedImage> {
        log::info!("Fetching image from: {}", url);

        let response = self
            .http
            .get(url.clone())
            .timeout(self.config.generation_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::HttpStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(GeneratedImage {
            bytes: bytes.to_vec(),
            origin: ImageOrigin::Remote(url.to_string()),
        })
    }
}

async fn read_envelope(response: Response) -> Result<ApiEnvelope> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        crate::log_error!("Backend answered {}: {}", status, body);
        let detail = serde_json::from_str::<ApiEnvelope>(&body)
            .ok()
            .and_then(|env| env.detail().map(str::to_string))
            .unwrap_or(body);
        return Err(GatewayError::HttpStatusError {
            status: status.as_u16(),
            body: detail,
        });
    }

    log::debug!("API Response: {}", body);
    Ok(serde_json::from_str(&body)?)
}

async fn read_local_image(path: &Path) -> Result<GeneratedImage> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(GeneratedImage {
            bytes,
            origin: ImageOrigin::Local(path.to_path_buf()),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(GatewayError::NotFoundError(
            format!("Image file not found at: {}", path.display()),
        )),
        Err(e) => Err(GatewayError::ResponseError(format!(
            "Cannot read image at {}: {}",
            path.display(),
            e
        ))),
    }
}
