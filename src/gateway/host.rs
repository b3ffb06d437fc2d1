use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::time::Duration;

use crate::{
    config::ImgbbConfig,
    error::{GatewayError, Result},
    models::UploadResponse,
};

/// A third-party service that turns local image bytes into a public URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    fn name(&self) -> &str;

    async fn upload(&self, image: &[u8]) -> Result<String>;
}

pub struct ImgbbHost {
    client: Client,
    config: ImgbbConfig,
    timeout: Duration,
}

impl ImgbbHost {
    pub fn new(client: Client, config: ImgbbConfig, timeout: Duration) -> Self {
        Self {
            client,
            config,
            timeout,
        }
    }
}

#[async_trait]
impl ImageHost for ImgbbHost {
    fn name(&self) -> &str {
        "imgbb"
    }

    async fn upload(&self, image: &[u8]) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GatewayError::ConfigError(
                    "ImgBB API key is missing. Please set IMGBB_API_KEY.".into(),
                )
            })?;
        if image.is_empty() {
            return Err(GatewayError::ValidationError("Please upload an image".into()));
        }

        log::info!("Uploading {} bytes to {}", image.len(), self.name());
        let expiration = self.config.expiration_secs.to_string();
        let response = self
            .client
            .post(&self.config.upload_url)
            .query(&[("expiration", expiration.as_str()), ("key", api_key)])
            .form(&[("image", STANDARD.encode(image))])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<UploadResponse>(&body);

        match parsed {
            Ok(upload) => match upload.hosted_url() {
                Some(url) if status.is_success() => {
                    log::debug!("Uploaded image available at {}", url);
                    Ok(url.to_string())
                }
                _ => Err(GatewayError::ApiError(format!(
                    "Failed to upload image: {}",
                    upload.error_message()
                ))),
            },
            Err(_) if !status.is_success() => Err(GatewayError::HttpStatusError {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn host(server: &MockServer, key: Option<&str>) -> ImgbbHost {
        let mut config = ImgbbConfig::new().with_upload_url(format!("{}/1/upload", server.uri()));
        config.api_key = key.map(String::from);
        ImgbbHost::new(Client::new(), config, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_missing_key_fails_closed() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = host(&server, None).upload(b"img").await.unwrap_err();
        assert!(matches!(err, GatewayError::ConfigError(_)));
        let err = host(&server, Some("  ")).upload(b"img").await.unwrap_err();
        assert!(matches!(err, GatewayError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_upload_returns_hosted_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/upload"))
            .and(query_param("expiration", "600"))
            .and(query_param("key", "secret"))
            .and(body_string_contains("image="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "status": 200,
                "data": {"url": "https://i.ibb.co/abc/img.png"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = host(&server, Some("secret")).upload(b"img").await.unwrap();
        assert_eq!(url, "https://i.ibb.co/abc/img.png");
    }

    #[tokio::test]
    async fn test_rejected_upload_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "error": {"message": "Invalid API v1 key.", "code": 100}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = host(&server, Some("bad")).upload(b"img").await.unwrap_err();
        assert!(matches!(err, GatewayError::ApiError(ref m) if m.contains("Invalid API v1 key.")));
    }
}
