use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::GatewayError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api/v1";
pub const DEFAULT_IMGBB_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";
pub const DEFAULT_IMGBB_EXPIRATION_SECS: u32 = 600;

/// Generation-class calls: generate, inpaint, edit, upload and the follow-up image fetch.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);
pub const LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which inpainting wire format the backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InpaintSchema {
    /// `POST /image/inpaint` with base64 image and base64 mask.
    Legacy,
    /// `POST /generative/image/inpaint` with a flattened 64x64 grayscale mask.
    #[default]
    MaskArray,
}

impl InpaintSchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            InpaintSchema::Legacy => "legacy",
            InpaintSchema::MaskArray => "mask-array",
        }
    }
}

impl FromStr for InpaintSchema {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "base64" | "v1" => Ok(InpaintSchema::Legacy),
            "mask-array" | "mask_array" | "array" | "v2" => Ok(InpaintSchema::MaskArray),
            other => Err(GatewayError::ConfigError(format!(
                "Unknown inpaint schema '{}', expected 'legacy' or 'mask-array'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImgbbConfig {
    pub api_key: Option<String>,
    pub upload_url: String,
    pub expiration_secs: u32,
}

impl Default for ImgbbConfig {
    fn default() -> Self {
        ImgbbConfig {
            api_key: None,
            upload_url: DEFAULT_IMGBB_UPLOAD_URL.to_string(),
            expiration_secs: DEFAULT_IMGBB_EXPIRATION_SECS,
        }
    }
}

impl ImgbbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("IMGBB_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let upload_url =
            env::var("IMGBB_UPLOAD_URL").unwrap_or_else(|_| DEFAULT_IMGBB_UPLOAD_URL.to_string());
        let expiration_secs = env::var("IMGBB_EXPIRATION")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_IMGBB_EXPIRATION_SECS);

        ImgbbConfig {
            api_key,
            upload_url,
            expiration_secs,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_base_url: String,
    pub inpaint_schema: InpaintSchema,
    pub generation_timeout: Duration,
    pub list_timeout: Duration,
    pub imgbb: ImgbbConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            inpaint_schema: InpaintSchema::default(),
            generation_timeout: GENERATION_TIMEOUT,
            list_timeout: LIST_TIMEOUT,
            imgbb: ImgbbConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let inpaint_schema = match env::var("INPAINT_SCHEMA") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                log::warn!("{}; falling back to mask-array", e);
                InpaintSchema::MaskArray
            }),
            Err(_) => InpaintSchema::default(),
        };

        GatewayConfig {
            api_base_url,
            inpaint_schema,
            imgbb: ImgbbConfig::from_env(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    pub fn with_inpaint_schema(mut self, schema: InpaintSchema) -> Self {
        self.inpaint_schema = schema;
        self
    }

    pub fn with_imgbb(mut self, config: ImgbbConfig) -> Self {
        self.imgbb = config;
        self
    }

    pub fn with_timeouts(mut self, generation: Duration, list: Duration) -> Self {
        self.generation_timeout = generation;
        self.list_timeout = list;
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::new();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.inpaint_schema, InpaintSchema::MaskArray);
        assert_eq!(config.generation_timeout, Duration::from_secs(120));
        assert_eq!(config.list_timeout, Duration::from_secs(30));
        assert!(config.imgbb.api_key.is_none());
        assert_eq!(config.imgbb.expiration_secs, 600);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = GatewayConfig::new().with_base_url("http://backend:4001/api/v1/");
        assert_eq!(
            config.endpoint("/image/generate"),
            "http://backend:4001/api/v1/image/generate"
        );
        assert_eq!(config.endpoint("images"), "http://backend:4001/api/v1/images");
    }

    #[test]
    fn test_schema_parsing() {
        assert_eq!("legacy".parse::<InpaintSchema>().unwrap(), InpaintSchema::Legacy);
        assert_eq!(
            " Mask-Array ".parse::<InpaintSchema>().unwrap(),
            InpaintSchema::MaskArray
        );
        assert!("v3".parse::<InpaintSchema>().is_err());
    }

    #[test]
    fn test_builders() {
        let config = GatewayConfig::new()
            .with_inpaint_schema(InpaintSchema::Legacy)
            .with_imgbb(ImgbbConfig::new().with_api_key("k").with_upload_url("http://x/up"));
        assert_eq!(config.inpaint_schema, InpaintSchema::Legacy);
        assert_eq!(config.imgbb.api_key.as_deref(), Some("k"));
        assert_eq!(config.imgbb.upload_url, "http://x/up");
    }
}
