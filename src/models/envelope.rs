use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::{GatewayError, Result};

/// The `{success, data, error}` wrapper the backend puts around every answer.
///
/// Every field is kept as a raw JSON value. The backend sends the *string* `"true"`,
/// and anything else (including a boolean `true`) counts as a failure. `error` and
/// `message` only carry a reason when they are strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: Value,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        matches!(&self.success, Value::String(s) if s == "true")
    }

    /// The backend's stated reason: `error` first, then `message`.
    pub fn detail(&self) -> Option<&str> {
        fn text(field: &Option<Value>) -> Option<&str> {
            field
                .as_ref()
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
        }
        text(&self.error).or_else(|| text(&self.message))
    }

    fn failure_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    /// Checks the success flag only, for calls whose `data` carries nothing needed.
    pub fn into_data(self, fallback: &str) -> Result<Option<Value>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(GatewayError::ApiError(self.failure_message(fallback)))
        }
    }

    /// Returns the `data` object of a successful envelope.
    pub fn into_object(self, fallback: &str) -> Result<serde_json::Map<String, Value>> {
        let ok = self.is_success();
        let message = self.failure_message(fallback);
        match self.data {
            Some(Value::Object(map)) if ok => Ok(map),
            _ => Err(GatewayError::ApiError(message)),
        }
    }

    /// Returns the `data` array of a successful list envelope.
    pub fn into_array(self, fallback: &str) -> Result<Vec<Value>> {
        let ok = self.is_success();
        let message = self.failure_message(fallback);
        match self.data {
            Some(Value::Array(items)) if ok => Ok(items),
            _ => Err(GatewayError::ApiError(message)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ImagePaths {
    #[serde(rename = "relativePath")]
    relative_path: Option<String>,
    #[serde(rename = "absolutePath")]
    absolute_path: Option<String>,
    url: Option<String>,
}

/// Where the backend left the generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    /// Fetched with a follow-up GET, resolved against the base URL when not absolute.
    Relative(String),
    /// A file on the machine running the client.
    Absolute(PathBuf),
    /// A hosted copy, already a full URL.
    Url(String),
}

impl ImageLocation {
    pub fn from_data(data: serde_json::Map<String, Value>) -> Result<Self> {
        let paths: ImagePaths = serde_json::from_value(Value::Object(data))?;
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

        if let Some(relative) = non_empty(paths.relative_path) {
            Ok(ImageLocation::Relative(relative))
        } else if let Some(absolute) = non_empty(paths.absolute_path) {
            Ok(ImageLocation::Absolute(PathBuf::from(absolute)))
        } else if let Some(url) = non_empty(paths.url) {
            Ok(ImageLocation::Url(url))
        } else {
            Err(GatewayError::ApiError(
                "No image path found in API response".into(),
            ))
        }
    }
}

/// Gallery entries are plain URLs, but some backends send `{url, ...}` objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GalleryEntry {
    Url(String),
    Item { url: String },
}

impl GalleryEntry {
    pub fn into_url(self) -> String {
        match self {
            GalleryEntry::Url(url) | GalleryEntry::Item { url } => url,
        }
    }
}

/// A stored image as the gallery detail endpoint describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub guidance: Option<f64>,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub steps: Option<u32>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
