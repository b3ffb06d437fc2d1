use serde::{Deserialize, Serialize};

/// Body of `POST /generative/image/nanoBanana`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditByUrlRequest {
    pub prompt: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

/// Answer of the external image host. Unlike the backend envelope, `success` is a real boolean.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<UploadData>,
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadData {
    pub url: Option<String>,
}

impl UploadResponse {
    pub fn hosted_url(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.data
            .as_ref()
            .and_then(|d| d.url.as_deref())
            .filter(|u| !u.is_empty())
    }

    pub fn error_message(&self) -> String {
        match &self.error {
            Some(serde_json::Value::String(msg)) => msg.clone(),
            Some(serde_json::Value::Object(obj)) => obj
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("upload rejected")
                .to_string(),
            _ => "upload rejected".to_string(),
        }
    }
}
