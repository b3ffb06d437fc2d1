use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Holds the operation that ran out of time.
    #[error("Timeout error: {0} timed out")]
    TimeoutError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("HTTP error {status}: {body}")]
    HttpStatusError { status: u16, body: String },
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Not found: {0}")]
    NotFoundError(String),
    #[error("Mask error: {0}")]
    MaskError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
}

/// Longest backend detail repeated in a user message.
const MAX_DETAIL_LEN: usize = 200;

impl GatewayError {
    /// Short message suitable for showing to the person who pressed the button.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::ValidationError(msg) | GatewayError::ConfigError(msg) => msg.clone(),
            GatewayError::TimeoutError(operation) => {
                format!("Request timeout. The {} is taking too long.", operation)
            }
            GatewayError::NetworkError(msg) => format!("Network error: {}", msg),
            GatewayError::HttpStatusError { status, body } => {
                let detail = body.trim();
                if detail.is_empty() || detail.len() > MAX_DETAIL_LEN || detail.contains('\n') {
                    format!("Network error: backend answered with HTTP {}", status)
                } else {
                    format!("Network error: backend answered with HTTP {}: {}", status, detail)
                }
            }
            GatewayError::ApiError(msg) => format!("API Error: {}", msg),
            GatewayError::NotFoundError(msg) => msg.clone(),
            GatewayError::MaskError(msg) => format!("Invalid mask: {}", msg),
            GatewayError::ResponseError(msg) => format!("Unreadable response: {}", msg),
        }
    }

    /// Names the operation a timeout belongs to. Other errors pass through.
    pub fn during(self, operation: &str) -> Self {
        match self {
            GatewayError::TimeoutError(_) => GatewayError::TimeoutError(operation.to_string()),
            other => other,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GatewayError::ValidationError(_)
                | GatewayError::ConfigError(_)
                | GatewayError::MaskError(_)
        )
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::TimeoutError("request".to_string())
        } else if e.is_decode() {
            GatewayError::ResponseError(e.to_string())
        } else if let Some(status) = e.status() {
            GatewayError::HttpStatusError {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            GatewayError::NetworkError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::ResponseError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = GatewayError::ValidationError("Please enter a prompt".into());
        assert_eq!(err.user_message(), "Please enter a prompt");
        assert!(err.is_validation());

        let err = GatewayError::ApiError("model overloaded".into());
        assert_eq!(err.user_message(), "API Error: model overloaded");
        assert!(!err.is_validation());

        let err = GatewayError::HttpStatusError {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(
            err.user_message(),
            "Network error: backend answered with HTTP 502: bad gateway"
        );

        let err = GatewayError::HttpStatusError {
            status: 503,
            body: "<html>\n<body>down</body>\n</html>".into(),
        };
        assert_eq!(
            err.user_message(),
            "Network error: backend answered with HTTP 503"
        );
    }

    #[test]
    fn test_timeout_names_the_operation() {
        let err = GatewayError::TimeoutError("request".into()).during("inpainting");
        assert_eq!(
            err.user_message(),
            "Request timeout. The inpainting is taking too long."
        );

        let err = GatewayError::ApiError("quota".into()).during("inpainting");
        assert!(matches!(err, GatewayError::ApiError(ref m) if m == "quota"));
    }

    #[test]
    fn test_malformed_json_is_response_error() {
        let err: GatewayError = serde_json::from_str::<serde_json::Value>("{nope")
            .unwrap_err()
            .into();
        assert!(matches!(err, GatewayError::ResponseError(_)));
    }
}
