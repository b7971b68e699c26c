use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebIntelError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Backend {
        status: u16,
        message: Option<String>,
        details: Option<String>,
    },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl WebIntelError {
    /// Text to show the user for a failed user-initiated operation.
    ///
    /// Backend-provided `details` win over `message`; every other failure
    /// shows `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            WebIntelError::Backend {
                details, message, ..
            } => [details.as_deref(), message.as_deref()]
                .into_iter()
                .flatten()
                .find(|m| !m.trim().is_empty())
                .unwrap_or(fallback)
                .to_string(),
            _ => fallback.to_string(),
        }
    }

    /// NetworkFailure vs BackendError classification.
    pub fn is_network(&self) -> bool {
        matches!(self, WebIntelError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, WebIntelError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(message: Option<&str>, details: Option<&str>) -> WebIntelError {
        WebIntelError::Backend {
            status: 500,
            message: message.map(String::from),
            details: details.map(String::from),
        }
    }

    #[test]
    fn test_user_message_prefers_details() {
        let err = backend(Some("Scrape failed"), Some("Timeout fetching page"));
        assert_eq!(err.user_message("fallback"), "Timeout fetching page");
    }

    #[test]
    fn test_user_message_uses_message() {
        let err = backend(Some("Record not found"), None);
        assert_eq!(err.user_message("Failed to delete"), "Record not found");
    }

    #[test]
    fn test_user_message_fallback() {
        assert_eq!(backend(None, None).user_message("Failed to delete"), "Failed to delete");
        assert_eq!(backend(Some("  "), None).user_message("Failed"), "Failed");
        assert_eq!(backend(Some("used"), Some("")).user_message("Failed"), "used");
        assert_eq!(
            WebIntelError::Decode("bad".into()).user_message("Failed"),
            "Failed"
        );
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(
            backend(Some("gone"), None).to_string(),
            "Backend error (500): gone"
        );
        assert_eq!(
            backend(None, None).to_string(),
            "Backend error (500): no message"
        );
    }
}
