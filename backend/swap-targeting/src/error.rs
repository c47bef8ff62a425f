use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl AppError {
    /// Build an error from a non-success HTTP status and response body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            _ => AppError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized { .. })
    }

    /// Message suitable for rendering inline next to the failed action.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized { .. } => {
                "Your session could not be verified. Please sign in again.".to_string()
            }
            AppError::Api { message, .. } => message.clone(),
            AppError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Pull `error` or `message` out of a JSON error body.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let field = value
        .get("error")
        .and_then(|e| e.get("message").or(Some(e)))
        .or_else(|| value.get("message"))?;

    field.as_str().map(|s| s.to_string())
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Serialization(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_mapping() {
        let err = AppError::from_status(StatusCode::UNAUTHORIZED, r#"{"error":"Token expired"}"#);
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("Token expired"));

        let err = AppError::from_status(StatusCode::FORBIDDEN, "");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_api_error_message_extraction() {
        let err = AppError::from_status(
            StatusCode::CONFLICT,
            r#"{"error":{"code":"SWAP_TARGETED","message":"Swap already targeted"}}"#,
        );
        match &err {
            AppError::Api { status, message } => {
                assert_eq!(*status, 409);
                assert_eq!(message, "Swap already targeted");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.user_message(), "Swap already targeted");
    }

    #[test]
    fn test_fallback_to_reason_phrase() {
        let err = AppError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.user_message(), "Internal Server Error");
    }
}
