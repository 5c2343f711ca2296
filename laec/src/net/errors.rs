//! API error types for calls against the LAEC services.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by domain service calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: missing or rejected credentials
    #[error("Not authenticated")]
    Unauthorized,

    /// 403: authenticated but not allowed
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409: duplicate resource
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-success status
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// No response (connection refused, DNS failure, timeout)
    #[error("Cannot reach server: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success response to an error
    ///
    /// # Arguments
    ///
    /// * `status` - Response status
    /// * `body` - Raw response body, used for the backend's `message`
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = error_message(body);
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::CONFLICT => ApiError::Conflict(message),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Get a message suitable for showing to the user
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Your session has ended. Please log in again.".to_string(),
            ApiError::Transport(_) => "Cannot reach the server. Try again later.".to_string(),
            ApiError::Decode(_) => "The server returned an unexpected response.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Extract a human-readable message from a backend error body.
///
/// The services answer `{"status":..,"error":..,"message":..}`; `message` is
/// preferred, then `error`, then the trimmed raw body.
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "error"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_message_field() {
        let body = r#"{"timestamp":"2025-03-10T10:00:00","status":404,"error":"Not Found","message":"Turma não encontrada com id: 9","path":"/api/turmas/9"}"#;
        assert_eq!(error_message(body), "Turma não encontrada com id: 9");
    }

    #[test]
    fn test_error_message_falls_back_to_error_then_raw() {
        assert_eq!(error_message(r#"{"error":"Bad Request"}"#), "Bad Request");
        assert_eq!(error_message("  gateway timeout \n"), "gateway timeout");
        assert_eq!(error_message(""), "");
    }

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, r#"{"message":"Grupo já existe"}"#),
            ApiError::Conflict(m) if m == "Grupo já existe"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "invalid"),
            ApiError::Status { status: 400, .. }
        ));
    }
}
