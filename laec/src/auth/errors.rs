//! Authentication error types.

use crate::storage::StorageError;
use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Auth service answered 401
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No response from the auth service (connection refused, DNS, timeout)
    #[error("Cannot reach server: {0}")]
    ServiceUnavailable(String),

    /// Token claims segment could not be decoded or lacks `exp`
    #[error("Malformed authentication token")]
    MalformedToken,

    /// Persisted user record could not be parsed
    #[error("Stored session data is corrupted")]
    CorruptedCache,

    /// Auth service answered with a non-success status other than 401
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Auth service answered 2xx with an unusable body
    #[error("Invalid response from auth service: {0}")]
    InvalidResponse(String),

    /// Session could not be persisted
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Get a message suitable for showing to the user
    ///
    /// Storage and transport details are replaced with a generic hint.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Invalid username or password.".to_string(),
            AuthError::ServiceUnavailable(_) => {
                "Cannot reach the server. Check that the auth service is running.".to_string()
            }
            AuthError::Storage(_) => "Could not save the session on this device.".to_string(),
            AuthError::MalformedToken | AuthError::InvalidResponse(_) => {
                "The server returned an invalid session. Please try again.".to_string()
            }
            AuthError::Rejected { message, .. } if !message.is_empty() => {
                format!("Login failed: {message}")
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
