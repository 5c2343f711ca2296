//! Remote auth service calls.

use super::{
    errors::{AuthError, AuthResult},
    models::{LoginRequest, LoginResponse, RegisterRequest},
};
use crate::net::errors::error_message;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

/// Remote endpoint that issues tokens
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a token
    async fn login(&self, request: &LoginRequest) -> AuthResult<LoginResponse>;

    /// Create an account and receive a token for it
    async fn register(&self, request: &RegisterRequest) -> AuthResult<LoginResponse>;
}

/// Auth backend speaking JSON to `/api/auth`
pub struct HttpAuthBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthBackend {
    /// Create a backend with its own HTTP client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a backend sharing an existing HTTP client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AuthResult<LoginResponse> {
        let response = self
            .client
            .post(format!("{}/api/auth{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: error_message(&error_text),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, request: &LoginRequest) -> AuthResult<LoginResponse> {
        self.post("/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> AuthResult<LoginResponse> {
        self.post("/register", request).await
    }
}
