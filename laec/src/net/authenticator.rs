//! Attaches the current bearer token to outbound requests.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;

/// Source of the current bearer token
pub trait TokenProvider: Send + Sync {
    /// Current token, `None` when nobody is logged in
    fn token(&self) -> Option<String>;
}

/// Outbound request hook adding `Authorization: Bearer <token>`.
///
/// Requests pass through unmodified when there is no token. The hook never
/// blocks and never retries.
#[derive(Clone, Default)]
pub struct RequestAuthenticator {
    provider: Option<Arc<dyn TokenProvider>>,
}

impl RequestAuthenticator {
    /// Authenticator backed by `provider`
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Authenticator that never adds credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Attach the bearer credential to `request` if a token is available
    pub fn apply(&self, request: &mut reqwest::Request) {
        let Some(token) = self.provider.as_ref().and_then(|p| p.token()) else {
            log::trace!("No token available for {}", request.url().path());
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => {
                log::warn!("Token is not a valid header value; sending request without credentials");
            }
        }
    }
}
