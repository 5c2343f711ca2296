//! HTTP plumbing shared by the auth backend and the domain services.

/// Bearer-token injection for outbound requests.
pub mod authenticator;

/// JSON-over-HTTP client for the lab and user services.
pub mod client;

/// API error taxonomy and backend error-body parsing.
pub mod errors;

pub use authenticator::{RequestAuthenticator, TokenProvider};
pub use client::ApiClient;
pub use errors::{ApiError, ApiResult};
