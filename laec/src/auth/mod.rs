//! Authentication: token storage, session lifecycle and the remote auth service.
//!
//! The [`SessionManager`] is the only writer of session state. It rehydrates
//! from the [`TokenStore`] at start, exchanges credentials through an
//! [`AuthBackend`], and publishes the signed-in user to subscribers.
//!
//! ## Example
//!
//! ```no_run
//! use laec::auth::{HttpAuthBackend, SessionManager, TokenStore};
//! use laec::routing::Navigator;
//! use laec::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = TokenStore::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()));
//!     let (navigator, _navigation) = Navigator::channel();
//!     let backend = Arc::new(HttpAuthBackend::new("http://localhost:8080"));
//!     let manager = SessionManager::new(store, backend, navigator);
//!
//!     let user = manager.login("ana@laec.edu", "segredo", true).await?;
//!     println!("Signed in as {} ({})", user.name, user.role);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod errors;
pub mod manager;
pub mod models;
pub mod store;
pub mod token;

pub use backend::{AuthBackend, HttpAuthBackend};
pub use errors::{AuthError, AuthResult};
pub use manager::SessionManager;
pub use models::{LoginRequest, LoginResponse, RegisterRequest, Role, Session, User, UserId};
pub use store::TokenStore;
pub use token::{TokenClaims, decode_claims, is_token_valid_at};
