//! # LAEC
//!
//! Client-side session core for the LAEC laboratory scheduling system.
//!
//! The library owns everything between the user and the remote services:
//! who is signed in, where the credential is kept, when an idle session is
//! ended, which screens a role may open, and how outbound calls are
//! authenticated. Scheduling itself stays on the server and is reached
//! through thin typed service wrappers.
//!
//! ## Architecture
//!
//! - **Token Store**: persists token, user and the remember-me preference in a
//!   durable or a session-scoped storage area
//! - **Session Manager**: Anonymous/Authenticated state, login, logout,
//!   expiry, and a user-change stream
//! - **Inactivity Monitor**: 30-minute idle timeout with a 5-minute warning
//!   countdown
//! - **Route Guards**: pure allow/redirect decisions per route
//! - **Request Authenticator**: bearer injection on every outbound request
//!
//! ## Core Modules
//!
//! - [`auth`]: session lifecycle and token storage
//! - [`inactivity`]: idle timeout and warnings
//! - [`routing`]: navigation, guards and the route table
//! - [`net`]: HTTP client and bearer injection
//! - [`services`]: turmas, grupos, aulas and usuários
//! - [`app`]: wiring and lifecycle ownership
//!
//! ## Example
//!
//! ```no_run
//! use laec::{AppContext, AppSettings, InactivityConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = AppSettings {
//!         api_url: "http://localhost:8080".to_string(),
//!         storage_path: "/tmp/laec/storage.json".into(),
//!         inactivity: InactivityConfig::default(),
//!         request_timeout: Duration::from_secs(10),
//!     };
//!     let (app, _navigation) = AppContext::start(&settings)?;
//!
//!     app.session().login("ana@laec.edu", "segredo", true).await?;
//!     let page = app.open("/sessoes")?;
//!     println!("Showing {}", page.page);
//!     Ok(())
//! }
//! ```

/// Application wiring and lifecycle.
pub mod app;
pub use app::{AppContext, AppError, AppSettings};

/// Authentication and session state.
pub mod auth;
pub use auth::{AuthError, Role, SessionManager, TokenStore, User};

/// Inactivity-driven logout.
pub mod inactivity;
pub use inactivity::{ActivityKind, InactivityConfig, InactivityEvent, InactivityMonitor};

/// HTTP plumbing.
pub mod net;
pub use net::{ApiClient, ApiError, RequestAuthenticator};

/// Navigation and route authorization.
pub mod routing;
pub use routing::{Guard, GuardDecision, NavigationIntent, Page, Router};

/// Lab and user service wrappers.
pub mod services;

/// Durable and session-scoped key/value storage.
pub mod storage;
