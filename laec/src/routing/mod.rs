//! Navigation model and route authorization.
//!
//! Guards are pure decisions: given the target path and what the session
//! currently knows, they allow the navigation or return the redirect to
//! perform instead. The [`Router`] applies the LAEC route table and follows
//! redirects; the [`Navigator`] carries navigation requests raised outside a
//! guard (logout, inactivity timeout) to whoever drives the screen.

pub mod guards;
pub mod navigation;
pub mod router;

pub use guards::{AccessPolicy, Guard, GuardDecision, SessionView, authorize, landing_path};
pub use navigation::{NavigationIntent, NavigationReason, Navigator};
pub use router::{Navigation, Page, Resolution, Router, RoutingError, post_login_destination};

/// Application root
pub const ROOT_PATH: &str = "/";
/// Public landing page
pub const HOME_PATH: &str = "/informacoes";
/// Login screen
pub const LOGIN_PATH: &str = "/login";
/// Student area
pub const SESSIONS_PATH: &str = "/sessoes";
/// Staff area
pub const MANAGEMENT_PATH: &str = "/gerenciamento";
