//! Inactivity-driven logout.
//!
//! While a user is signed in, the [`InactivityMonitor`] keeps a single
//! deadline. User activity pushes it forward; reaching
//! `deadline - warning_lead` starts a per-second warning countdown, and
//! reaching the deadline ends the session.

pub mod config;
pub mod monitor;

pub use config::{InactivityConfig, InactivityConfigError};
pub use monitor::{ActivityKind, InactivityEvent, InactivityMonitor};
