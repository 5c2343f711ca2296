//! Structured logging configuration.
//!
//! Library code logs through the `log` facade; the subscriber installed here
//! also receives those records.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging
///
/// Levels come from `RUST_LOG` (default `info,reqwest=warn,hyper=warn`).
/// Output goes to stderr so command output on stdout stays clean.
///
/// # Example
///
/// ```no_run
/// use laec_client::logging;
///
/// logging::init();
/// tracing::info!("Client starting");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialized");
    }
}

/// Log security event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of security event (`failed_login`, `inactivity_logout`, `access_denied`)
/// * `user_id` - Optional user ID
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use laec_client::logging::log_security_event;
///
/// log_security_event("failed_login", None, "Invalid password attempt for ana@laec.edu");
/// ```
pub fn log_security_event(event_type: &str, user_id: Option<i64>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        user_id = user_id,
        "SECURITY: {}",
        message
    );
}
