//! Navigation intents and the channel that carries them.

use super::LOGIN_PATH;
use std::fmt;
use tokio::sync::mpsc;

/// Why the user was sent somewhere, forwarded to the login screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationReason {
    /// Logged out after the inactivity timeout
    Inactivity,
}

impl NavigationReason {
    /// Query-string value
    pub fn as_str(self) -> &'static str {
        match self {
            NavigationReason::Inactivity => "inactivity",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "inactivity" => Some(NavigationReason::Inactivity),
            _ => None,
        }
    }
}

/// A requested destination plus the signals forwarded with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    pub path: String,
    /// Where to go back to after logging in (`returnUrl`)
    pub return_url: Option<String>,
    /// Why the navigation happened (`reason`)
    pub reason: Option<NavigationReason>,
}

impl NavigationIntent {
    /// Plain navigation to `path`
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            return_url: None,
            reason: None,
        }
    }

    /// Navigation to the login screen
    pub fn login() -> Self {
        Self::to(LOGIN_PATH)
    }

    /// Attach a `returnUrl`
    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// Attach a `reason`
    pub fn with_reason(mut self, reason: NavigationReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Parse a URL such as `/login?returnUrl=%2Fsessoes&reason=inactivity`.
    ///
    /// Values are form-decoded (`+` is a space). Unknown query parameters are
    /// ignored; the fragment is dropped.
    pub fn parse(url: &str) -> Self {
        let url = url.split('#').next().unwrap_or_default();
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let mut intent = Self::to(path);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = value.replace('+', " ");
            let value = urlencoding::decode(&value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.clone());
            match key {
                "returnUrl" => intent.return_url = Some(value),
                "reason" => intent.reason = NavigationReason::parse(&value),
                _ => {}
            }
        }

        intent
    }
}

impl fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;

        let mut separator = '?';
        if let Some(url) = &self.return_url {
            write!(f, "{separator}returnUrl={}", urlencoding::encode(url))?;
            separator = '&';
        }
        if let Some(reason) = self.reason {
            write!(f, "{separator}reason={}", reason.as_str())?;
        }
        Ok(())
    }
}

/// Sender half of the navigation channel.
///
/// Clones share one channel; the receiver is owned by whatever renders pages.
#[derive(Debug, Clone)]
pub struct Navigator {
    sender: mpsc::UnboundedSender<NavigationIntent>,
}

impl Navigator {
    /// Create a navigator and the receiver for its requests
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NavigationIntent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Request a navigation; dropped silently when nobody listens
    pub fn navigate(&self, intent: NavigationIntent) {
        log::debug!("Navigation requested: {}", intent);
        if self.sender.send(intent).is_err() {
            log::debug!("Navigation receiver closed; request dropped");
        }
    }
}
