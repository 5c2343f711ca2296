//! Session manager: the single source of truth for who is signed in.

use super::{
    backend::AuthBackend,
    errors::AuthResult,
    models::{LoginRequest, RegisterRequest, Role, Session, User},
    store::TokenStore,
    token::{decode_claims, is_token_valid_at},
};
use crate::net::TokenProvider;
use crate::routing::{NavigationIntent, NavigationReason, Navigator, SessionView};
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

/// Session manager
///
/// Holds the current [`Session`] (if any) and publishes the signed-in user on
/// a `watch` channel. Cheap to share behind an `Arc`.
pub struct SessionManager {
    store: TokenStore,
    backend: Arc<dyn AuthBackend>,
    navigator: Navigator,
    session: RwLock<Option<Session>>,
    user_tx: watch::Sender<Option<User>>,
}

impl SessionManager {
    /// Create a session manager, rehydrating any stored session
    ///
    /// # Arguments
    ///
    /// * `store` - Token store over the durable and session areas
    /// * `backend` - Remote auth service
    /// * `navigator` - Where logout navigations are sent
    pub fn new(store: TokenStore, backend: Arc<dyn AuthBackend>, navigator: Navigator) -> Self {
        let restored = match store.load() {
            Some(session) if is_token_valid_at(&session.token, Utc::now()) => {
                log::info!("Restored session for {} ({})", session.user.email, session.user.role);
                Some(session)
            }
            Some(_) => {
                log::info!("Stored token is expired or malformed; discarding it");
                if let Err(e) = store.clear() {
                    log::error!("Failed to clear stale session: {}", e);
                }
                None
            }
            None => None,
        };

        let (user_tx, _) = watch::channel(restored.as_ref().map(|s| s.user.clone()));

        Self {
            store,
            backend,
            navigator,
            session: RwLock::new(restored),
            user_tx,
        }
    }

    /// Log in with username and password
    ///
    /// # Arguments
    ///
    /// * `username` - Login name (email or registration number)
    /// * `password` - Plain password, sent as `senha`
    /// * `remember_me` - Persist the session across restarts
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Rejected by the auth service
    /// * `AuthError::ServiceUnavailable` - Auth service unreachable
    /// * `AuthError::MalformedToken` - Issued token has no readable expiry
    /// * `AuthError::Storage` - Session could not be persisted
    ///
    /// On error the previous state is kept.
    pub async fn login(&self, username: &str, password: &str, remember_me: bool) -> AuthResult<User> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            remember_me,
        };

        let response = self.backend.login(&request).await.inspect_err(|e| {
            log::warn!("Login failed for {}: {}", username, e);
        })?;

        self.establish(response.into_session()?, remember_me)
    }

    /// Create an account and sign in with it
    ///
    /// The new session is always remembered.
    ///
    /// # Errors
    ///
    /// Same as [`SessionManager::login`]
    pub async fn register(&self, request: &RegisterRequest) -> AuthResult<User> {
        let response = self.backend.register(request).await.inspect_err(|e| {
            log::warn!("Registration failed for {}: {}", request.email, e);
        })?;

        self.establish(response.into_session()?, true)
    }

    fn establish(&self, session: Session, remember_me: bool) -> AuthResult<User> {
        decode_claims(&session.token)?;
        self.store.save(&session.token, &session.user, remember_me)?;

        let user = session.user.clone();
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self.user_tx.send_replace(Some(user.clone()));

        log::info!("Signed in as {} ({})", user.email, user.role);
        Ok(user)
    }

    /// Sign out and go to the login screen
    pub fn logout(&self) {
        self.drop_session();
        log::info!("Signed out");
        self.navigator.navigate(NavigationIntent::login());
    }

    /// Sign out after the inactivity timeout
    pub fn expire_for_inactivity(&self) {
        self.drop_session();
        log::info!("Signed out after inactivity");
        self.navigator
            .navigate(NavigationIntent::login().with_reason(NavigationReason::Inactivity));
    }

    /// Drop a held session whose token is no longer valid.
    ///
    /// No navigation is requested. Returns `true` if a session was dropped.
    pub fn enforce_expiry(&self) -> bool {
        let expired = self
            .token()
            .is_some_and(|token| !is_token_valid_at(&token, Utc::now()));

        if expired {
            log::info!("Session token expired");
            self.drop_session();
        }
        expired
    }

    fn drop_session(&self) {
        if let Err(e) = self.store.clear() {
            log::error!("Failed to clear session storage: {}", e);
        }
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.user_tx.send_replace(None);
    }

    /// Token present and not expired
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// Token present and not expired at `now`
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.token()
            .is_some_and(|token| is_token_valid_at(&token, now))
    }

    /// Role of the signed-in user
    pub fn user_role(&self) -> Option<Role> {
        self.read(|session| session.user.role)
    }

    /// Signed-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.read(|session| session.user.clone())
    }

    /// Raw bearer token of the held session
    pub fn token(&self) -> Option<String> {
        self.read(|session| session.token.clone())
    }

    fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> Option<T> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(f)
    }

    /// Stream of user changes; starts with the current user
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user_tx.subscribe()
    }
}

impl SessionView for SessionManager {
    fn is_authenticated(&self) -> bool {
        SessionManager::is_authenticated(self)
    }

    fn user_role(&self) -> Option<Role> {
        SessionManager::user_role(self)
    }
}

impl TokenProvider for SessionManager {
    fn token(&self) -> Option<String> {
        SessionManager::token(self)
    }
}
