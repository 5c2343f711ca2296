//! Application context: wires the session components together and owns
//! their lifecycle.

use crate::auth::{AuthBackend, HttpAuthBackend, SessionManager, TokenStore, User};
use crate::inactivity::{InactivityConfig, InactivityConfigError, InactivityMonitor};
use crate::net::{ApiClient, RequestAuthenticator};
use crate::routing::{Navigation, NavigationIntent, Navigator, Router, RoutingError};
use crate::services::{AulaService, GrupoService, TurmaService, UsuarioService};
use crate::storage::{FileStore, MemoryStore, StorageError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

/// Failures while starting the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid inactivity settings: {0}")]
    Inactivity(#[from] InactivityConfigError),
}

/// Settings needed to start the application
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Gateway base URL
    pub api_url: String,
    /// File backing the durable storage area
    pub storage_path: PathBuf,
    pub inactivity: InactivityConfig,
    /// Per-request timeout for every HTTP call
    pub request_timeout: Duration,
}

/// Running application
///
/// Dropping the context (or calling [`AppContext::shutdown`]) stops the
/// inactivity monitor and the lifecycle task.
pub struct AppContext {
    session: Arc<SessionManager>,
    monitor: InactivityMonitor,
    router: Router,
    api: ApiClient,
    turmas: TurmaService,
    grupos: GrupoService,
    aulas: AulaService,
    usuarios: UsuarioService,
    lifecycle: Mutex<Option<JoinHandle<()>>>,
}

impl AppContext {
    /// Start with a file-backed durable area and the HTTP auth backend.
    ///
    /// Must be called from within a Tokio runtime. Returns the context and the
    /// receiver for navigation requests raised by the session layer.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if settings are invalid, the storage file cannot be
    /// opened, or the HTTP client cannot be built
    pub fn start(
        settings: &AppSettings,
    ) -> Result<(Self, mpsc::UnboundedReceiver<NavigationIntent>), AppError> {
        settings.inactivity.validate()?;

        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        let store = TokenStore::new(
            Arc::new(FileStore::open(&settings.storage_path)?),
            Arc::new(MemoryStore::new()),
        );
        let backend = Arc::new(HttpAuthBackend::with_client(&settings.api_url, http.clone()));

        Self::with_parts(settings, store, backend, http)
    }

    /// Start with explicit storage, auth backend and HTTP client
    ///
    /// # Errors
    ///
    /// Returns `AppError::Inactivity` for invalid timing settings
    pub fn with_parts(
        settings: &AppSettings,
        store: TokenStore,
        backend: Arc<dyn AuthBackend>,
        http: reqwest::Client,
    ) -> Result<(Self, mpsc::UnboundedReceiver<NavigationIntent>), AppError> {
        settings.inactivity.validate()?;

        let (navigator, navigation) = Navigator::channel();
        let session = Arc::new(SessionManager::new(store, backend, navigator));
        let monitor = InactivityMonitor::new(settings.inactivity, Arc::clone(&session));

        let authenticator = RequestAuthenticator::new(session.clone());
        let api = ApiClient::new(&settings.api_url, http, authenticator);

        let lifecycle = tokio::spawn(follow_session(session.subscribe(), monitor.clone()));

        let context = Self {
            turmas: TurmaService::new(api.clone()),
            grupos: GrupoService::new(api.clone()),
            aulas: AulaService::new(api.clone()),
            usuarios: UsuarioService::new(api.clone()),
            session,
            monitor,
            router: Router::new(),
            api,
            lifecycle: Mutex::new(Some(lifecycle)),
        };

        Ok((context, navigation))
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn monitor(&self) -> &InactivityMonitor {
        &self.monitor
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn turmas(&self) -> &TurmaService {
        &self.turmas
    }

    pub fn grupos(&self) -> &GrupoService {
        &self.grupos
    }

    pub fn aulas(&self) -> &AulaService {
        &self.aulas
    }

    pub fn usuarios(&self) -> &UsuarioService {
        &self.usuarios
    }

    /// Navigate to `url` as the shell would: drop an expired session first,
    /// then resolve the route and its guards
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::RedirectLoop` if redirects do not settle
    pub fn open(&self, url: &str) -> Result<Navigation, RoutingError> {
        self.session.enforce_expiry();
        self.router.navigate(self.session.as_ref(), url)
    }

    /// Stop monitoring and the lifecycle task; idempotent
    pub fn shutdown(&self) {
        self.monitor.stop_monitoring();
        if let Some(task) = self
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
            log::debug!("Session lifecycle task stopped");
        }
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Keep the monitor running exactly while someone is signed in
async fn follow_session(
    mut users: watch::Receiver<Option<User>>,
    monitor: InactivityMonitor,
) {
    loop {
        let signed_in = users.borrow_and_update().is_some();
        // Every published user is a new sign-in and gets a fresh window
        monitor.stop_monitoring();
        if signed_in {
            monitor.start_monitoring();
        }

        if users.changed().await.is_err() {
            break;
        }
    }
}
