//! LAEC route table and redirect resolution.

use super::{
    HOME_PATH, LOGIN_PATH, MANAGEMENT_PATH, ROOT_PATH, SESSIONS_PATH,
    guards::{AccessPolicy, Guard, GuardDecision, SessionView, authorize, landing_path},
    navigation::NavigationIntent,
};
use crate::auth::models::Role;
use std::fmt;
use thiserror::Error;

/// Redirects followed by [`Router::navigate`] before giving up
pub const MAX_REDIRECTS: usize = 8;

/// Routing failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Too many redirects navigating to {0}")]
    RedirectLoop(String),
}

/// Screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Informacoes,
    Procedimentos,
    UsoLaboratorio,
    Equipe,
    Sessoes,
    Login,
    Gerenciamento,
    CadastrarAulas,
    ListarAulas,
    CadastrarUsuarios,
    GerenciarAulas,
}

impl Page {
    pub const ALL: [Page; 11] = [
        Page::Informacoes,
        Page::Procedimentos,
        Page::UsoLaboratorio,
        Page::Equipe,
        Page::Sessoes,
        Page::Login,
        Page::Gerenciamento,
        Page::CadastrarAulas,
        Page::ListarAulas,
        Page::CadastrarUsuarios,
        Page::GerenciarAulas,
    ];

    /// Canonical path of the page
    pub fn path(self) -> &'static str {
        match self {
            Page::Informacoes => HOME_PATH,
            Page::Procedimentos => "/procedimentos",
            Page::UsoLaboratorio => "/uso-laboratorio",
            Page::Equipe => "/equipe",
            Page::Sessoes => SESSIONS_PATH,
            Page::Login => LOGIN_PATH,
            Page::Gerenciamento => MANAGEMENT_PATH,
            Page::CadastrarAulas => "/gerenciamento/cadastrar-aulas",
            Page::ListarAulas => "/gerenciamento/listar-aulas",
            Page::CadastrarUsuarios => "/gerenciamento/cadastrar-usuarios",
            Page::GerenciarAulas => "/gerenciar-aulas",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Informacoes => "Informações",
            Page::Procedimentos => "Procedimentos",
            Page::UsoLaboratorio => "Uso do Laboratório",
            Page::Equipe => "Equipe",
            Page::Sessoes => "Sessões",
            Page::Login => "Login",
            Page::Gerenciamento => "Gerenciamento",
            Page::CadastrarAulas => "Cadastrar Aulas",
            Page::ListarAulas => "Listar Aulas",
            Page::CadastrarUsuarios => "Cadastrar Usuários",
            Page::GerenciarAulas => "Gerenciar Aulas",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone)]
enum Target {
    Page(Page),
    Redirect(&'static str),
}

#[derive(Debug, Clone)]
struct Route {
    path: &'static str,
    target: Target,
    guards: Vec<Guard>,
}

/// Result of resolving a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Page(Page),
    Redirect(NavigationIntent),
}

/// Completed navigation: the page shown and the URL it was reached at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub page: Page,
    pub intent: NavigationIntent,
}

/// Route table plus guard evaluation
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
    fallback: &'static str,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Router with the LAEC route table
    pub fn new() -> Self {
        let staff = || vec![Guard::Policy(AccessPolicy::staff_only())];
        let page = |page: Page, guards: Vec<Guard>| Route {
            path: page.path(),
            target: Target::Page(page),
            guards,
        };

        let routes = vec![
            Route {
                path: ROOT_PATH,
                target: Target::Redirect(HOME_PATH),
                guards: Vec::new(),
            },
            page(Page::Informacoes, Vec::new()),
            page(Page::Procedimentos, Vec::new()),
            page(Page::Sessoes, vec![Guard::Policy(AccessPolicy::student_only())]),
            page(Page::UsoLaboratorio, Vec::new()),
            page(Page::Equipe, Vec::new()),
            page(Page::Login, vec![Guard::PublicOnly]),
            page(Page::Gerenciamento, staff()),
            page(Page::CadastrarAulas, staff()),
            page(Page::ListarAulas, staff()),
            page(Page::GerenciarAulas, staff()),
            page(Page::CadastrarUsuarios, staff()),
        ];

        Self {
            routes,
            fallback: HOME_PATH,
        }
    }

    fn route(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.path == path)
    }

    /// Resolve one URL against the table and its guards.
    ///
    /// Query and fragment are ignored for matching; the full URL (minus the
    /// fragment) is what guards record as `returnUrl`.
    pub fn resolve(&self, session: &dyn SessionView, url: &str) -> Resolution {
        let url = url.split('#').next().unwrap_or_default();
        let path = normalize(url.split('?').next().unwrap_or_default());

        let Some(route) = self.route(&path) else {
            log::debug!("No route for {}; redirecting to {}", path, self.fallback);
            return Resolution::Redirect(NavigationIntent::to(self.fallback));
        };

        match &route.target {
            Target::Redirect(to) => Resolution::Redirect(NavigationIntent::to(*to)),
            Target::Page(page) => match authorize(&route.guards, session, url) {
                GuardDecision::Allow => Resolution::Page(*page),
                GuardDecision::Redirect(intent) => Resolution::Redirect(intent),
            },
        }
    }

    /// Resolve `url`, following redirects until a page is reached.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::RedirectLoop` after [`MAX_REDIRECTS`] hops
    pub fn navigate(&self, session: &dyn SessionView, url: &str) -> Result<Navigation, RoutingError> {
        let mut intent = NavigationIntent::parse(url);
        let mut current = url.to_string();

        for _ in 0..=MAX_REDIRECTS {
            match self.resolve(session, &current) {
                Resolution::Page(page) => return Ok(Navigation { page, intent }),
                Resolution::Redirect(next) => {
                    current = next.to_string();
                    intent = next;
                }
            }
        }

        log::warn!("Redirect loop while navigating to {}", url);
        Err(RoutingError::RedirectLoop(url.to_string()))
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Where to go after a successful login: `returnUrl` if given, else the
/// role's landing page
pub fn post_login_destination(return_url: Option<&str>, role: Role) -> String {
    match return_url {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => landing_path(Some(role)).to_string(),
    }
}
