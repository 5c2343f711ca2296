//! Route authorization decisions.

use super::{
    LOGIN_PATH, MANAGEMENT_PATH, ROOT_PATH, SESSIONS_PATH,
    navigation::NavigationIntent,
};
use crate::auth::models::Role;
use std::collections::HashSet;

/// What a guard needs to know about the current session
pub trait SessionView {
    /// Token present and not expired
    fn is_authenticated(&self) -> bool;

    /// Role of the signed-in user
    fn user_role(&self) -> Option<Role>;
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(NavigationIntent),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Role-based access rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    pub allowed_roles: HashSet<Role>,
    /// Where an authenticated user without an allowed role is sent
    pub denied_redirect: String,
}

impl AccessPolicy {
    /// Only `aluno`; staff are sent to the management area
    pub fn student_only() -> Self {
        Self {
            allowed_roles: HashSet::from([Role::Aluno]),
            denied_redirect: MANAGEMENT_PATH.to_string(),
        }
    }

    /// Every staff role; students are sent to their sessions page
    pub fn staff_only() -> Self {
        Self {
            allowed_roles: Role::staff().collect(),
            denied_redirect: SESSIONS_PATH.to_string(),
        }
    }

    /// Explicit role list; anyone else goes to the root
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: roles.into_iter().collect(),
            denied_redirect: ROOT_PATH.to_string(),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// Guard attached to a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Any signed-in user
    Authenticated,
    /// Only anonymous visitors (login screen)
    PublicOnly,
    /// Signed-in user with one of the policy's roles
    Policy(AccessPolicy),
}

impl Guard {
    /// Decide whether navigation to `path` may proceed.
    ///
    /// Reads cached session state only.
    pub fn check(&self, session: &dyn SessionView, path: &str) -> GuardDecision {
        let authenticated = session.is_authenticated();

        match self {
            Guard::Authenticated if authenticated => GuardDecision::Allow,
            Guard::Authenticated => login_redirect(path),

            Guard::PublicOnly if !authenticated => GuardDecision::Allow,
            Guard::PublicOnly => GuardDecision::Redirect(NavigationIntent::to(landing_path(
                session.user_role(),
            ))),

            Guard::Policy(_) if !authenticated => login_redirect(path),
            Guard::Policy(policy) => match session.user_role() {
                Some(role) if policy.allows(role) => GuardDecision::Allow,
                role => {
                    log::info!(
                        "Access to {} denied for role {}",
                        path,
                        role.map_or("unknown", Role::as_str)
                    );
                    GuardDecision::Redirect(NavigationIntent::to(policy.denied_redirect.clone()))
                }
            },
        }
    }
}

fn login_redirect(path: &str) -> GuardDecision {
    GuardDecision::Redirect(NavigationIntent::login().with_return_url(path))
}

/// Run every guard in order; the first redirect wins
pub fn authorize(guards: &[Guard], session: &dyn SessionView, path: &str) -> GuardDecision {
    guards
        .iter()
        .map(|guard| guard.check(session, path))
        .find(|decision| !decision.is_allowed())
        .unwrap_or(GuardDecision::Allow)
}

/// Home page for a role: students to `/sessoes`, staff to `/gerenciamento`
pub fn landing_path(role: Option<Role>) -> &'static str {
    match role {
        Some(role) if role.is_student() => SESSIONS_PATH,
        Some(_) => MANAGEMENT_PATH,
        None => LOGIN_PATH,
    }
}
