//! Authentication data models.

use super::errors::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User ID type
pub type UserId = i64;

/// Account role as reported by the auth service in the `tipo` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    Admin,
    Administrador,
    Professor,
    Tecnico,
    Monitor,
    Aluno,
}

impl Role {
    /// Every role, staff first
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Administrador,
        Role::Professor,
        Role::Tecnico,
        Role::Monitor,
        Role::Aluno,
    ];

    /// Roles with access to the management area
    pub fn staff() -> impl Iterator<Item = Role> {
        Self::ALL.into_iter().filter(|role| role.is_staff())
    }

    /// Whether the role grants management access
    pub fn is_staff(self) -> bool {
        match self {
            Role::Admin | Role::Administrador | Role::Professor | Role::Tecnico | Role::Monitor => {
                true
            }
            Role::Aluno => false,
        }
    }

    /// Whether the role is a student
    pub fn is_student(self) -> bool {
        matches!(self, Role::Aluno)
    }

    /// Lowercase wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Administrador => "administrador",
            Role::Professor => "professor",
            Role::Tecnico => "tecnico",
            Role::Monitor => "monitor",
            Role::Aluno => "aluno",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role string that matches none of the known roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Logged-in user, persisted as `{id, nome, email, tipo}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tipo")]
    pub role: Role,
}

/// Authenticated session: bearer token plus the user it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "rememberMe")]
    pub remember_me: bool,
}

/// Self-registration request body
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "tipo")]
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
}

/// Response of both login and register
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub tipo: String,
    pub nome: String,
    pub id: UserId,
    pub email: String,
}

impl LoginResponse {
    /// Build a session from the response
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidResponse` - Empty token or unknown role
    pub fn into_session(self) -> AuthResult<Session> {
        if self.token.trim().is_empty() {
            return Err(AuthError::InvalidResponse("missing token".to_string()));
        }

        let role = self
            .tipo
            .parse::<Role>()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        Ok(Session {
            token: self.token,
            user: User {
                id: self.id,
                name: self.nome,
                email: self.email,
                role,
            },
        })
    }
}
