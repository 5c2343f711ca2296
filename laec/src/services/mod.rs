//! Typed wrappers over the lab and user services.
//!
//! Every call goes through the shared [`ApiClient`](crate::net::ApiClient),
//! so the bearer token is attached automatically while a session exists.

pub mod aulas;
pub mod grupos;
pub mod models;
pub mod turmas;
pub mod usuarios;

pub use aulas::AulaService;
pub use grupos::GrupoService;
pub use models::*;
pub use turmas::{TurmaService, distinct_years, group_by_period};
pub use usuarios::UsuarioService;
