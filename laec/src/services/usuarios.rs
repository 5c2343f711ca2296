//! User management endpoints (`/api/users`).

use super::models::{CreateUsuario, UpdateUsuario, Usuario};
use crate::auth::Role;
use crate::net::{ApiClient, ApiResult};

const BASE: &str = "/api/users";

/// User service
#[derive(Clone)]
pub struct UsuarioService {
    api: ApiClient,
}

impl UsuarioService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApiResult<Vec<Usuario>> {
        self.api.get(BASE).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Usuario> {
        self.api.get(&format!("{BASE}/{id}")).await
    }

    pub async fn by_email(&self, email: &str) -> ApiResult<Usuario> {
        self.api
            .get(&format!("{BASE}/email/{}", urlencoding::encode(email)))
            .await
    }

    pub async fn by_role(&self, role: Role) -> ApiResult<Vec<Usuario>> {
        self.api.get(&format!("{BASE}/tipo/{}", role.as_str())).await
    }

    pub async fn create(&self, request: &CreateUsuario) -> ApiResult<Usuario> {
        self.api.post(BASE, request).await
    }

    pub async fn update(&self, id: i64, request: &UpdateUsuario) -> ApiResult<Usuario> {
        self.api.put(&format!("{BASE}/{id}"), request).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.api.delete(&format!("{BASE}/{id}")).await
    }

    pub async fn deactivate(&self, id: i64) -> ApiResult<Usuario> {
        self.api
            .patch(&format!("{BASE}/{id}/desativar"), &serde_json::json!({}))
            .await
    }

    pub async fn activate(&self, id: i64) -> ApiResult<Usuario> {
        self.api
            .patch(&format!("{BASE}/{id}/ativar"), &serde_json::json!({}))
            .await
    }
}
