//! Aula prática endpoints (`/api/aulas`).

use super::models::{AulaId, AulaPratica, AulaRequest, GrupoAulaId, TurmaId};
use crate::net::{ApiClient, ApiResult};

const BASE: &str = "/api/aulas";

/// Aula service
#[derive(Clone)]
pub struct AulaService {
    api: ApiClient,
}

impl AulaService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn by_turma(&self, turma_id: TurmaId) -> ApiResult<Vec<AulaPratica>> {
        self.api.get(&format!("{BASE}/turma/{turma_id}")).await
    }

    pub async fn get(&self, id: AulaId) -> ApiResult<AulaPratica> {
        self.api.get(&format!("{BASE}/{id}")).await
    }

    pub async fn create(&self, request: &AulaRequest) -> ApiResult<AulaPratica> {
        self.api.post(BASE, request).await
    }

    /// Let the lab service assign grupos to shifts and execution order
    pub async fn allocate_groups(&self, id: AulaId) -> ApiResult<AulaPratica> {
        self.api
            .post(&format!("{BASE}/{id}/alocar-grupos"), &serde_json::json!({}))
            .await
    }

    /// Close the aula and update grupo priorities
    pub async fn conclude(&self, id: AulaId) -> ApiResult<AulaPratica> {
        self.api
            .put(&format!("{BASE}/{id}/concluir"), &serde_json::json!({}))
            .await
    }

    /// Record whether a grupo attended
    pub async fn mark_attendance(&self, grupo_aula_id: GrupoAulaId, presente: bool) -> ApiResult<()> {
        self.api
            .put_empty(
                &format!("{BASE}/presenca/{grupo_aula_id}"),
                &[("presente", presente)],
            )
            .await
    }

    pub async fn delete(&self, id: AulaId) -> ApiResult<()> {
        self.api.delete(&format!("{BASE}/{id}")).await
    }
}
