//! Grupo endpoints (`/api/grupos`).

use super::models::{Grupo, GrupoId, GrupoRequest, PrioridadeGrupos, TurmaId};
use crate::net::{ApiClient, ApiResult};
use serde::Serialize;

const BASE: &str = "/api/grupos";

#[derive(Serialize)]
struct ActiveFlag {
    ativo: bool,
}

/// Grupo service
#[derive(Clone)]
pub struct GrupoService {
    api: ApiClient,
}

impl GrupoService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApiResult<Vec<Grupo>> {
        self.api.get(BASE).await
    }

    pub async fn by_turma(&self, turma_id: TurmaId) -> ApiResult<Vec<Grupo>> {
        self.api.get(&format!("{BASE}/turma/{turma_id}")).await
    }

    pub async fn get(&self, id: GrupoId) -> ApiResult<Grupo> {
        self.api.get(&format!("{BASE}/{id}")).await
    }

    /// Priority ordering of the turma's grupos for the next aula.
    ///
    /// Computed by the lab service.
    pub async fn priority_for_next_aula(&self, turma_id: TurmaId) -> ApiResult<PrioridadeGrupos> {
        self.api
            .get(&format!("{BASE}/turma/{turma_id}/prioridade"))
            .await
    }

    pub async fn create(&self, request: &GrupoRequest) -> ApiResult<Grupo> {
        self.api.post(BASE, request).await
    }

    pub async fn update(&self, id: GrupoId, request: &GrupoRequest) -> ApiResult<Grupo> {
        self.api.put(&format!("{BASE}/{id}"), request).await
    }

    /// Activate or deactivate a grupo
    pub async fn set_active(&self, id: GrupoId, ativo: bool) -> ApiResult<Grupo> {
        self.api
            .patch(&format!("{BASE}/{id}/ativo"), &ActiveFlag { ativo })
            .await
    }

    pub async fn delete(&self, id: GrupoId) -> ApiResult<()> {
        self.api.delete(&format!("{BASE}/{id}")).await
    }
}
