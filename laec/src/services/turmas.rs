//! Turma endpoints (`/api/turmas`).

use super::models::{Semestre, Turma, TurmaGroup, TurmaId, TurmaRequest};
use crate::net::{ApiClient, ApiError, ApiResult};
use std::collections::BTreeMap;
use std::cmp::Reverse;

const BASE: &str = "/api/turmas";

/// Turma service
#[derive(Clone)]
pub struct TurmaService {
    api: ApiClient,
}

impl TurmaService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApiResult<Vec<Turma>> {
        self.api.get(BASE).await
    }

    pub async fn get(&self, id: TurmaId) -> ApiResult<Turma> {
        self.api.get(&format!("{BASE}/{id}")).await
    }

    pub async fn by_year(&self, ano: i32) -> ApiResult<Vec<Turma>> {
        self.api.get_with_query(BASE, &[("ano", ano.to_string())]).await
    }

    pub async fn by_year_and_semester(&self, ano: i32, semestre: Semestre) -> ApiResult<Vec<Turma>> {
        let query = [("ano", ano.to_string()), ("semestre", semestre.as_str().to_string())];
        self.api.get_with_query(BASE, &query).await
    }

    /// Academic years with turmas, most recent first
    ///
    /// Falls back to deriving the years from the full listing when the
    /// service has no `/anos` endpoint.
    pub async fn years(&self) -> ApiResult<Vec<i32>> {
        match self.api.get::<Vec<i32>>(&format!("{BASE}/anos")).await {
            Ok(mut years) => {
                years.sort_unstable_by_key(|&ano| Reverse(ano));
                years.dedup();
                Ok(years)
            }
            Err(ApiError::NotFound(_) | ApiError::Decode(_)) => {
                log::debug!("Year listing unavailable; deriving from turmas");
                Ok(distinct_years(&self.list().await?))
            }
            Err(e) => Err(e),
        }
    }

    /// Number of turmas in `ano`
    pub async fn count_by_year(&self, ano: i32) -> ApiResult<u64> {
        self.api.get(&format!("{BASE}/anos/{ano}/count")).await
    }

    /// All turmas grouped by year and semester
    pub async fn grouped(&self) -> ApiResult<Vec<TurmaGroup>> {
        Ok(group_by_period(self.list().await?))
    }

    pub async fn create(&self, request: &TurmaRequest) -> ApiResult<Turma> {
        self.api.post(BASE, request).await
    }

    pub async fn update(&self, id: TurmaId, request: &TurmaRequest) -> ApiResult<Turma> {
        self.api.put(&format!("{BASE}/{id}"), request).await
    }

    pub async fn delete(&self, id: TurmaId) -> ApiResult<()> {
        self.api.delete(&format!("{BASE}/{id}")).await
    }
}

/// Distinct years, descending
pub fn distinct_years(turmas: &[Turma]) -> Vec<i32> {
    let mut years: Vec<i32> = turmas.iter().map(|t| t.ano).collect();
    years.sort_unstable_by_key(|&ano| Reverse(ano));
    years.dedup();
    years
}

/// Group by (year, semester): years descending, `primeiro` before `segundo`.
/// Turmas keep their original order within a group.
pub fn group_by_period(turmas: Vec<Turma>) -> Vec<TurmaGroup> {
    let mut groups: BTreeMap<(Reverse<i32>, Semestre), Vec<Turma>> = BTreeMap::new();
    for turma in turmas {
        groups
            .entry((Reverse(turma.ano), turma.semestre))
            .or_default()
            .push(turma);
    }

    groups
        .into_iter()
        .map(|((Reverse(ano), semestre), turmas)| TurmaGroup {
            ano,
            semestre,
            turmas,
        })
        .collect()
}
