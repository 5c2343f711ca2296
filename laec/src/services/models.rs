//! Wire types of the lab and user services.

use crate::auth::Role;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Turma identifier
pub type TurmaId = i64;
/// Grupo identifier
pub type GrupoId = i64;
/// Aula identifier
pub type AulaId = i64;
/// Identifier of a grupo's participation in an aula
pub type GrupoAulaId = i64;

/// Academic semester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semestre {
    Primeiro,
    Segundo,
}

impl Semestre {
    pub fn as_str(self) -> &'static str {
        match self {
            Semestre::Primeiro => "primeiro",
            Semestre::Segundo => "segundo",
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Semestre::Primeiro => 1,
            Semestre::Segundo => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Semestre::Primeiro => "1º Semestre",
            Semestre::Segundo => "2º Semestre",
        }
    }
}

/// Class shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turno {
    Matutino,
    Vespertino,
    Noturno,
}

impl Turno {
    pub fn label(self) -> &'static str {
        match self {
            Turno::Matutino => "Matutino",
            Turno::Vespertino => "Vespertino",
            Turno::Noturno => "Noturno",
        }
    }

    /// Single-letter code used in turma codes
    pub fn initial(self) -> char {
        match self {
            Turno::Matutino => 'M',
            Turno::Vespertino => 'V',
            Turno::Noturno => 'N',
        }
    }
}

/// Campus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unidade {
    Bueno,
    Perimetral,
}

impl Unidade {
    pub fn label(self) -> &'static str {
        match self {
            Unidade::Bueno => "Bueno",
            Unidade::Perimetral => "Perimetral",
        }
    }
}

/// Weekday of the lab session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiaSemana {
    Segunda,
    Terca,
    Quarta,
    Quinta,
    Sexta,
}

impl DiaSemana {
    pub fn label(self) -> &'static str {
        match self {
            DiaSemana::Segunda => "Segunda-feira",
            DiaSemana::Terca => "Terça-feira",
            DiaSemana::Quarta => "Quarta-feira",
            DiaSemana::Quinta => "Quinta-feira",
            DiaSemana::Sexta => "Sexta-feira",
        }
    }
}

/// Class cohort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turma {
    pub turma_id: TurmaId,
    pub ano: i32,
    pub semestre: Semestre,
    pub turno: Turno,
    pub unidade: Unidade,
    pub dia_semana: DiaSemana,
    #[serde(default)]
    pub nome_turma: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Turma {
    /// Display code, e.g. `LAB-2025-1-M`
    pub fn code(&self) -> String {
        format!(
            "LAB-{}-{}-{}",
            self.ano,
            self.semestre.number(),
            self.turno.initial()
        )
    }
}

impl fmt::Display for Turma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {}, {})",
            self.code(),
            self.nome_turma.as_deref().unwrap_or("-"),
            self.unidade.label(),
            self.turno.label(),
            self.dia_semana.label()
        )
    }
}

/// Turmas sharing a year and semester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurmaGroup {
    pub ano: i32,
    pub semestre: Semestre,
    pub turmas: Vec<Turma>,
}

/// Body for creating or updating a turma
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurmaRequest {
    pub ano: i32,
    pub semestre: Semestre,
    pub turno: Turno,
    pub unidade: Unidade,
    pub dia_semana: DiaSemana,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_turma: Option<String>,
}

/// Student group within a turma
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grupo {
    pub grupo_id: GrupoId,
    pub turma_id: TurmaId,
    pub numero_grupo: i32,
    #[serde(default)]
    pub nome_grupo: Option<String>,
    #[serde(default)]
    pub prioridade_atual: i32,
    #[serde(default)]
    pub total_faltas: i32,
    #[serde(default)]
    pub total_primeiro_turno: i32,
    #[serde(default)]
    pub total_segundo_turno: i32,
    #[serde(default)]
    pub ultima_posicao: Option<i32>,
    #[serde(default)]
    pub ativo: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Grupo {
    /// Aulas attended across both shifts
    pub fn total_aulas(&self) -> i32 {
        self.total_primeiro_turno + self.total_segundo_turno
    }

    pub fn display_name(&self) -> String {
        match &self.nome_grupo {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Grupo {}", self.numero_grupo),
        }
    }
}

/// Body for creating or updating a grupo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrupoRequest {
    pub turma_id: TurmaId,
    pub numero_grupo: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_grupo: Option<String>,
}

/// A grupo's slot in an aula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrupoAula {
    pub grupo_aula_id: GrupoAulaId,
    pub grupo_id: GrupoId,
    #[serde(default)]
    pub numero_grupo: Option<i32>,
    #[serde(default)]
    pub nome_grupo: Option<String>,
    /// 1 or 2
    pub turno: u8,
    pub ordem_execucao: i32,
    /// `None` until attendance is taken
    #[serde(default)]
    pub presente: Option<bool>,
    #[serde(default)]
    pub horario_inicio: Option<NaiveDateTime>,
    #[serde(default)]
    pub horario_fim: Option<NaiveDateTime>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

/// Practical lab session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AulaPratica {
    pub aula_id: AulaId,
    pub turma_id: TurmaId,
    pub data_aula: NaiveDate,
    #[serde(default)]
    pub numero_aula: Option<i32>,
    #[serde(default)]
    pub tema: Option<String>,
    #[serde(default)]
    pub procedimento: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub grupos_participantes: Vec<GrupoAula>,
    #[serde(default)]
    pub total_grupos_primeiro_turno: i32,
    #[serde(default)]
    pub total_grupos_segundo_turno: i32,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl AulaPratica {
    /// Groups in `turno`, by execution order
    pub fn groups_in_shift(&self, turno: u8) -> Vec<&GrupoAula> {
        let mut groups: Vec<_> = self
            .grupos_participantes
            .iter()
            .filter(|g| g.turno == turno)
            .collect();
        groups.sort_by_key(|g| g.ordem_execucao);
        groups
    }

    /// Groups marked present
    pub fn count_present(&self) -> usize {
        self.grupos_participantes
            .iter()
            .filter(|g| g.presente == Some(true))
            .count()
    }

    /// Groups marked absent; unmarked groups are not counted
    pub fn count_absent(&self) -> usize {
        self.grupos_participantes
            .iter()
            .filter(|g| g.presente == Some(false))
            .count()
    }
}

/// Body for scheduling an aula
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AulaRequest {
    pub turma_id: TurmaId,
    pub data_aula: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_aula: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedimento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grupos_ids: Vec<GrupoId>,
}

/// A grupo ranked for the next aula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrupoPrioridade {
    pub grupo_id: GrupoId,
    pub numero_grupo: i32,
    #[serde(default)]
    pub nome_grupo: Option<String>,
    pub prioridade_atual: i32,
    #[serde(default)]
    pub total_primeiro_turno: i32,
    #[serde(default)]
    pub total_segundo_turno: i32,
    pub turno_sugerido: u8,
    pub ordem_sugerida: i32,
    #[serde(default)]
    pub motivo_prioridade: String,
}

/// Priority ordering computed by the lab service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioridadeGrupos {
    pub turma_id: TurmaId,
    pub grupos_ordenados: Vec<GrupoPrioridade>,
    #[serde(default)]
    pub explicacao: String,
}

/// Account managed by the user service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub tipo: Role,
    #[serde(default)]
    pub ativo: bool,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub curso: Option<String>,
    #[serde(default)]
    pub periodo: Option<String>,
    #[serde(default)]
    pub grupo_id: Option<GrupoId>,
    #[serde(default)]
    pub numero_grupo: Option<i32>,
    #[serde(default)]
    pub nome_grupo: Option<String>,
    #[serde(default)]
    pub nome_turma: Option<String>,
    #[serde(default)]
    pub foto_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Body for creating an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUsuario {
    pub nome: String,
    pub email: String,
    pub username: String,
    pub senha: String,
    pub tipo: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foto_url: Option<String>,
}

/// Partial update of an account; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUsuario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ativo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foto_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turma(ano: i32, semestre: Semestre, turno: Turno) -> Turma {
        Turma {
            turma_id: 1,
            ano,
            semestre,
            turno,
            unidade: Unidade::Bueno,
            dia_semana: DiaSemana::Terca,
            nome_turma: Some("Química Geral".to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_turma_code() {
        assert_eq!(turma(2025, Semestre::Primeiro, Turno::Matutino).code(), "LAB-2025-1-M");
        assert_eq!(turma(2024, Semestre::Segundo, Turno::Noturno).code(), "LAB-2024-2-N");
    }

    #[test]
    fn test_turma_from_service_json() {
        let json = r#"{
            "turmaId": 4, "ano": 2025, "semestre": "segundo", "turno": "vespertino",
            "unidade": "perimetral", "diaSemana": "quinta", "nomeTurma": "Bioquímica",
            "createdAt": "2025-02-01T08:30:00", "updatedAt": null
        }"#;
        let turma: Turma = serde_json::from_str(json).unwrap();
        assert_eq!(turma.dia_semana, DiaSemana::Quinta);
        assert_eq!(turma.code(), "LAB-2025-2-V");
        assert!(turma.created_at.is_some());
    }

    #[test]
    fn test_aula_helpers() {
        let slot = |id, turno, ordem, presente| GrupoAula {
            grupo_aula_id: id,
            grupo_id: id,
            numero_grupo: Some(id as i32),
            nome_grupo: None,
            turno,
            ordem_execucao: ordem,
            presente,
            horario_inicio: None,
            horario_fim: None,
            observacoes: None,
        };
        let aula = AulaPratica {
            aula_id: 1,
            turma_id: 1,
            data_aula: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            numero_aula: Some(1),
            tema: None,
            procedimento: None,
            observacoes: None,
            grupos_participantes: vec![
                slot(1, 1, 2, Some(true)),
                slot(2, 2, 1, Some(false)),
                slot(3, 1, 1, None),
                slot(4, 2, 2, Some(true)),
            ],
            total_grupos_primeiro_turno: 2,
            total_grupos_segundo_turno: 2,
            created_at: None,
            updated_at: None,
        };

        let first: Vec<_> = aula.groups_in_shift(1).iter().map(|g| g.grupo_aula_id).collect();
        assert_eq!(first, vec![3, 1]);
        assert_eq!(aula.count_present(), 2);
        assert_eq!(aula.count_absent(), 1);
    }

    #[test]
    fn test_update_usuario_serializes_only_set_fields() {
        let update = UpdateUsuario {
            tipo: Some(Role::Monitor),
            ativo: Some(false),
            ..UpdateUsuario::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "tipo": "monitor", "ativo": false })
        );
    }

    #[test]
    fn test_grupo_display_name() {
        let grupo: Grupo = serde_json::from_str(
            r#"{"grupoId":9,"turmaId":4,"numeroGrupo":3,"nomeGrupo":null,"ativo":true,
                "totalPrimeiroTurno":2,"totalSegundoTurno":1}"#,
        )
        .unwrap();
        assert_eq!(grupo.display_name(), "Grupo 3");
        assert_eq!(grupo.total_aulas(), 3);
    }
}
