//! Shared fixtures: token minting and an in-process mock of the LAEC services.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use laec::auth::{Role, TokenStore, User};
use laec::storage::MemoryStore;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const SIGNING_SECRET: &[u8] = b"test_secret_key_for_testing_only";

#[derive(Serialize)]
struct Claims {
    sub: String,
    tipo: String,
    iat: i64,
    exp: i64,
}

/// Mint a signed token for `user` expiring at `exp` (seconds since epoch)
pub fn mint_token_with_exp(user: &User, exp: i64) -> String {
    let claims = Claims {
        sub: user.email.clone(),
        tipo: user.role.as_str().to_string(),
        iat: chrono::Utc::now().timestamp(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SIGNING_SECRET),
    )
    .expect("Failed to encode token")
}

/// Mint a token valid for the next hour
pub fn mint_token(user: &User) -> String {
    mint_token_with_exp(user, chrono::Utc::now().timestamp() + 3600)
}

pub fn user(id: i64, role: Role) -> User {
    User {
        id,
        name: format!("Usuário {id}"),
        email: format!("{}{id}@laec.edu", role.as_str()),
        role,
    }
}

/// Memory-backed token store already holding a valid session for `role`
pub fn signed_in_store(role: Role) -> TokenStore {
    let store = TokenStore::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()));
    let user = user(1, role);
    store
        .save(&mint_token(&user), &user, true)
        .expect("Failed to seed session");
    store
}

#[derive(Clone, Default)]
struct MockState {
    authorization: Arc<Mutex<Vec<Option<String>>>>,
    attendance: Arc<Mutex<Vec<(i64, String)>>>,
}

impl MockState {
    fn record(&self, headers: &HeaderMap) -> bool {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let authorized = value.as_deref().is_some_and(|v| v.starts_with("Bearer "));
        self.authorization.lock().unwrap().push(value);
        authorized
    }
}

/// Running mock server
pub struct MockServer {
    pub url: String,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Authorization header of every lab request, in arrival order
    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        self.state.authorization.lock().unwrap().clone()
    }

    /// `(grupoAulaId, presente)` pairs received
    pub fn attendance(&self) -> Vec<(i64, String)> {
        self.state.attendance.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "timestamp": "2025-03-10T10:00:00",
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or_default(),
            "message": message,
        })),
    )
        .into_response()
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "Token ausente ou inválido")
}

fn login_response(id: i64, role: Role, email: &str) -> Value {
    let user = User {
        id,
        name: "Ana Souza".to_string(),
        email: email.to_string(),
        role,
    };
    json!({
        "token": mint_token(&user),
        "tipo": role.as_str().to_uppercase(),
        "nome": user.name,
        "id": id,
        "email": email,
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let senha = body["senha"].as_str().unwrap_or_default();

    match (username, senha) {
        ("indisponivel@laec.edu", _) => {
            error(StatusCode::SERVICE_UNAVAILABLE, "Serviço de usuários indisponível")
        }
        (_, "segredo") => {
            let role = match username.split('@').next().unwrap_or_default() {
                "prof" => Role::Professor,
                "tecnico" => Role::Tecnico,
                _ => Role::Aluno,
            };
            Json(login_response(7, role, username)).into_response()
        }
        _ => error(StatusCode::UNAUTHORIZED, "Credenciais inválidas"),
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if email == "duplicado@laec.edu" {
        return error(StatusCode::CONFLICT, "Email já cadastrado");
    }
    let role = body["tipo"]
        .as_str()
        .and_then(|t| t.parse().ok())
        .unwrap_or(Role::Aluno);
    (StatusCode::CREATED, Json(login_response(8, role, email))).into_response()
}

fn turmas_fixture() -> Vec<Value> {
    vec![
        json!({"turmaId": 1, "ano": 2024, "semestre": "segundo", "turno": "noturno",
               "unidade": "bueno", "diaSemana": "terca", "nomeTurma": "Química Orgânica"}),
        json!({"turmaId": 2, "ano": 2025, "semestre": "primeiro", "turno": "matutino",
               "unidade": "perimetral", "diaSemana": "segunda", "nomeTurma": "Bioquímica",
               "createdAt": "2025-02-01T08:30:00"}),
        json!({"turmaId": 3, "ano": 2025, "semestre": "segundo", "turno": "vespertino",
               "unidade": "bueno", "diaSemana": "quinta", "nomeTurma": null}),
    ]
}

async fn list_turmas(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !state.record(&headers) {
        return unauthorized();
    }
    let turmas: Vec<Value> = turmas_fixture()
        .into_iter()
        .filter(|t| {
            query
                .get("ano")
                .is_none_or(|ano| t["ano"].to_string() == *ano)
        })
        .filter(|t| {
            query
                .get("semestre")
                .is_none_or(|s| t["semestre"].as_str() == Some(s.as_str()))
        })
        .collect();
    Json(turmas).into_response()
}

async fn get_turma(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.record(&headers) {
        return unauthorized();
    }
    let found = turmas_fixture()
        .into_iter()
        .find(|t| t["turmaId"].to_string() == id);
    match found {
        Some(turma) => Json(turma).into_response(),
        None => error(
            StatusCode::NOT_FOUND,
            &format!("Turma não encontrada com id: {id}"),
        ),
    }
}

async fn delete_turma(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !state.record(&headers) {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn prioridade(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(turma_id): Path<i64>,
) -> Response {
    if !state.record(&headers) {
        return unauthorized();
    }
    Json(json!({
        "turmaId": turma_id,
        "gruposOrdenados": [
            {"grupoId": 12, "numeroGrupo": 2, "nomeGrupo": "Grupo 2", "prioridadeAtual": 1,
             "totalPrimeiroTurno": 1, "totalSegundoTurno": 3, "turnoSugerido": 1,
             "ordemSugerida": 1, "motivoPrioridade": "Menos aulas no 1º turno"},
            {"grupoId": 11, "numeroGrupo": 1, "nomeGrupo": "Grupo 1", "prioridadeAtual": 2,
             "totalPrimeiroTurno": 3, "totalSegundoTurno": 1, "turnoSugerido": 2,
             "ordemSugerida": 1, "motivoPrioridade": "Menos aulas no 2º turno"}
        ],
        "explicacao": "Ordenado por prioridade atual"
    }))
    .into_response()
}

async fn set_grupo_active(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if !state.record(&headers) {
        return unauthorized();
    }
    Json(json!({
        "grupoId": id, "turmaId": 2, "numeroGrupo": 1, "nomeGrupo": "Grupo 1",
        "prioridadeAtual": 1, "totalFaltas": 0, "totalPrimeiroTurno": 0,
        "totalSegundoTurno": 0, "ultimaPosicao": null,
        "ativo": body["ativo"].as_bool().unwrap_or_default()
    }))
    .into_response()
}

async fn mark_attendance(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !state.record(&headers) {
        return unauthorized();
    }
    let presente = query.get("presente").cloned().unwrap_or_default();
    state.attendance.lock().unwrap().push((id, presente));
    StatusCode::OK.into_response()
}

async fn users_by_role(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(tipo): Path<String>,
) -> Response {
    if !state.record(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"id": 21, "nome": "Caio Lima", "email": "caio@laec.edu", "username": "caio",
         "tipo": tipo, "ativo": true, "createdAt": "2025-01-15T09:00:00",
         "updatedAt": "2025-01-15T09:00:00"}
    ]))
    .into_response()
}

/// Start the mock on an ephemeral port
pub async fn spawn_mock() -> MockServer {
    let state = MockState::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/turmas", get(list_turmas))
        .route("/api/turmas/{id}", get(get_turma).delete(delete_turma))
        .route("/api/grupos/turma/{id}/prioridade", get(prioridade))
        .route("/api/grupos/{id}/ativo", patch(set_grupo_active))
        .route("/api/aulas/presenca/{id}", put(mark_attendance))
        .route("/api/users/tipo/{tipo}", get(users_by_role))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("No local address");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });

    MockServer {
        url: format!("http://{addr}"),
        state,
        handle,
    }
}
