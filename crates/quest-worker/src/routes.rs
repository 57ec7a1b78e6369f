//! Axum router: routes, request parsing, CORS middleware.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::header::ORIGIN;
use axum::http::{Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::config::WorkerConfig;
use crate::cors::cors_headers;
use crate::error::WorkerResult;
use crate::guard::{screen, Rejection};
use crate::maintenance::{RESET_STATEMENT, SEED_STATEMENT};
use crate::upstream::{RunOutcome, Upstream};

pub const HEALTH_TEXT: &str = "quest-worker ok";

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<WorkerConfig>,
    pub upstream: Upstream,
}

impl AppState {
    pub fn new(config: WorkerConfig) -> WorkerResult<Self> {
        let config = Arc::new(config);
        let upstream = Upstream::new(Arc::clone(&config))?;
        Ok(Self { config, upstream })
    }
}

/// Build the worker router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/", post(run).fallback(not_found))
        .route("/run", post(run).fallback(not_found))
        .route("/submit", post(submit).fallback(not_found))
        .route("/seed", post(seed).fallback(not_found))
        .route("/reset", post(reset).fallback(not_found))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

/// Attach CORS headers to every response; answer preflights directly.
async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let headers = cors_headers(origin.as_deref(), &state.config.allowed_origins);

    if request.method() == Method::OPTIONS {
        return (StatusCode::NO_CONTENT, headers).into_response();
    }

    let mut response = next.run(request).await;
    response.headers_mut().extend(headers);
    response
}

/// Lenient view of a run/submit body. Anything unparseable is an empty body.
#[derive(Debug, Default)]
struct RunRequest {
    cypher: String,
    params: Value,
    quest_id: Option<Value>,
}

impl RunRequest {
    fn parse(body: &[u8]) -> Self {
        let Ok(Value::Object(mut body)) = serde_json::from_slice::<Value>(body) else {
            return Self {
                params: Value::Object(Map::new()),
                ..Self::default()
            };
        };

        let cypher = match body.remove("cypher") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        };
        let params = match body.remove("params") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(params) => params,
        };
        let quest_id = body.remove("questId").filter(|v| !v.is_null());

        Self {
            cypher,
            params,
            quest_id,
        }
    }
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn rejected(rejection: Rejection) -> Response {
    if rejection == Rejection::WriteOrProcedure {
        warn!("rejected write/procedure statement");
    }
    reply(
        StatusCode::BAD_REQUEST,
        json!({ "ok": false, "error": rejection.to_string() }),
    )
}

async fn health() -> &'static str {
    HEALTH_TEXT
}

async fn not_found(uri: Uri) -> Response {
    reply(
        StatusCode::NOT_FOUND,
        json!({ "ok": false, "error": "Not Found", "path": uri.path() }),
    )
}

async fn run(State(state): State<AppState>, body: Bytes) -> WorkerResult<Response> {
    let request = RunRequest::parse(&body);
    let statement = match screen(&request.cypher) {
        Ok(statement) => statement,
        Err(rejection) => return Ok(rejected(rejection)),
    };

    Ok(match state.upstream.run(&statement, &request.params).await? {
        RunOutcome::Success(success) => {
            reply(StatusCode::OK, json!({ "records": success.records }))
        }
        RunOutcome::Failure(failure) => {
            reply(StatusCode::INTERNAL_SERVER_ERROR, failure.envelope())
        }
    })
}

async fn submit(State(state): State<AppState>, body: Bytes) -> WorkerResult<Response> {
    let request = RunRequest::parse(&body);
    let statement = match screen(&request.cypher) {
        Ok(statement) => statement,
        Err(rejection) => return Ok(rejected(rejection)),
    };

    Ok(match state.upstream.run(&statement, &request.params).await? {
        RunOutcome::Success(success) => {
            let mut body = Map::new();
            if let Some(quest_id) = request.quest_id {
                body.insert("questId".into(), quest_id);
            }
            body.insert("records".into(), json!(success.records));
            reply(StatusCode::OK, Value::Object(body))
        }
        RunOutcome::Failure(failure) => {
            reply(StatusCode::INTERNAL_SERVER_ERROR, failure.envelope())
        }
    })
}

async fn seed(State(state): State<AppState>) -> WorkerResult<Response> {
    info!("seeding demo dataset");
    maintenance(&state, SEED_STATEMENT).await
}

async fn reset(State(state): State<AppState>) -> WorkerResult<Response> {
    info!("resetting database");
    maintenance(&state, RESET_STATEMENT).await
}

async fn maintenance(state: &AppState, statement: &str) -> WorkerResult<Response> {
    let params = Value::Object(Map::new());
    Ok(match state.upstream.run(statement, &params).await? {
        RunOutcome::Success(success) => reply(StatusCode::OK, success.envelope()),
        RunOutcome::Failure(failure) => {
            reply(StatusCode::INTERNAL_SERVER_ERROR, failure.envelope())
        }
    })
}
