//! Route definitions and handlers
//!
//! Two endpoints drive the whole workflow:
//!
//! - `POST /api/v1/tasks/start`   - begin a run from a goal string
//! - `POST /api/v1/tasks/approve` - deliver the approval decision for a paused run
//!
//! Both reply with a tagged outcome: `{"kind": "final", ...}` when the run
//! reached its terminal state, `{"kind": "needs_approval", ...}` when it is
//! paused. `GET /health` reports liveness.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::error::{ApiError, ApiResult};
use crate::config::AgentConfig;
use crate::state::TaskState;
use crate::workflow::{AgentOutcome, TaskRunner};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<TaskRunner>,
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub input: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub run_id: String,
    /// Raw decision value; `true`/`false` or `{"approve": bool}`
    pub approve: Value,
}

/// Tagged outcome body shared by both endpoints.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeResponse {
    Final {
        state: TaskState,
    },
    NeedsApproval {
        #[serde(rename = "runId")]
        run_id: String,
        steps: Vec<String>,
    },
}

impl From<AgentOutcome> for OutcomeResponse {
    fn from(outcome: AgentOutcome) -> Self {
        match outcome {
            AgentOutcome::Final(state) => OutcomeResponse::Final { state },
            AgentOutcome::NeedsApproval { run_id, steps } => {
                OutcomeResponse::NeedsApproval { run_id, steps }
            }
        }
    }
}

/// Build the API router over a compiled workflow runner.
pub fn create_router(runner: Arc<TaskRunner>, config: &AgentConfig) -> Router {
    let cors = match &config.allowed_origin {
        Some(origin) => match origin.parse::<axum::http::HeaderValue>() {
            Ok(origin) => CorsLayer::new()
                .allow_origin([origin])
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
            Err(_) => {
                tracing::warn!("ALLOWED_ORIGIN is not a valid origin, allowing any");
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/tasks/start", post(start_task))
        .route("/api/v1/tasks/approve", post(approve_task))
        .with_state(AppState { runner })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `POST /api/v1/tasks/start`
///
/// Any string is forwarded to the workflow; the validate stage decides whether
/// it is workable, so an unusable goal comes back as a cancelled final state
/// rather than an HTTP error.
async fn start_task(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> ApiResult<Json<OutcomeResponse>> {
    tracing::info!(chars = request.input.len(), "starting task run");
    let outcome = state.runner.start(&request.input).await?;
    Ok(Json(outcome.into()))
}

/// `POST /api/v1/tasks/approve`
async fn approve_task(
    State(state): State<AppState>,
    Json(request): Json<ApproveRequest>,
) -> ApiResult<Json<OutcomeResponse>> {
    if request.run_id.is_empty() {
        return Err(ApiError::BadRequest("runId must not be empty".to_string()));
    }

    tracing::info!(run_id = %request.run_id, "delivering approval decision");
    let outcome = state.runner.resume(&request.run_id, request.approve).await?;
    Ok(Json(outcome.into()))
}
