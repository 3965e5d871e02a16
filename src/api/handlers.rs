//! HTTP request handlers

use super::types::{
    AnswerRequest, ErrorResponse, ModelInfo, ModelsResponse, StartRequest, SuccessResponse,
};
use super::AppState;
use crate::interview::{Event, TransitionError};
use crate::runtime::{SessionSnapshot, SharedRuntime};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(render_session).delete(delete_session))
        // User actions
        .route("/api/sessions/:id/start", post(start_session))
        .route("/api/sessions/:id/answer", post(answer_question))
        .route("/api/sessions/:id/restart", post(restart_session))
        // Model info
        .route("/api/models", get(list_models))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionSnapshot>) {
    let snapshot = state.sessions.create().await;
    (StatusCode::CREATED, Json(snapshot))
}

/// Draw the current screen again; while collecting this asks for a fresh question
async fn render_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    dispatch(&state, &id, Event::Render).await
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if state.sessions.remove(&id).await {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

// ============================================================
// User Actions
// ============================================================

async fn start_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StartRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    dispatch(&state, &id, Event::start(req.question_count, req.symptoms)).await
}

async fn answer_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    dispatch(&state, &id, Event::answer(req.answer)).await
}

async fn restart_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    dispatch(&state, &id, Event::Restart).await
}

async fn dispatch(
    state: &AppState,
    id: &str,
    event: Event,
) -> Result<Json<SessionSnapshot>, AppError> {
    let runtime = lookup(state, id).await?;
    let mut runtime = runtime.lock().await;
    runtime.handle(event).await?;
    Ok(Json(runtime.snapshot()))
}

async fn lookup(state: &AppState, id: &str) -> Result<SharedRuntime, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

// ============================================================
// Model Info
// ============================================================

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let models = state
        .sessions
        .models()
        .pairs()
        .iter()
        .map(|pair| ModelInfo {
            key: pair.key.clone(),
            encoder: pair.encoder_key.clone(),
        })
        .collect();
    Json(ModelsResponse { models })
}

async fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    NotFound(String),
    Conflict(String),
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        AppError::Conflict(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
