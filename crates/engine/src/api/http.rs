//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use taleturn_domain::{Action, ActionDescription, SessionSetup, SessionToken, SessionView};

use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::session::TurnError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{token}", get(get_session))
        .route("/api/sessions/{token}/actions", post(execute_action))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Sessions
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub theme: String,
    pub difficulty: String,
    pub player_class: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_token: String,
    pub initial_scenario: String,
}

async fn create_session(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), ApiError> {
    let setup = SessionSetup::parse(body.theme, body.difficulty, body.player_class)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let session = app.use_cases.session.create.execute(setup).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_token: session.token().to_string(),
            initial_scenario: session.initial_scenario().to_string(),
        }),
    ))
}

async fn get_session(
    State(app): State<Arc<App>>,
    Path(token): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let token = parse_token(token)?;
    let view = app
        .use_cases
        .session
        .get_view
        .execute(&token)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

// =============================================================================
// Turns
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteActionRequest {
    pub dice_type: String,
    pub action_description: String,
}

async fn execute_action(
    State(app): State<Arc<App>>,
    Path(token): Path<String>,
    Json(body): Json<ExecuteActionRequest>,
) -> Result<(StatusCode, Json<Action>), ApiError> {
    let token = parse_token(token)?;
    let description = ActionDescription::new(body.action_description)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let action = app
        .use_cases
        .session
        .execute_action
        .execute(&token, &body.dice_type, description)
        .await?;

    Ok((StatusCode::CREATED, Json(action)))
}

fn parse_token(raw: String) -> Result<SessionToken, ApiError> {
    // A blank token can never name a session.
    SessionToken::parse(raw).map_err(|_| ApiError::NotFound)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Internal(String),
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<TurnError> for ApiError {
    fn from(e: TurnError) -> Self {
        match e {
            TurnError::SessionNotFound(_) => ApiError::NotFound,
            TurnError::InvalidDice(e) => ApiError::BadRequest(e.to_string()),
            // The engine assigns orders itself, so this is never the caller's fault.
            TurnError::InvalidAction(e) => ApiError::Internal(e.to_string()),
            TurnError::Repo(e) => e.into(),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}
