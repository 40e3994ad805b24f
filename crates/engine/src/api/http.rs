//! HTTP routes.
//!
//! Every JSON response uses one envelope:
//! `{"ok": true, "data": ...}` or `{"ok": false, "error": {"code", "message"}}`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use cookflow_domain::{ChallengeId, RecipeId, UserId};
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::challenge::ProgressError;
use crate::use_cases::cooking::CookingError;
use crate::use_cases::validation::ProgressUpdateInput;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/challenges", get(list_challenges))
        .route("/api/challenges/my", get(my_challenges))
        .route("/api/challenges/{id}", get(get_challenge))
        .route("/api/challenges/{id}/start", post(start_challenge))
        .route("/api/challenges/{id}/progress", post(update_progress))
        .route("/api/cooking/complete/{recipe_id}", post(complete_cooking))
}

async fn health() -> &'static str {
    "OK"
}

fn ok<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "ok": true, "data": data }))).into_response()
}

// =============================================================================
// Caller identity
// =============================================================================

/// The authenticated caller, resolved from `X-User-Id`.
pub struct CurrentUser(pub UserId);

impl FromRequestParts<Arc<App>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &Arc<App>) -> Result<Self, Self::Rejection> {
        let user_id: UserId = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .ok_or(ApiError::Unauthorized)?;

        match app.repositories.user.get(user_id).await? {
            Some(user) => Ok(CurrentUser(user.id)),
            None => Err(ApiError::Unauthorized),
        }
    }
}

// =============================================================================
// Challenges
// =============================================================================

async fn list_challenges(State(app): State<Arc<App>>) -> Result<Response, ApiError> {
    let items = app.use_cases.challenge.catalog.list().await?;
    Ok(ok(StatusCode::OK, json!({ "items": items })))
}

async fn get_challenge(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_challenge_id(&id)?;
    let challenge = app.use_cases.challenge.catalog.get(id).await?;
    Ok(ok(StatusCode::OK, challenge))
}

async fn start_challenge(
    State(app): State<Arc<App>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_challenge_id(&id)?;
    let outcome = app.use_cases.challenge.start.execute(user_id, id).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(ok(status, outcome.progress))
}

async fn update_progress(
    State(app): State<Arc<App>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = parse_challenge_id(&id)?;
    let input = parse_update_body(&body)?;
    let progress = app
        .use_cases
        .challenge
        .update
        .execute(user_id, id, &input)
        .await?;
    Ok(ok(StatusCode::OK, progress))
}

async fn my_challenges(
    State(app): State<Arc<App>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Response, ApiError> {
    let items = app.use_cases.challenge.active.execute(user_id).await?;
    Ok(ok(StatusCode::OK, json!({ "items": items })))
}

// =============================================================================
// Cooking
// =============================================================================

async fn complete_cooking(
    State(app): State<Arc<App>>,
    CurrentUser(user_id): CurrentUser,
    Path(recipe_id): Path<String>,
) -> Result<Response, ApiError> {
    let recipe_id: RecipeId = recipe_id.parse().map_err(|_| ApiError::RecipeNotFound)?;
    let tally = app
        .use_cases
        .cooking
        .complete
        .execute(user_id, recipe_id)
        .await?;
    Ok(ok(
        StatusCode::OK,
        json!({
            "message": "Cooking recorded",
            "progress_updated": tally.progress_updated,
            "challenges_completed": tally.challenges_completed,
        }),
    ))
}

// =============================================================================
// Request parsing
// =============================================================================

/// Malformed ids cannot name an existing challenge.
fn parse_challenge_id(raw: &str) -> Result<ChallengeId, ApiError> {
    raw.parse().map_err(|_| ApiError::ChallengeNotFound)
}

fn parse_update_body(body: &[u8]) -> Result<ProgressUpdateInput, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("Expected a JSON object".into()))?;
    if !value.is_object() {
        return Err(ApiError::BadRequest("Expected a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    ChallengeNotFound,
    RecipeNotFound,
    NotStarted,
    Validation(String),
    BadRequest(String),
    Expired { ends_at: DateTime<Utc> },
    Conflict,
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::ChallengeNotFound | ApiError::RecipeNotFound => StatusCode::NOT_FOUND,
            ApiError::NotStarted | ApiError::Validation(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Expired { .. } | ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::ChallengeNotFound => "CHALLENGE_NOT_FOUND",
            ApiError::RecipeNotFound => "RECIPE_NOT_FOUND",
            ApiError::NotStarted => "CHALLENGE_NOT_STARTED",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Expired { .. } => "CHALLENGE_EXPIRED",
            ApiError::Conflict => "PROGRESS_CONFLICT",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Authentication required".into(),
            ApiError::ChallengeNotFound => "Challenge not found".into(),
            ApiError::RecipeNotFound => "Recipe not found".into(),
            ApiError::NotStarted => "Start the challenge first".into(),
            ApiError::Validation(msg) | ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Expired { ends_at } => format!("Challenge expired at {}", ends_at.to_rfc3339()),
            ApiError::Conflict => "Progress changed concurrently, retry the request".into(),
            ApiError::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }
        let body = json!({
            "ok": false,
            "error": { "code": self.code(), "message": self.message() },
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ProgressError> for ApiError {
    fn from(e: ProgressError) -> Self {
        match e {
            ProgressError::ChallengeNotFound(_) => ApiError::ChallengeNotFound,
            ProgressError::NotStarted(_) => ApiError::NotStarted,
            ProgressError::Validation(e) => ApiError::Validation(e.to_string()),
            ProgressError::Domain(e) => ApiError::Validation(e.to_string()),
            ProgressError::Expired { ends_at } => ApiError::Expired { ends_at },
            ProgressError::Conflict => ApiError::Conflict,
            ProgressError::Repo(e) => e.into(),
        }
    }
}

impl From<CookingError> for ApiError {
    fn from(e: CookingError) -> Self {
        match e {
            CookingError::RecipeNotFound(_) => ApiError::RecipeNotFound,
            CookingError::Progress(e) => e.into(),
            CookingError::Repo(e) => e.into(),
        }
    }
}
