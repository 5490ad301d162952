//! HTTP surface over [`Rewards`].
//!
//! Every `/api` route resolves the caller from the `x-user-id` header, set by the
//! identity layer in front of this service. Domain errors map onto status codes in
//! [`ApiError`].

mod achievements;
mod journal;
mod points;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::rewards::error::RewardsError;
use crate::rewards::types::UserId;
use crate::rewards::Rewards;
use crate::store::SqliteStore;

/// Header carrying the authenticated caller's id.
pub const USER_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub rewards: Rewards<SqliteStore>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/points",
            get(points::get_points)
                .post(points::add_points)
                .put(points::check_in),
        )
        .route("/api/points/history", get(points::history))
        .route(
            "/api/achievements",
            get(achievements::list)
                .post(achievements::unlock)
                .put(achievements::update_progress),
        )
        .route("/api/journal/activity", post(journal::record_activity))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// The authenticated caller, extracted from [`USER_HEADER`].
pub struct Caller(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(RewardsError::Unauthenticated)?;
        Ok(Caller(UserId::parse(raw)?))
    }
}

/// A [`RewardsError`] rendered as `{ error, details }` JSON.
#[derive(Debug)]
pub struct ApiError(pub RewardsError);

impl From<RewardsError> for ApiError {
    fn from(err: RewardsError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(RewardsError::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(RewardsError::InvalidInput(rejection.body_text()))
    }
}

impl ApiError {
    fn status(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            RewardsError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthorized"),
            RewardsError::NotFound(_) => (StatusCode::NOT_FOUND, "not found"),
            RewardsError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid input"),
            RewardsError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
            }
            RewardsError::Corrupt(_) | RewardsError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, retryable = self.0.is_retryable(), "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }
        (status, Json(json!({ "error": error, "details": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
