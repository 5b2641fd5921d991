//! Envelope replies and the blocking bridge to diesel.

use crate::{DbError, GameRepository};
use axum::{Json, http::StatusCode};
use std::sync::Arc;
use tictac_session::ApiResponse;
use tracing::{error, warn};

/// Status code plus envelope; what every handler returns.
pub(super) type ApiReply<T> = (StatusCode, Json<ApiResponse<T>>);

pub(super) fn success<T>(status: StatusCode, data: T) -> ApiReply<T> {
    (status, Json(ApiResponse::success(data)))
}

pub(super) fn failure<T>(status: StatusCode, message: impl Into<String>) -> ApiReply<T> {
    (status, Json(ApiResponse::error(message)))
}

/// Constraint violations are the client's fault, anything else is ours.
pub(super) fn db_failure<T>(err: &DbError) -> ApiReply<T> {
    if err.constraint {
        warn!(error = %err, "Write refused by schema");
        failure(StatusCode::BAD_REQUEST, err.message.clone())
    } else {
        error!(error = %err, "Database failure");
        failure(StatusCode::INTERNAL_SERVER_ERROR, err.message.clone())
    }
}

/// Runs a repository call on the blocking pool.
pub(super) async fn blocking<T, F>(repo: &Arc<GameRepository>, f: F) -> Result<T, DbError>
where
    T: Send + 'static,
    F: FnOnce(&GameRepository) -> Result<T, DbError> + Send + 'static,
{
    let repo = Arc::clone(repo);
    tokio::task::spawn_blocking(move || f(&repo))
        .await
        .map_err(|e| DbError::new(format!("Database task failed: {}", e)))?
}
