//! Route handlers for `/api/games`.

use super::response::{ApiReply, blocking, db_failure, failure, success};
use crate::GameRepository;
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;
use tictac_session::{GameId, GamePayload, GameRecord, GameSummary};
use tracing::{debug, info, instrument, warn};

type Repo = State<Arc<GameRepository>>;

const NOT_FOUND: &str = "Resource not found";
const UNKNOWN_ID: &str = "Unknown id";

fn parse_id<T>(path: Result<Path<GameId>, PathRejection>) -> Result<GameId, ApiReply<T>> {
    path.map(|Path(id)| id).map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Bad game id");
        failure(StatusCode::BAD_REQUEST, rejection.body_text())
    })
}

/// Title must be non-blank; move coordinates are checked while decoding.
fn parse_payload<T>(body: Result<Json<GamePayload>, JsonRejection>) -> Result<GamePayload, ApiReply<T>> {
    let Json(payload) = body.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Bad game body");
        failure(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;
    if payload.title().trim().is_empty() {
        warn!("Rejecting blank title");
        return Err(failure(StatusCode::BAD_REQUEST, "Title must not be empty"));
    }
    Ok(payload)
}

#[instrument(skip(repo))]
pub(super) async fn list_games(State(repo): Repo) -> ApiReply<Vec<GameSummary>> {
    match blocking(&repo, |r| r.list_games()).await {
        Ok(games) => {
            debug!(count = games.len(), "Listing games");
            success(StatusCode::OK, games)
        }
        Err(e) => db_failure(&e),
    }
}

#[instrument(skip(repo, body))]
pub(super) async fn create_game(
    State(repo): Repo,
    body: Result<Json<GamePayload>, JsonRejection>,
) -> ApiReply<GameRecord> {
    let payload = match parse_payload(body) {
        Ok(payload) => payload,
        Err(reply) => return reply,
    };

    match blocking(&repo, move |r| r.create_game(&payload)).await {
        Ok(record) => {
            info!(game_id = *record.id(), "Created game");
            success(StatusCode::CREATED, record)
        }
        Err(e) => db_failure(&e),
    }
}

#[instrument(skip(repo, path))]
pub(super) async fn get_game(
    State(repo): Repo,
    path: Result<Path<GameId>, PathRejection>,
) -> ApiReply<GameRecord> {
    let id = match parse_id(path) {
        Ok(id) => id,
        Err(reply) => return reply,
    };

    match blocking(&repo, move |r| r.get_game(id)).await {
        Ok(Some(record)) => success(StatusCode::OK, record),
        Ok(None) => failure(StatusCode::NOT_FOUND, NOT_FOUND),
        Err(e) => db_failure(&e),
    }
}

#[instrument(skip(repo, path, body))]
pub(super) async fn update_game(
    State(repo): Repo,
    path: Result<Path<GameId>, PathRejection>,
    body: Result<Json<GamePayload>, JsonRejection>,
) -> ApiReply<GameRecord> {
    let id = match parse_id(path) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let payload = match parse_payload(body) {
        Ok(payload) => payload,
        Err(reply) => return reply,
    };

    match blocking(&repo, move |r| r.update_game(id, &payload)).await {
        Ok(Some(record)) => {
            info!(game_id = id, "Updated game");
            success(StatusCode::OK, record)
        }
        // Unknown ids on update are a bad request, not a missing resource.
        Ok(None) => failure(StatusCode::BAD_REQUEST, NOT_FOUND),
        Err(e) => db_failure(&e),
    }
}

#[instrument(skip(repo, path))]
pub(super) async fn delete_game(
    State(repo): Repo,
    path: Result<Path<GameId>, PathRejection>,
) -> ApiReply<GameId> {
    let id = match parse_id(path) {
        Ok(id) => id,
        Err(reply) => return reply,
    };

    match blocking(&repo, move |r| r.delete_game(id)).await {
        Ok(true) => {
            info!(game_id = id, "Deleted game");
            success(StatusCode::OK, id)
        }
        Ok(false) => failure(StatusCode::BAD_REQUEST, UNKNOWN_ID),
        Err(e) => db_failure(&e),
    }
}
