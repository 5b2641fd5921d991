//! REST backend over the game repository.
//!
//! Every response body is an [`ApiResponse`](tictac_session::ApiResponse)
//! envelope, including errors.

mod handlers;
mod response;

use crate::GameRepository;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument};

/// Builds the `/api/games` router.
///
/// The collection is served with and without a trailing slash.
#[instrument(skip(repo), fields(db_path = %repo.db_path()))]
pub fn router(repo: GameRepository) -> Router {
    let state = Arc::new(repo);
    Router::new()
        .route(
            "/api/games",
            get(handlers::list_games).post(handlers::create_game),
        )
        .route(
            "/api/games/",
            get(handlers::list_games).post(handlers::create_game),
        )
        .route(
            "/api/games/{id}",
            get(handlers::get_game)
                .put(handlers::update_game)
                .delete(handlers::delete_game),
        )
        .with_state(state)
}

/// Serves the API on `listener` until the process stops.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
#[instrument(skip_all)]
pub async fn serve(listener: TcpListener, repo: GameRepository) -> std::io::Result<()> {
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, "Serving API at http://{}/api/", addr);
    axum::serve(listener, router(repo)).await
}
