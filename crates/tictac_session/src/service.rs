//! Async driver tying the controllers to a gateway.

use crate::{
    Completion, GameGateway, GameId, GamesList, SaveTarget, SessionController, SessionError,
};
use std::sync::Arc;
use tictac_game::Move;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Everything the front end renders: the open game and the games list.
#[derive(Debug, Clone, Default)]
pub struct ServiceState {
    /// Open game and its lifecycle.
    pub current: SessionController,
    /// Saved games.
    pub games: GamesList,
}

/// Runs user actions against the controllers and the gateway.
///
/// Each network action is two-phase: the start transition is applied under
/// the lock, the lock is released for the gateway call, and the completion
/// is applied under the lock again. Overlapping loads or refreshes are
/// therefore possible, and the controllers drop all but the newest.
#[derive(Debug)]
pub struct GameService<G> {
    gateway: Arc<G>,
    state: Arc<Mutex<ServiceState>>,
}

impl<G> Clone for GameService<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
        }
    }
}

impl<G: GameGateway> GameService<G> {
    /// Creates a service with a new unsaved game and an empty list.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway: Arc::new(gateway),
            state: Arc::new(Mutex::new(ServiceState::default())),
        }
    }

    /// The gateway in use.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Copy of the current state for rendering.
    pub async fn snapshot(&self) -> ServiceState {
        self.state.lock().await.clone()
    }

    /// Claims a cell in the open game.
    ///
    /// # Errors
    ///
    /// See [`SessionController::claim_cell`].
    pub async fn claim_cell(&self, row: usize, col: usize) -> Result<Move, SessionError> {
        self.state.lock().await.current.claim_cell(row, col)
    }

    /// Moves the open game's cursor.
    ///
    /// # Errors
    ///
    /// See [`SessionController::rewind_to`].
    pub async fn rewind_to(&self, index: usize) -> Result<(), SessionError> {
        self.state.lock().await.current.rewind_to(index)
    }

    /// Clears the open game's moves, keeping its identity.
    ///
    /// # Errors
    ///
    /// See [`SessionController::reset`].
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.state.lock().await.current.reset()
    }

    /// Replaces the open game with a fresh unsaved one.
    pub async fn new_game(&self) {
        self.state.lock().await.current.new_game();
    }

    /// Loads a stored game into the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] if a save is in flight. Gateway
    /// failures are not errors here; they land on the lifecycle and come
    /// back as [`Completion::Failed`].
    #[instrument(skip(self))]
    pub async fn load_game(&self, id: GameId) -> Result<Completion, SessionError> {
        let ticket = self.state.lock().await.current.fetch_start(id)?;

        let result = self.gateway.get_game(id).await;

        let mut state = self.state.lock().await;
        let completion = match result {
            Ok(record) => state.current.fetch_succeeded(ticket, &record),
            Err(e) => state.current.fetch_failed(ticket, e.message()),
        };
        debug!(?completion, "Load completed");
        Ok(completion)
    }

    /// Saves the open game under `title`, then refreshes the list.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] or [`SessionError::EmptyTitle`] when
    /// the save cannot start.
    #[instrument(skip(self))]
    pub async fn save_current(&self, title: &str) -> Result<Completion, SessionError> {
        let request = self.state.lock().await.current.save_start(title)?;

        let result = match request.target {
            SaveTarget::Create => self.gateway.create_game(&request.payload).await,
            SaveTarget::Update(id) => self.gateway.update_game(id, &request.payload).await,
        };

        let completion = {
            let mut state = self.state.lock().await;
            match result {
                Ok(record) => state.current.save_succeeded(request.ticket, &record),
                Err(e) => state.current.save_failed(request.ticket, e.message()),
            }
        };

        if completion == Completion::Applied {
            info!("Saved; refreshing games list");
            self.refresh_games().await;
        }
        Ok(completion)
    }

    /// Reloads the games list.
    #[instrument(skip(self))]
    pub async fn refresh_games(&self) -> Completion {
        let ticket = self.state.lock().await.games.fetch_start();

        let result = self.gateway.list_games().await;

        let mut state = self.state.lock().await;
        match result {
            Ok(games) => state.games.fetch_succeeded(ticket, games),
            Err(e) => state.games.fetch_failed(ticket, e.message()),
        }
    }

    /// Deletes a saved game, then refreshes the list.
    ///
    /// The open session is left alone even if it is the deleted game.
    #[instrument(skip(self))]
    pub async fn delete_game(&self, id: GameId) -> Completion {
        self.state.lock().await.games.delete_start(id);

        let result = self.gateway.delete_game(id).await;

        let completion = {
            let mut state = self.state.lock().await;
            match result {
                Ok(deleted) => {
                    if deleted != id {
                        warn!(requested = id, deleted, "Backend confirmed a different id");
                    }
                    state.games.delete_succeeded(id);
                    Completion::Applied
                }
                Err(e) => state.games.delete_failed(id, e.message()),
            }
        };

        if completion == Completion::Applied {
            self.refresh_games().await;
        }
        completion
    }
}
