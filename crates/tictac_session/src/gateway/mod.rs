//! Persistence gateway: the boundary to wherever games are stored.

mod memory;
mod rest;

pub use memory::InMemoryGateway;
pub use rest::RestGateway;

use crate::{GameId, GamePayload, GameRecord, GameSummary, GatewayError};
use async_trait::async_trait;

/// Fetches and stores games as named turn logs.
///
/// Implementations report transport and application failures alike as
/// [`GatewayError`]; callers only look at the message.
#[async_trait]
pub trait GameGateway: Send + Sync {
    /// All saved games, without moves.
    async fn list_games(&self) -> Result<Vec<GameSummary>, GatewayError>;

    /// One saved game with its moves.
    async fn get_game(&self, id: GameId) -> Result<GameRecord, GatewayError>;

    /// Stores a new game and returns it as saved.
    async fn create_game(&self, payload: &GamePayload) -> Result<GameRecord, GatewayError>;

    /// Replaces title and moves of an existing game.
    async fn update_game(&self, id: GameId, payload: &GamePayload) -> Result<GameRecord, GatewayError>;

    /// Removes a game and returns its id.
    async fn delete_game(&self, id: GameId) -> Result<GameId, GatewayError>;
}
