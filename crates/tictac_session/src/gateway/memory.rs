//! In-memory gateway for offline play and tests.

use super::GameGateway;
use crate::{GameId, GamePayload, GameRecord, GameSummary, GatewayError, TurnRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

#[derive(Debug, Default)]
struct Store {
    games: BTreeMap<GameId, GameRecord>,
    next_game_id: GameId,
    next_turn_id: i64,
    failure: Option<String>,
}

impl Store {
    fn check_failure(&self) -> Result<(), GatewayError> {
        match &self.failure {
            Some(message) => Err(GatewayError::Transport(message.clone())),
            None => Ok(()),
        }
    }

    fn turn_records(&mut self, payload: &GamePayload) -> Vec<TurnRecord> {
        payload
            .turns()
            .iter()
            .enumerate()
            .map(|(order, mv)| {
                self.next_turn_id += 1;
                TurnRecord::new(self.next_turn_id, order as i64, mv.mark(), mv.row(), mv.col())
            })
            .collect()
    }
}

/// Gateway that keeps games in process memory.
///
/// Behaves like the REST backend: ids count up from 1, `turn_order` follows
/// submission order, unknown ids are errors. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    store: Arc<Mutex<Store>>,
}

impl InMemoryGateway {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail with `message` until cleared with `None`.
    #[instrument(skip(self))]
    pub async fn set_failure(&self, message: Option<String>) {
        self.store.lock().await.failure = message;
    }

    /// Number of stored games.
    pub async fn count(&self) -> usize {
        self.store.lock().await.games.len()
    }
}

#[async_trait]
impl GameGateway for InMemoryGateway {
    #[instrument(skip(self))]
    async fn list_games(&self) -> Result<Vec<GameSummary>, GatewayError> {
        let store = self.store.lock().await;
        store.check_failure()?;
        Ok(store.games.values().map(GameRecord::summary).collect())
    }

    #[instrument(skip(self))]
    async fn get_game(&self, id: GameId) -> Result<GameRecord, GatewayError> {
        let store = self.store.lock().await;
        store.check_failure()?;
        store
            .games
            .get(&id)
            .cloned()
            .ok_or_else(|| GatewayError::Api("Resource not found".to_string()))
    }

    #[instrument(skip(self, payload), fields(title = %payload.title()))]
    async fn create_game(&self, payload: &GamePayload) -> Result<GameRecord, GatewayError> {
        let mut store = self.store.lock().await;
        store.check_failure()?;
        if payload.title().trim().is_empty() {
            return Err(GatewayError::Api("Title must not be empty".to_string()));
        }

        store.next_game_id += 1;
        let id = store.next_game_id;
        let now = Utc::now();
        let turns = store.turn_records(payload);
        let record = GameRecord::new(id, payload.title().clone(), now, now, turns);
        store.games.insert(id, record.clone());

        info!(game_id = id, "Game created");
        Ok(record)
    }

    #[instrument(skip(self, payload), fields(title = %payload.title()))]
    async fn update_game(&self, id: GameId, payload: &GamePayload) -> Result<GameRecord, GatewayError> {
        let mut store = self.store.lock().await;
        store.check_failure()?;
        let created_at = match store.games.get(&id) {
            Some(existing) => *existing.created_at(),
            None => return Err(GatewayError::Api("Resource not found".to_string())),
        };

        let turns = store.turn_records(payload);
        let record = GameRecord::new(id, payload.title().clone(), created_at, Utc::now(), turns);
        store.games.insert(id, record.clone());

        debug!(turns = record.turns().len(), "Game updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, id: GameId) -> Result<GameId, GatewayError> {
        let mut store = self.store.lock().await;
        store.check_failure()?;
        match store.games.remove(&id) {
            Some(_) => {
                info!("Game deleted");
                Ok(id)
            }
            None => Err(GatewayError::Api("Unknown id".to_string())),
        }
    }
}
