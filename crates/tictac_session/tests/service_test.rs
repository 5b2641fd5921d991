//! Tests for the async service against the in-memory gateway.

use async_trait::async_trait;
use std::time::Duration;
use tictac_game::{GameStatus, Mark};
use tictac_session::{
    Completion, GameGateway, GameId, GamePayload, GameRecord, GameService, GameSummary,
    GatewayError, InMemoryGateway, Lifecycle, SessionError,
};

async fn play(service: &GameService<InMemoryGateway>, cells: &[(usize, usize)]) {
    for &(row, col) in cells {
        service.claim_cell(row, col).await.expect("Legal move");
    }
}

#[tokio::test]
async fn test_save_new_game_creates_and_lists() {
    let service = GameService::new(InMemoryGateway::new());
    play(&service, &[(0, 0), (1, 1)]).await;

    let completion = service.save_current("  opening  ").await.expect("Save starts");
    assert_eq!(completion, Completion::Applied);

    let state = service.snapshot().await;
    assert_eq!(*state.current.lifecycle(), Lifecycle::Success);
    assert_eq!(state.current.session().id(), Some(1));
    assert_eq!(state.current.session().title(), Some("opening"));
    assert_eq!(state.current.session().log().cursor(), 2);
    assert_eq!(state.games.games().len(), 1);
    assert_eq!(state.games.games()[0].title(), "opening");
}

#[tokio::test]
async fn test_second_save_updates_same_game() {
    let service = GameService::new(InMemoryGateway::new());
    play(&service, &[(0, 0)]).await;
    service.save_current("first").await.expect("Save starts");

    play(&service, &[(2, 2)]).await;
    service.save_current("second").await.expect("Save starts");

    assert_eq!(service.gateway().count().await, 1);
    let state = service.snapshot().await;
    assert_eq!(state.current.session().id(), Some(1));
    assert_eq!(state.current.session().log().len(), 2);
    assert_eq!(state.games.games()[0].title(), "second");
}

#[tokio::test]
async fn test_save_keeps_moves_past_cursor() {
    let service = GameService::new(InMemoryGateway::new());
    play(&service, &[(0, 0), (1, 1), (2, 2)]).await;
    service.rewind_to(1).await.expect("In range");

    service.save_current("rewound").await.expect("Save starts");

    let record = service.gateway().get_game(1).await.expect("Stored");
    assert_eq!(record.turns().len(), 3);
}

#[tokio::test]
async fn test_blank_title_refused() {
    let service = GameService::new(InMemoryGateway::new());
    let result = service.save_current("   ").await;
    assert_eq!(result, Err(SessionError::EmptyTitle));
    assert_eq!(service.gateway().count().await, 0);
}

#[tokio::test]
async fn test_load_replaces_session() {
    let gateway = InMemoryGateway::new();
    let payload = GamePayload::new(
        "stored".to_string(),
        vec![
            tictac_game::Move::new(Mark::Circle, 0, 0).expect("On board"),
            tictac_game::Move::new(Mark::Cross, 1, 0).expect("On board"),
            tictac_game::Move::new(Mark::Circle, 0, 1).expect("On board"),
        ],
    );
    gateway.create_game(&payload).await.expect("Stored");

    let service = GameService::new(gateway);
    play(&service, &[(2, 2)]).await;

    let completion = service.load_game(1).await.expect("Fetch starts");
    assert_eq!(completion, Completion::Applied);

    let state = service.snapshot().await;
    assert!(!state.current.session().is_new());
    assert_eq!(state.current.session().log().cursor(), 3);
    assert_eq!(
        state.current.status(),
        GameStatus::InProgress { next: Mark::Cross }
    );
}

#[tokio::test]
async fn test_failed_load_keeps_session() {
    let gateway = InMemoryGateway::new();
    let service = GameService::new(gateway.clone());
    play(&service, &[(1, 1)]).await;

    gateway.set_failure(Some("connection refused".to_string())).await;
    let completion = service.load_game(1).await.expect("Fetch starts");
    assert!(matches!(completion, Completion::Failed(_)));

    let state = service.snapshot().await;
    assert!(state.current.error().is_some_and(|m| m.contains("connection refused")));
    assert!(state.current.session().is_new());
    assert_eq!(state.current.session().log().len(), 1);
}

#[tokio::test]
async fn test_unknown_id_fails_load() {
    let service = GameService::new(InMemoryGateway::new());
    let completion = service.load_game(42).await.expect("Fetch starts");
    assert_eq!(
        completion,
        Completion::Failed("Resource not found".to_string())
    );
}

#[tokio::test]
async fn test_failed_save_can_be_retried() {
    let gateway = InMemoryGateway::new();
    let service = GameService::new(gateway.clone());
    play(&service, &[(0, 0)]).await;

    gateway.set_failure(Some("offline".to_string())).await;
    let completion = service.save_current("retry me").await.expect("Save starts");
    assert!(matches!(completion, Completion::Failed(_)));
    assert!(service.snapshot().await.current.session().is_new());

    gateway.set_failure(None).await;
    let completion = service.save_current("retry me").await.expect("Save starts");
    assert_eq!(completion, Completion::Applied);
}

#[tokio::test]
async fn test_delete_refreshes_list() {
    let service = GameService::new(InMemoryGateway::new());
    service.save_current("one").await.expect("Save starts");
    service.new_game().await;
    service.save_current("two").await.expect("Save starts");
    assert_eq!(service.snapshot().await.games.games().len(), 2);

    assert_eq!(service.delete_game(1).await, Completion::Applied);

    let state = service.snapshot().await;
    let ids: Vec<GameId> = state.games.games().iter().map(|g| *g.id()).collect();
    assert_eq!(ids, vec![2]);
    assert!(!state.games.is_deleting(1));
}

#[tokio::test]
async fn test_delete_unknown_id_fails() {
    let service = GameService::new(InMemoryGateway::new());
    let completion = service.delete_game(9).await;
    assert_eq!(completion, Completion::Failed("Unknown id".to_string()));
    assert_eq!(service.snapshot().await.games.error(), Some("Unknown id"));
}

#[tokio::test]
async fn test_reset_keeps_saved_identity() {
    let service = GameService::new(InMemoryGateway::new());
    play(&service, &[(0, 0), (1, 1)]).await;
    service.save_current("kept").await.expect("Save starts");

    service.reset().await.expect("Reset allowed");

    let state = service.snapshot().await;
    assert_eq!(state.current.session().id(), Some(1));
    assert_eq!(state.current.session().title(), Some("kept"));
    assert_eq!(state.current.session().log().len(), 0);
    assert_eq!(state.current.session().log().cursor(), 0);

    play(&service, &[(2, 2)]).await;
    service.save_current("kept").await.expect("Save starts");
    assert_eq!(service.gateway().count().await, 1);
    let record = service.gateway().get_game(1).await.expect("Stored");
    assert_eq!(record.turns().len(), 1);
}

/// Gateway that confirms deletes with a different id than requested.
#[derive(Debug, Clone, Default)]
struct MisreportingGateway {
    inner: InMemoryGateway,
}

#[async_trait]
impl GameGateway for MisreportingGateway {
    async fn list_games(&self) -> Result<Vec<GameSummary>, GatewayError> {
        self.inner.list_games().await
    }

    async fn get_game(&self, id: GameId) -> Result<GameRecord, GatewayError> {
        self.inner.get_game(id).await
    }

    async fn create_game(&self, payload: &GamePayload) -> Result<GameRecord, GatewayError> {
        self.inner.create_game(payload).await
    }

    async fn update_game(
        &self,
        id: GameId,
        payload: &GamePayload,
    ) -> Result<GameRecord, GatewayError> {
        self.inner.update_game(id, payload).await
    }

    async fn delete_game(&self, id: GameId) -> Result<GameId, GatewayError> {
        self.inner.delete_game(id).await.map(|deleted| deleted + 100)
    }
}

#[tokio::test]
async fn test_delete_clears_marker_for_requested_id() {
    let service = GameService::new(MisreportingGateway::default());
    service.save_current("doomed").await.expect("Save starts");

    assert_eq!(service.delete_game(1).await, Completion::Applied);

    let state = service.snapshot().await;
    assert!(!state.games.is_deleting(1));
    assert!(!state.games.is_deleting(101));
    assert!(state.games.games().is_empty());
}

/// Gateway whose `get_game` takes longer for lower ids.
#[derive(Debug, Clone, Default)]
struct SlowGateway {
    inner: InMemoryGateway,
}

#[async_trait]
impl GameGateway for SlowGateway {
    async fn list_games(&self) -> Result<Vec<GameSummary>, GatewayError> {
        self.inner.list_games().await
    }

    async fn get_game(&self, id: GameId) -> Result<GameRecord, GatewayError> {
        let delay = if id == 1 { 200 } else { 10 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.inner.get_game(id).await
    }

    async fn create_game(&self, payload: &GamePayload) -> Result<GameRecord, GatewayError> {
        self.inner.create_game(payload).await
    }

    async fn update_game(
        &self,
        id: GameId,
        payload: &GamePayload,
    ) -> Result<GameRecord, GatewayError> {
        self.inner.update_game(id, payload).await
    }

    async fn delete_game(&self, id: GameId) -> Result<GameId, GatewayError> {
        self.inner.delete_game(id).await
    }
}

async fn slow_service_with_two_games() -> GameService<SlowGateway> {
    let gateway = SlowGateway::default();
    for title in ["slow", "fast"] {
        let payload = GamePayload::new(
            title.to_string(),
            vec![tictac_game::Move::new(Mark::Circle, 0, 0).expect("On board")],
        );
        gateway.create_game(&payload).await.expect("Stored");
    }
    GameService::new(gateway)
}

#[tokio::test]
async fn test_last_load_wins() {
    let service = slow_service_with_two_games().await;

    let slow = {
        let service = service.clone();
        tokio::spawn(async move { service.load_game(1).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let fast = service.load_game(2).await.expect("Fetch starts");
    let slow = slow.await.expect("Task joins").expect("Fetch starts");

    assert_eq!(fast, Completion::Applied);
    assert_eq!(slow, Completion::Stale);
    let state = service.snapshot().await;
    assert_eq!(state.current.session().title(), Some("fast"));
}

#[tokio::test]
async fn test_new_game_discards_pending_load() {
    let service = slow_service_with_two_games().await;

    let pending = {
        let service = service.clone();
        tokio::spawn(async move { service.load_game(1).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    service.new_game().await;
    service.claim_cell(2, 2).await.expect("Legal move");

    let completion = pending.await.expect("Task joins").expect("Fetch starts");
    assert_eq!(completion, Completion::Stale);

    let state = service.snapshot().await;
    assert_eq!(*state.current.lifecycle(), Lifecycle::Idle);
    assert!(state.current.session().is_new());
    assert_eq!(state.current.session().log().len(), 1);
}

#[tokio::test]
async fn test_moves_refused_while_loading() {
    let service = slow_service_with_two_games().await;

    let pending = {
        let service = service.clone();
        tokio::spawn(async move { service.load_game(1).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let result = service.claim_cell(1, 1).await;
    assert!(matches!(result, Err(SessionError::Busy { .. })));

    pending.await.expect("Task joins").expect("Fetch starts");
}
