//! Saved games listing.

use crate::{Completion, GameId, GameSummary, Lifecycle, RequestTicket};
use tracing::{debug, info, instrument, warn};

/// The list of saved games and its refresh/delete bookkeeping.
///
/// Refreshes are last-request-wins. Deletes are tracked per request with no
/// de-duplication; each one completes on its own.
#[derive(Debug, Clone, Default)]
pub struct GamesList {
    games: Vec<GameSummary>,
    lifecycle: Lifecycle,
    pending_fetch: Option<RequestTicket>,
    deleting: Vec<GameId>,
    tickets: u64,
}

impl GamesList {
    /// Empty list, idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Listings from the last applied refresh.
    pub fn games(&self) -> &[GameSummary] {
        &self.games
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Message of the last failure, while in the error state.
    pub fn error(&self) -> Option<&str> {
        match &self.lifecycle {
            Lifecycle::Error(message) => Some(message),
            _ => None,
        }
    }

    /// True while at least one delete of `id` is in flight.
    pub fn is_deleting(&self, id: GameId) -> bool {
        self.deleting.contains(&id)
    }

    /// Starts a refresh, superseding any refresh in flight.
    #[instrument(skip(self))]
    pub fn fetch_start(&mut self) -> RequestTicket {
        let ticket = RequestTicket::issue(&mut self.tickets);
        self.pending_fetch = Some(ticket);
        self.lifecycle = Lifecycle::Loading;
        debug!(%ticket, "Games list refresh started");
        ticket
    }

    /// Replaces the listings if `ticket` is the newest refresh.
    #[instrument(skip(self, games), fields(count = games.len()))]
    pub fn fetch_succeeded(&mut self, ticket: RequestTicket, games: Vec<GameSummary>) -> Completion {
        if self.pending_fetch != Some(ticket) {
            debug!("Ignoring stale games list");
            return Completion::Stale;
        }
        self.pending_fetch = None;
        self.games = games;
        self.lifecycle = Lifecycle::Success;
        info!(count = self.games.len(), "Games list refreshed");
        Completion::Applied
    }

    /// Records a failed refresh if `ticket` is the newest; listings are kept.
    #[instrument(skip(self, message))]
    pub fn fetch_failed(&mut self, ticket: RequestTicket, message: impl Into<String>) -> Completion {
        if self.pending_fetch != Some(ticket) {
            debug!("Ignoring stale games list failure");
            return Completion::Stale;
        }
        self.pending_fetch = None;
        let message = message.into();
        warn!(%message, "Games list refresh failed");
        self.lifecycle = Lifecycle::Error(message.clone());
        Completion::Failed(message)
    }

    /// Marks a delete of `id` as in flight.
    #[instrument(skip(self))]
    pub fn delete_start(&mut self, id: GameId) {
        self.deleting.push(id);
        debug!(in_flight = self.deleting.len(), "Delete started");
    }

    /// Drops the listing for a deleted game.
    #[instrument(skip(self))]
    pub fn delete_succeeded(&mut self, id: GameId) {
        self.finish_delete(id);
        self.games.retain(|g| *g.id() != id);
        info!("Game deleted");
    }

    /// Records a failed delete.
    #[instrument(skip(self, message))]
    pub fn delete_failed(&mut self, id: GameId, message: impl Into<String>) -> Completion {
        self.finish_delete(id);
        let message = message.into();
        warn!(%message, "Delete failed");
        self.lifecycle = Lifecycle::Error(message.clone());
        Completion::Failed(message)
    }

    fn finish_delete(&mut self, id: GameId) {
        if let Some(pos) = self.deleting.iter().position(|d| *d == id) {
            self.deleting.remove(pos);
        }
    }
}
