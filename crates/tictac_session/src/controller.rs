//! Session controller: the state machine around the open game.

use crate::{GameId, GamePayload, GameRecord, Session, SessionError};
use tictac_game::{Board, GameStatus, Move};
use tracing::{debug, info, instrument, warn};

/// Network lifecycle of the open game (or of the games list).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// A save is in flight.
    Saving,
    /// The last request completed.
    Success,
    /// The last request failed with this message.
    Error(String),
}

impl Lifecycle {
    /// True while a fetch or save is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Saving)
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Saving => write!(f, "saving"),
            Self::Success => write!(f, "success"),
            Self::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Identifies one started request so its completion can be matched up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Hands out tickets in increasing order.
    pub(crate) fn issue(counter: &mut u64) -> Self {
        *counter += 1;
        Self(*counter)
    }
}

impl std::fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a completion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The result was applied.
    Applied,
    /// The request (or the data it returned) failed; the message is now on
    /// the lifecycle.
    Failed(String),
    /// A newer request or a new game superseded this one; ignored.
    Stale,
}

/// Whether a save creates a new game or overwrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    /// `POST` a new game.
    Create,
    /// `PUT` over the game with this id.
    Update(GameId),
}

/// Everything the gateway needs to perform a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// Ticket to hand back on completion.
    pub ticket: RequestTicket,
    /// Create or update.
    pub target: SaveTarget,
    /// Title and full turn log.
    pub payload: GamePayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Fetch(RequestTicket),
    Save(RequestTicket),
}

/// Owns the open [`Session`] and its load/save lifecycle.
///
/// States: `idle -> loading -> {success, error}` and
/// `idle/success/error -> saving -> {success, error}`. Move, rewind and reset
/// work in every state except `loading` and never touch the lifecycle.
#[derive(Debug, Clone, Default)]
pub struct SessionController {
    session: Session,
    lifecycle: Lifecycle,
    pending: Option<Pending>,
    tickets: u64,
}

impl SessionController {
    /// New unsaved session, idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// The open game.
    pub fn session(&self) -> &Session {
        &self.session
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

    /// Board at the cursor.
    pub fn board(&self) -> Board {
        self.session.log().board()
    }

    /// Status at the cursor.
    pub fn status(&self) -> GameStatus {
        self.session.log().status()
    }

    fn ensure_not_loading(&self) -> Result<(), SessionError> {
        if self.lifecycle == Lifecycle::Loading {
            warn!("Refusing edit while loading");
            return Err(SessionError::Busy {
                state: self.lifecycle.clone(),
            });
        }
        Ok(())
    }

    /// Claims a cell for the player to move.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while loading, otherwise whatever the turn log
    /// refuses. The session is unchanged on error.
    #[instrument(skip(self), fields(state = %self.lifecycle))]
    pub fn claim_cell(&mut self, row: usize, col: usize) -> Result<Move, SessionError> {
        self.ensure_not_loading()?;
        Ok(self.session.log_mut().claim_cell(row, col)?)
    }

    /// Moves the cursor to `index` (`0..=len`).
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while loading, or an out-of-range index.
    #[instrument(skip(self), fields(state = %self.lifecycle))]
    pub fn rewind_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_not_loading()?;
        Ok(self.session.log_mut().rewind_to(index)?)
    }

    /// Clears the moves but keeps the saved identity, if any.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while loading.
    #[instrument(skip(self), fields(state = %self.lifecycle, game_id = ?self.session.id()))]
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.ensure_not_loading()?;
        self.session.log_mut().clear();
        info!("Session reset");
        Ok(())
    }

    /// Drops the open game for a fresh unsaved one.
    ///
    /// Clears any error, returns to idle and makes every outstanding
    /// completion stale.
    #[instrument(skip(self), fields(state = %self.lifecycle))]
    pub fn new_game(&mut self) {
        self.session = Session::new();
        self.lifecycle = Lifecycle::Idle;
        self.pending = None;
        info!("Started new game");
    }

    /// Starts loading a stored game.
    ///
    /// A fetch started while another is loading supersedes it.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while saving.
    #[instrument(skip(self), fields(state = %self.lifecycle))]
    pub fn fetch_start(&mut self, id: GameId) -> Result<RequestTicket, SessionError> {
        if self.lifecycle == Lifecycle::Saving {
            warn!("Refusing fetch while saving");
            return Err(SessionError::Busy {
                state: self.lifecycle.clone(),
            });
        }
        let ticket = RequestTicket::issue(&mut self.tickets);
        if let Some(Pending::Fetch(older)) = self.pending {
            debug!(%older, newer = %ticket, "Superseding in-flight fetch");
        }
        self.pending = Some(Pending::Fetch(ticket));
        self.lifecycle = Lifecycle::Loading;
        info!(%ticket, "Fetch started");
        Ok(ticket)
    }

    /// Applies a fetched game if `ticket` is still the newest fetch.
    ///
    /// The session becomes `Existing`, fully played back. A record whose
    /// turns are not a legal game is treated as a failed fetch.
    #[instrument(skip(self, record), fields(game_id = *record.id()))]
    pub fn fetch_succeeded(&mut self, ticket: RequestTicket, record: &GameRecord) -> Completion {
        if self.pending != Some(Pending::Fetch(ticket)) {
            debug!("Ignoring stale fetch result");
            return Completion::Stale;
        }
        self.apply_record(record)
    }

    /// Records a failed fetch if `ticket` is still the newest fetch.
    ///
    /// The session value is left as it was.
    #[instrument(skip(self, message))]
    pub fn fetch_failed(&mut self, ticket: RequestTicket, message: impl Into<String>) -> Completion {
        if self.pending != Some(Pending::Fetch(ticket)) {
            debug!("Ignoring stale fetch failure");
            return Completion::Stale;
        }
        self.fail(message.into())
    }

    /// Starts saving the open game under `title`.
    ///
    /// The payload carries the whole log, including moves past the cursor.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while loading or saving,
    /// [`SessionError::EmptyTitle`] for a blank title.
    #[instrument(skip(self), fields(state = %self.lifecycle))]
    pub fn save_start(&mut self, title: &str) -> Result<SaveRequest, SessionError> {
        if self.lifecycle.is_busy() {
            warn!("Refusing save while busy");
            return Err(SessionError::Busy {
                state: self.lifecycle.clone(),
            });
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(SessionError::EmptyTitle);
        }

        let ticket = RequestTicket::issue(&mut self.tickets);
        let target = match self.session.id() {
            Some(id) => SaveTarget::Update(id),
            None => SaveTarget::Create,
        };
        let payload = GamePayload::new(title.to_string(), self.session.log().turns().to_vec());

        self.pending = Some(Pending::Save(ticket));
        self.lifecycle = Lifecycle::Saving;
        info!(%ticket, ?target, turns = payload.turns().len(), "Save started");
        Ok(SaveRequest {
            ticket,
            target,
            payload,
        })
    }

    /// Adopts the saved game returned by the backend.
    ///
    /// Moves claimed while the save was in flight are not part of the
    /// stored game and are dropped.
    #[instrument(skip(self, record), fields(game_id = *record.id()))]
    pub fn save_succeeded(&mut self, ticket: RequestTicket, record: &GameRecord) -> Completion {
        if self.pending != Some(Pending::Save(ticket)) {
            debug!("Ignoring stale save result");
            return Completion::Stale;
        }
        if let Ok(stored) = record.turn_log() {
            let dropped = unsaved_moves(self.session.log().turns(), stored.turns());
            if dropped > 0 {
                warn!(dropped, "Moves made during save replaced by stored game");
            }
        }
        self.apply_record(record)
    }

    /// Records a failed save; the session value is left as it was.
    #[instrument(skip(self, message))]
    pub fn save_failed(&mut self, ticket: RequestTicket, message: impl Into<String>) -> Completion {
        if self.pending != Some(Pending::Save(ticket)) {
            debug!("Ignoring stale save failure");
            return Completion::Stale;
        }
        self.fail(message.into())
    }

    fn apply_record(&mut self, record: &GameRecord) -> Completion {
        self.pending = None;
        match Session::from_record(record) {
            Ok(session) => {
                self.session = session;
                self.lifecycle = Lifecycle::Success;
                info!(turns = self.session.log().len(), "Session now backed by stored game");
                Completion::Applied
            }
            Err(e) => {
                warn!(error = %e, "Stored game is not a legal game");
                let message = format!("Game {} could not be loaded: {}", record.id(), e);
                self.lifecycle = Lifecycle::Error(message.clone());
                Completion::Failed(message)
            }
        }
    }

    fn fail(&mut self, message: String) -> Completion {
        self.pending = None;
        warn!(%message, "Request failed");
        self.lifecycle = Lifecycle::Error(message.clone());
        Completion::Failed(message)
    }
}

/// Number of `local` moves that are not a prefix of `stored`.
fn unsaved_moves(local: &[Move], stored: &[Move]) -> usize {
    let shared = local
        .iter()
        .zip(stored)
        .take_while(|(a, b)| a == b)
        .count();
    local.len() - shared
}
