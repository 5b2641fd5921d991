//! The in-memory game: new or existing.

use crate::{GameId, GameRecord, GameSummary};
use tictac_game::{GameError, TurnLog};
use tracing::instrument;

/// One game as held in memory.
///
/// A `New` session has never been saved. An `Existing` session mirrors a
/// stored game and keeps its identity through resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Unsaved game.
    New {
        /// Moves and cursor.
        log: TurnLog,
    },
    /// Game loaded from or saved to the backend.
    Existing {
        /// Identity, title and timestamps.
        game: GameSummary,
        /// Moves and cursor.
        log: TurnLog,
    },
}

impl Session {
    /// Fresh unsaved session with an empty log.
    pub fn new() -> Self {
        Self::New {
            log: TurnLog::new(),
        }
    }

    /// Existing session built from a stored record, fully played back.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] when the stored turns are not a legal game.
    #[instrument(skip(record), fields(game_id = *record.id()))]
    pub fn from_record(record: &GameRecord) -> Result<Self, GameError> {
        Ok(Self::Existing {
            game: record.summary(),
            log: record.turn_log()?,
        })
    }

    /// Moves and cursor.
    pub fn log(&self) -> &TurnLog {
        match self {
            Self::New { log } | Self::Existing { log, .. } => log,
        }
    }

    pub(crate) fn log_mut(&mut self) -> &mut TurnLog {
        match self {
            Self::New { log } | Self::Existing { log, .. } => log,
        }
    }

    /// Stored identity, if saved.
    pub fn summary(&self) -> Option<&GameSummary> {
        match self {
            Self::New { .. } => None,
            Self::Existing { game, .. } => Some(game),
        }
    }

    /// Backend id, if saved.
    pub fn id(&self) -> Option<GameId> {
        self.summary().map(|g| *g.id())
    }

    /// Saved title, if any.
    pub fn title(&self) -> Option<&str> {
        self.summary().map(|g| g.title().as_str())
    }

    /// True for a session that was never saved.
    pub fn is_new(&self) -> bool {
        matches!(self, Self::New { .. })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
