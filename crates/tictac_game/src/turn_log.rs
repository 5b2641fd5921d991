//! Rewindable turn log.

use crate::rules;
use crate::{Board, GameError, GameStatus, Mark, Move, project};
use tracing::{debug, info, instrument, warn};

/// Ordered moves of one game plus a cursor into them.
///
/// The cursor (`next_turn_index`) marks how much of the log is currently on
/// the board. Moving it backwards never drops moves; claiming a cell while
/// rewound discards everything past the cursor and starts a new branch.
///
/// Invariant: `0 <= cursor <= turns.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TurnLog {
    turns: Vec<Move>,
    cursor: usize,
}

impl TurnLog {
    /// Creates an empty log with the cursor at the start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log from stored moves, fully played back.
    ///
    /// The moves must be a legal game: marks alternate starting with
    /// Circle, no cell is claimed twice and nothing follows a finished
    /// game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MalformedLog`] naming the first bad move.
    #[instrument(skip(turns), fields(len = turns.len()))]
    pub fn from_stored(turns: Vec<Move>) -> Result<Self, GameError> {
        for (idx, mv) in turns.iter().enumerate() {
            let status = rules::status(&turns, idx);
            let reason = match status {
                GameStatus::InProgress { next } if next != mv.mark() => {
                    Some(format!("expected {} to move, found {}", next, mv.mark()))
                }
                GameStatus::InProgress { .. } => {
                    let board = project(&turns, idx);
                    (!board.is_empty(mv.row(), mv.col()))
                        .then(|| format!("cell ({}, {}) claimed twice", mv.row(), mv.col()))
                }
                finished => Some(format!("move after game ended ({})", finished)),
            };
            if let Some(reason) = reason {
                warn!(turn = idx, %reason, "Rejecting stored turn log");
                return Err(GameError::MalformedLog { turn: idx, reason });
            }
        }

        let cursor = turns.len();
        debug!(cursor, "Loaded stored turn log");
        Ok(Self { turns, cursor })
    }

    /// Every move in the log, including any past the cursor.
    pub fn turns(&self) -> &[Move] {
        &self.turns
    }

    /// Index of the next turn; the board shows `turns[..cursor]`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of moves, regardless of cursor.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when no move was ever made.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Moves currently on the board.
    pub fn visible(&self) -> &[Move] {
        &self.turns[..self.cursor]
    }

    /// Board at the cursor, recomputed from the log.
    pub fn board(&self) -> Board {
        project(&self.turns, self.cursor)
    }

    /// Mark to move at the cursor.
    pub fn current_player(&self) -> Mark {
        rules::current_player(&self.turns, self.cursor)
    }

    /// Game status at the cursor.
    pub fn status(&self) -> GameStatus {
        rules::status(&self.turns, self.cursor)
    }

    /// Claims `(row, col)` for the player to move.
    ///
    /// Drops any moves past the cursor, appends the new move and advances
    /// the cursor.
    ///
    /// # Errors
    ///
    /// Refused without any change when the coordinates are off the board,
    /// the cell is taken at the cursor, or the game is already decided.
    #[instrument(skip(self), fields(cursor = self.cursor, len = self.turns.len()))]
    pub fn claim_cell(&mut self, row: usize, col: usize) -> Result<Move, GameError> {
        let status = self.status();
        if status.is_over() {
            debug!(?status, "Claim refused: game over");
            return Err(GameError::GameOver);
        }

        let mv = Move::new(self.current_player(), row, col)?;
        if !self.board().is_empty(row, col) {
            debug!("Claim refused: cell occupied");
            return Err(GameError::CellOccupied { row, col });
        }

        let discarded = self.turns.len() - self.cursor;
        self.turns.truncate(self.cursor);
        self.turns.push(mv);
        self.cursor += 1;

        info!(%mv, discarded, cursor = self.cursor, "Cell claimed");
        Ok(mv)
    }

    /// Moves the cursor to `index` without touching the moves.
    ///
    /// `index` ranges over `0..=len`: zero is the empty board, `len` the
    /// latest move.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CursorOutOfRange`] for `index > len`.
    #[instrument(skip(self), fields(len = self.turns.len()))]
    pub fn rewind_to(&mut self, index: usize) -> Result<(), GameError> {
        if index > self.turns.len() {
            return Err(GameError::CursorOutOfRange {
                index,
                len: self.turns.len(),
            });
        }
        self.cursor = index;
        debug!(cursor = index, "Cursor moved");
        Ok(())
    }

    /// Drops every move and returns the cursor to the start.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.turns.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_log_is_empty() {
        let log = TurnLog::new();
        assert!(log.is_empty());
        assert_eq!(log.cursor(), 0);
        assert_eq!(log.current_player(), Mark::Circle);
    }

    #[test]
    fn test_claim_advances_and_alternates() {
        let mut log = TurnLog::new();
        let first = log.claim_cell(1, 1).unwrap();
        let second = log.claim_cell(0, 0).unwrap();
        assert_eq!(first.mark(), Mark::Circle);
        assert_eq!(second.mark(), Mark::Cross);
        assert_eq!(log.cursor(), 2);
        assert_eq!(log.visible(), log.turns());
    }

    #[test]
    fn test_out_of_bounds_claim_is_noop() {
        let mut log = TurnLog::new();
        assert_eq!(
            log.claim_cell(0, 3),
            Err(GameError::OutOfBounds { row: 0, col: 3 })
        );
        assert_eq!(log, TurnLog::new());
    }

    #[test]
    fn test_rewind_past_end_refused() {
        let mut log = TurnLog::new();
        log.claim_cell(0, 0).unwrap();
        assert_eq!(
            log.rewind_to(2),
            Err(GameError::CursorOutOfRange { index: 2, len: 1 })
        );
        assert_eq!(log.cursor(), 1);
    }

    #[test]
    fn test_clear() {
        let mut log = TurnLog::new();
        log.claim_cell(0, 0).unwrap();
        log.clear();
        assert_eq!(log, TurnLog::new());
    }

    #[test]
    fn test_from_stored_rejects_wrong_opener() {
        let turns = vec![Move::new(Mark::Cross, 0, 0).unwrap()];
        assert!(matches!(
            TurnLog::from_stored(turns),
            Err(GameError::MalformedLog { turn: 0, .. })
        ));
    }

    #[test]
    fn test_from_stored_rejects_double_claim() {
        let turns = vec![
            Move::new(Mark::Circle, 0, 0).unwrap(),
            Move::new(Mark::Cross, 0, 0).unwrap(),
        ];
        assert!(matches!(
            TurnLog::from_stored(turns),
            Err(GameError::MalformedLog { turn: 1, .. })
        ));
    }
}
