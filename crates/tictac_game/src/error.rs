//! Errors raised by turn log operations.

use derive_more::{Display, Error};

/// Reasons a turn log operation was refused.
///
/// Every refusal leaves the log and cursor exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// Coordinates fall outside the 3x3 board.
    #[display("cell ({row}, {col}) is outside the 3x3 board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The cell already holds a mark at the current cursor.
    #[display("cell ({row}, {col}) is already occupied")]
    CellOccupied {
        /// Row of the occupied cell.
        row: usize,
        /// Column of the occupied cell.
        col: usize,
    },

    /// The previous move already won or drew the game.
    #[display("game is already over")]
    GameOver,

    /// Rewind target past the end of the log.
    #[display("turn {index} does not exist (log has {len} turns)")]
    CursorOutOfRange {
        /// Requested cursor.
        index: usize,
        /// Current log length.
        len: usize,
    },

    /// A stored log that cannot have come from legal play.
    #[display("malformed turn log at turn {turn}: {reason}")]
    MalformedLog {
        /// Zero-based index of the offending move.
        turn: usize,
        /// What is wrong with it.
        reason: String,
    },
}
