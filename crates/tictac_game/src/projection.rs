//! Board projection from a turn log prefix.

use crate::{Board, Move};
use tracing::instrument;

/// Builds the board as it stands after `turns[..cursor]`.
///
/// Starts from an empty board and writes each move's mark in order. A cursor
/// past the end of the log projects the whole log.
#[instrument(skip(turns), fields(len = turns.len()))]
pub fn project(turns: &[Move], cursor: usize) -> Board {
    let mut board = Board::new();
    for mv in turns.iter().take(cursor) {
        board.place(*mv);
    }
    board
}
