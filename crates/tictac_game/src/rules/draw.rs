//! Draw detection for tic-tac-toe.

use crate::BOARD_CELLS;
use tracing::instrument;

/// True when all cells have been played (`cursor == 9`) and nobody won.
#[instrument]
pub fn is_draw(cursor: usize, has_winner: bool) -> bool {
    cursor == BOARD_CELLS && !has_winner
}
