//! Win detection for tic-tac-toe.

use crate::{Board, Cell, Mark};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Checks whether `mark` holds a full line on `board`.
///
/// Scans rows, then columns, then both diagonals, looking for `size`
/// consecutive cells with `mark`. Works for any square board size.
#[instrument(skip(board))]
pub fn has_won(mark: Mark, board: &Board) -> bool {
    let size = board.size();
    let target = Some(Cell::Occupied(mark));
    let full = |cells: &mut dyn Iterator<Item = (usize, usize)>| {
        let mut consecutive = 0;
        for (r, c) in cells {
            consecutive = if board.get(r, c) == target {
                consecutive + 1
            } else {
                0
            };
            if consecutive == size {
                return true;
            }
        }
        false
    };

    // Rows
    for r in 0..size {
        if full(&mut (0..size).map(|c| (r, c))) {
            return true;
        }
    }
    // Columns
    for c in 0..size {
        if full(&mut (0..size).map(|r| (r, c))) {
            return true;
        }
    }
    // Diagonals
    full(&mut (0..size).map(|i| (i, i))) || full(&mut (0..size).map(|i| (i, size - i - 1)))
}

/// Returns the mark holding a full line, if any.
#[instrument(skip(board))]
pub fn winner(board: &Board) -> Option<Mark> {
    Mark::iter().find(|mark| has_won(*mark, board))
}
