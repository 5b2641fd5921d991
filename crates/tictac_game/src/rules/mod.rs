//! Game rules for tic-tac-toe.
//!
//! Pure functions over a turn log prefix. Win and draw are always judged for
//! the player who just moved, since a move can only end the game in its own
//! mark's favour.

mod draw;
mod turn;
mod win;

pub use draw::is_draw;
pub use turn::current_player;
pub use win::{has_won, winner};

use crate::{GameStatus, Move, project};
use tracing::{debug, instrument};

/// Evaluates the game at `cursor`.
#[instrument(skip(turns), fields(len = turns.len()))]
pub fn status(turns: &[Move], cursor: usize) -> GameStatus {
    let next = current_player(turns, cursor);
    let previous = next.opponent();
    let board = project(turns, cursor);
    let moves_played = cursor.min(turns.len());

    let won = moves_played > 0 && has_won(previous, &board);
    let status = if won {
        GameStatus::Won(previous)
    } else if is_draw(moves_played, won) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress { next }
    };
    debug!(?status, "Evaluated status");
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mark;

    fn log(cells: &[(usize, usize)]) -> Vec<Move> {
        let mut mark = Mark::Circle;
        cells
            .iter()
            .map(|&(r, c)| {
                let mv = Move::new(mark, r, c).unwrap();
                mark = mark.opponent();
                mv
            })
            .collect()
    }

    #[test]
    fn test_empty_log_in_progress() {
        assert_eq!(status(&[], 0), GameStatus::InProgress { next: Mark::Circle });
    }

    #[test]
    fn test_top_row_win() {
        let turns = log(&[(0, 0), (1, 1), (0, 1), (1, 0), (0, 2)]);
        assert_eq!(status(&turns, 5), GameStatus::Won(Mark::Circle));
        // One step back the win is gone.
        assert_eq!(status(&turns, 4), GameStatus::InProgress { next: Mark::Circle });
    }

    #[test]
    fn test_full_board_draw() {
        let turns = log(&[
            (0, 0),
            (1, 1),
            (2, 2),
            (0, 1),
            (2, 1),
            (2, 0),
            (0, 2),
            (1, 2),
            (1, 0),
        ]);
        assert_eq!(status(&turns, 9), GameStatus::Draw);
    }

    #[test]
    fn test_win_on_last_cell_is_not_draw() {
        // O completes the left column with the ninth move.
        let turns = log(&[
            (0, 0),
            (0, 1),
            (1, 0),
            (1, 1),
            (0, 2),
            (1, 2),
            (2, 1),
            (2, 2),
            (2, 0),
        ]);
        assert_eq!(status(&turns, 9), GameStatus::Won(Mark::Circle));
    }
}
