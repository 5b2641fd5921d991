//! Text rendering of the service state.

use tictac_game::{Board, Cell, TurnLog};
use tictac_session::{GameId, GamesList, Lifecycle, ServiceState, Session, SessionController};

/// Board with row and column labels.
pub fn render_board(board: &Board) -> String {
    let mut out = String::from("    0   1   2\n");
    for (r, row) in board.rows().iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Cell::Empty => " ".to_string(),
                Cell::Occupied(mark) => mark.to_string(),
            })
            .collect();
        out.push_str(&format!("{}   {}\n", r, cells.join(" | ")));
        if r + 1 < board.size() {
            out.push_str("   ---+---+---\n");
        }
    }
    out
}

fn session_label(session: &Session) -> String {
    match session.summary() {
        Some(game) => format!("Game #{} \"{}\"", game.id(), game.title()),
        None => "Unsaved game".to_string(),
    }
}

/// One line: which game, whose turn or who won, and any request state.
pub fn render_status(current: &SessionController) -> String {
    let mut line = format!("{}: {}", session_label(current.session()), current.status());
    match current.lifecycle() {
        Lifecycle::Loading => line.push_str(" [loading]"),
        Lifecycle::Saving => line.push_str(" [saving]"),
        Lifecycle::Error(message) => line.push_str(&format!(" [error: {}]", message)),
        Lifecycle::Idle | Lifecycle::Success => {}
    }
    line
}

/// History table: turn 0 is the game start, then one row per move.
///
/// The row at the cursor is marked with `>`; moves past the cursor are
/// still listed so they can be redone.
pub fn render_history(log: &TurnLog) -> String {
    let mut out = String::from("History:\n");
    for turn in 0..=log.len() {
        let marker = if turn == log.cursor() { '>' } else { ' ' };
        let label = match turn.checked_sub(1).and_then(|i| log.turns().get(i)) {
            None => "game start".to_string(),
            Some(mv) if turn > log.cursor() => format!("{} (undone)", mv),
            Some(mv) => mv.to_string(),
        };
        out.push_str(&format!(" {} {:>2}  {}\n", marker, turn, label));
    }
    out
}

/// Saved games, flagging the open one and pending deletes.
pub fn render_games(list: &GamesList, open: Option<GameId>) -> String {
    let mut out = String::from("Saved games:");
    if let Some(message) = list.error() {
        out.push_str(&format!(" [error: {}]", message));
    } else if *list.lifecycle() == Lifecycle::Loading {
        out.push_str(" [loading]");
    }
    out.push('\n');

    if list.games().is_empty() {
        out.push_str("  (none)\n");
    }
    for game in list.games() {
        let open_marker = if Some(*game.id()) == open { '*' } else { ' ' };
        let deleting = if list.is_deleting(*game.id()) { " (deleting)" } else { "" };
        out.push_str(&format!(
            " {} #{:<4} {:<24} updated {}{}\n",
            open_marker,
            game.id(),
            game.title(),
            game.updated_at().format("%Y-%m-%d %H:%M"),
            deleting
        ));
    }
    out
}

/// Full screen: board, status line, history and games list.
pub fn render_state(state: &ServiceState) -> String {
    format!(
        "{}\n{}\n\n{}\n{}",
        render_board(&state.current.board()),
        render_status(&state.current),
        render_history(state.current.session().log()),
        render_games(&state.games, state.current.session().id()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_marks_cursor_and_undone_moves() {
        let mut log = TurnLog::new();
        log.claim_cell(0, 0).unwrap();
        log.claim_cell(1, 1).unwrap();
        log.rewind_to(1).unwrap();

        let history = render_history(&log);
        let lines: Vec<&str> = history.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("game start"));
        assert!(lines[2].starts_with(" >  1"));
        assert!(lines[3].contains("(undone)"));
    }

    #[test]
    fn test_board_shows_marks() {
        let mut log = TurnLog::new();
        log.claim_cell(2, 1).unwrap();
        let board = render_board(&log.board());
        assert!(board.contains("2     | O |  "));
    }

    #[test]
    fn test_status_for_unsaved_game() {
        let controller = SessionController::new();
        assert_eq!(render_status(&controller), "Unsaved game: O's turn");
    }

    #[test]
    fn test_empty_games_list() {
        assert!(render_games(&GamesList::new(), None).contains("(none)"));
    }
}
