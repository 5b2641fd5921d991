//! Tests for history navigation, projection and terminal detection.

use tictac_game::{
    BOARD_CELLS, Cell, GameError, GameStatus, Mark, TurnLog, current_player, has_won, is_draw,
    project,
};

/// Plays the given cells in order on a fresh log.
fn play(cells: &[(usize, usize)]) -> TurnLog {
    let mut log = TurnLog::new();
    for &(r, c) in cells {
        log.claim_cell(r, c).expect("Scripted move should be legal");
    }
    log
}

/// A nine-move game in which nobody completes a line.
const DRAW_GAME: [(usize, usize); 9] = [
    (0, 0),
    (1, 1),
    (2, 2),
    (0, 1),
    (2, 1),
    (2, 0),
    (0, 2),
    (1, 2),
    (1, 0),
];

#[test]
fn test_projection_has_one_cell_per_visible_move() {
    let log = play(&DRAW_GAME);
    for cursor in 0..=log.len() {
        let board = project(log.turns(), cursor);
        assert_eq!(board.occupied(), cursor, "cursor {cursor}");
        for mv in &log.turns()[..cursor] {
            assert_eq!(board.get(mv.row(), mv.col()), Some(Cell::Occupied(mv.mark())));
        }
    }
}

#[test]
fn test_current_player_differs_from_previous_mover() {
    let log = play(&DRAW_GAME);
    for cursor in 1..=log.len() {
        assert_ne!(
            current_player(log.turns(), cursor),
            log.turns()[cursor - 1].mark()
        );
    }
}

#[test]
fn test_claim_on_occupied_cell_is_noop() {
    let mut log = play(&[(0, 0), (1, 1)]);
    let before = log.clone();
    assert_eq!(
        log.claim_cell(1, 1),
        Err(GameError::CellOccupied { row: 1, col: 1 })
    );
    assert_eq!(log, before);
}

#[test]
fn test_claim_after_win_is_noop() {
    let mut log = play(&[(0, 0), (1, 1), (0, 1), (1, 0), (0, 2)]);
    let before = log.clone();
    assert_eq!(log.claim_cell(2, 2), Err(GameError::GameOver));
    assert_eq!(log, before);
}

#[test]
fn test_claim_after_draw_is_noop() {
    let mut log = play(&DRAW_GAME);
    assert_eq!(log.status(), GameStatus::Draw);
    assert_eq!(log.claim_cell(0, 0), Err(GameError::GameOver));
    assert_eq!(log.cursor(), BOARD_CELLS);
}

#[test]
fn test_rewind_round_trip_is_lossless() {
    let mut log = play(&[(0, 0), (1, 1), (2, 2), (0, 2)]);
    let original = log.board();
    let len = log.len();
    for k in 0..=len {
        log.rewind_to(k).unwrap();
        assert_eq!(log.len(), len);
        log.rewind_to(len).unwrap();
        assert_eq!(log.board(), original);
    }
}

#[test]
fn test_claim_after_rewind_truncates() {
    let mut log = play(&[(0, 0), (1, 1), (2, 2), (0, 2), (2, 0)]);
    assert_eq!(log.cursor(), 5);

    log.rewind_to(2).unwrap();
    let mv = log.claim_cell(0, 1).unwrap();

    assert_eq!(log.len(), 3);
    assert_eq!(log.cursor(), 3);
    assert_eq!(mv.mark(), Mark::Circle);
    assert_eq!(log.turns()[2], mv);
}

#[test]
fn test_rewound_cell_becomes_free_again() {
    let mut log = play(&[(0, 0), (1, 1)]);
    log.rewind_to(1).unwrap();
    // (1, 1) was claimed at turn 2 but is not on the board at cursor 1.
    let mv = log.claim_cell(1, 1).unwrap();
    assert_eq!(mv.mark(), Mark::Cross);
}

#[test]
fn test_top_row_scenario() {
    let log = play(&[(0, 0), (1, 1), (0, 1), (1, 0), (0, 2)]);
    let board = log.board();
    assert!(has_won(Mark::Circle, &board));
    assert!(!is_draw(log.cursor(), true));
    assert_eq!(log.status(), GameStatus::Won(Mark::Circle));
}

#[test]
fn test_forced_draw_scenario() {
    let log = play(&DRAW_GAME);
    let board = log.board();
    assert!(!has_won(Mark::Circle, &board));
    assert!(!has_won(Mark::Cross, &board));
    assert!(is_draw(log.cursor(), false));
    assert_eq!(log.status(), GameStatus::Draw);
}

#[test]
fn test_from_stored_accepts_legal_game() {
    let played = play(&DRAW_GAME);
    let loaded = TurnLog::from_stored(played.turns().to_vec()).unwrap();
    assert_eq!(loaded.cursor(), 9);
    assert_eq!(loaded.board(), played.board());
}

#[test]
fn test_from_stored_rejects_move_after_win() {
    let mut turns = play(&[(0, 0), (1, 1), (0, 1), (1, 0), (0, 2)])
        .turns()
        .to_vec();
    turns.push(tictac_game::Move::new(Mark::Cross, 2, 2).unwrap());
    assert!(matches!(
        TurnLog::from_stored(turns),
        Err(GameError::MalformedLog { turn: 5, .. })
    ));
}
