//! Database models and their wire conversions.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tictac_game::{Mark, Move};
use tictac_session::{GameId, GameRecord, GameSummary, TurnRecord};
use tracing::instrument;

use crate::db::{DbError, schema};

/// Stored game header.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: GameId,
    title: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRow {
    /// Listing shape, timestamps read as UTC.
    pub fn to_summary(&self) -> GameSummary {
        GameSummary::new(
            self.id,
            self.title.clone(),
            self.created_at.and_utc(),
            self.updated_at.and_utc(),
        )
    }

    /// Full record with the given turns, which must already be in order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a stored turn holds an unknown mark or an
    /// impossible coordinate.
    #[instrument(skip(self, turns), fields(game_id = self.id, turns = turns.len()))]
    pub fn into_record(self, turns: Vec<TurnRow>) -> Result<GameRecord, DbError> {
        let turns = turns
            .iter()
            .map(TurnRow::to_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GameRecord::new(
            self.id,
            self.title,
            self.created_at.and_utc(),
            self.updated_at.and_utc(),
            turns,
        ))
    }
}

/// Insertable game header.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGame {
    title: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Stored move.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::turns)]
#[diesel(belongs_to(GameRow, foreign_key = game_id))]
pub struct TurnRow {
    id: i64,
    game_id: GameId,
    turn_order: i64,
    mark: String,
    row_idx: i32,
    col_idx: i32,
}

impl TurnRow {
    /// Wire shape of this turn.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the row does not describe a move on the board.
    #[instrument(skip(self), fields(turn_id = self.id))]
    pub fn to_record(&self) -> Result<TurnRecord, DbError> {
        let mark = mark_from_db(&self.mark)?;
        let row = usize::try_from(self.row_idx)
            .map_err(|_| DbError::new(format!("Negative row {}", self.row_idx)))?;
        let col = usize::try_from(self.col_idx)
            .map_err(|_| DbError::new(format!("Negative column {}", self.col_idx)))?;
        let mv = Move::new(mark, row, col).map_err(|e| DbError::new(e.to_string()))?;
        Ok(TurnRecord::new(
            self.id,
            self.turn_order,
            mv.mark(),
            mv.row(),
            mv.col(),
        ))
    }
}

/// Insertable move. `turn_order` is the move's index in the submitted log.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::turns)]
pub struct NewTurn {
    game_id: GameId,
    turn_order: i64,
    mark: String,
    row_idx: i32,
    col_idx: i32,
}

impl NewTurn {
    /// Row for `mv` at position `order` of game `game_id`.
    pub fn from_move(game_id: GameId, order: usize, mv: &Move) -> Self {
        Self::new(
            game_id,
            order as i64,
            mark_to_db(mv.mark()).to_string(),
            mv.row() as i32,
            mv.col() as i32,
        )
    }
}

/// Converts a mark to the string stored in the database.
pub fn mark_to_db(mark: Mark) -> &'static str {
    match mark {
        Mark::Circle => "O",
        Mark::Cross => "X",
    }
}

/// Parses a mark from the string stored in the database.
///
/// # Errors
///
/// Returns [`DbError`] if the string is not `O` or `X`.
#[instrument(skip(s), fields(s = %s))]
pub fn mark_from_db(s: &str) -> Result<Mark, DbError> {
    match s {
        "O" => Ok(Mark::Circle),
        "X" => Ok(Mark::Cross),
        _ => Err(DbError::new(format!("Invalid mark: '{}'", s))),
    }
}
