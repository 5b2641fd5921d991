//! Core domain types for tic-tac-toe.

use crate::GameError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side length of the board.
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board, and the length of a full game.
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// The mark that opens every game.
pub const FIRST_MARK: Mark = Mark::Circle;

/// Symbol a player claims cells with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Mark {
    /// Circle, written `O`. Moves first.
    #[serde(rename = "O")]
    Circle,
    /// Cross, written `X`.
    #[serde(rename = "X")]
    Cross,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Circle => Mark::Cross,
            Mark::Cross => Mark::Circle,
        }
    }

    /// Single-character symbol used on the board and on the wire.
    pub fn symbol(self) -> char {
        match self {
            Mark::Circle => 'O',
            Mark::Cross => 'X',
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No mark yet.
    #[default]
    Empty,
    /// Claimed by a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

/// One claimed cell: who claimed it and where.
///
/// Coordinates are validated on construction and on deserialization, so a
/// `Move` always addresses a real cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoveRepr", into = "MoveRepr")]
pub struct Move {
    mark: Mark,
    row: usize,
    col: usize,
}

impl Move {
    /// Creates a move, rejecting coordinates outside the board.
    #[instrument]
    pub fn new(mark: Mark, row: usize, col: usize) -> Result<Self, GameError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(Self { mark, row, col })
    }

    /// Mark placed by this move.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Zero-based row.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Zero-based column.
    pub fn col(&self) -> usize {
        self.col
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ({}, {})", self.mark, self.row, self.col)
    }
}

/// Wire shape of a move: `{"mark": "O", "row": 0, "col": 2}`.
#[derive(Serialize, Deserialize)]
struct MoveRepr {
    mark: Mark,
    row: usize,
    col: usize,
}

impl TryFrom<MoveRepr> for Move {
    type Error = GameError;

    fn try_from(repr: MoveRepr) -> Result<Self, Self::Error> {
        Move::new(repr.mark, repr.row, repr.col)
    }
}

impl From<Move> for MoveRepr {
    fn from(mv: Move) -> Self {
        Self {
            mark: mv.mark,
            row: mv.row,
            col: mv.col,
        }
    }
}

/// 3x3 board, indexed `[row][col]`.
///
/// Boards are only ever produced by [`crate::project`]; there is no public
/// way to write a cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Side length.
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// True when `(row, col)` is on the board and unclaimed.
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Cell::Empty))
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Number of claimed cells.
    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c != Cell::Empty)
            .count()
    }

    /// Writes a move's mark into its cell.
    pub(crate) fn place(&mut self, mv: Move) {
        self.cells[mv.row()][mv.col()] = Cell::Occupied(mv.mark());
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let symbol = match cell {
                    Cell::Empty => ' ',
                    Cell::Occupied(mark) => mark.symbol(),
                };
                result.push(symbol);
                if c + 1 < BOARD_SIZE {
                    result.push('|');
                }
            }
            if r + 1 < BOARD_SIZE {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Where the game stands at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Play continues with `next` to move.
    InProgress {
        /// Mark whose turn it is.
        next: Mark,
    },
    /// The previous mover completed a line.
    Won(Mark),
    /// Board full, no line.
    Draw,
}

impl GameStatus {
    /// True for `Won` and `Draw`.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress { .. })
    }

    /// Winning mark, if any.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameStatus::Won(mark) => Some(*mark),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress { next } => write!(f, "{}'s turn", next),
            GameStatus::Won(mark) => write!(f, "Player {} won!", mark),
            GameStatus::Draw => write!(f, "Draw!"),
        }
    }
}
