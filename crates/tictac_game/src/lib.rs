//! Tic-tac-toe game logic with a rewindable turn log.
//!
//! The board is never stored. It is projected from the turn log up to the
//! cursor every time it is needed, so history navigation can never leave a
//! stale board behind.
//!
//! # Architecture
//!
//! - **Turn log**: ordered moves plus a cursor ([`TurnLog`])
//! - **Projection**: log prefix to board ([`project`])
//! - **Rules**: whose turn, win and draw detection ([`rules`])
//!
//! # Example
//!
//! ```
//! use tictac_game::{GameStatus, Mark, TurnLog};
//!
//! let mut log = TurnLog::new();
//! log.claim_cell(0, 0)?;
//! log.claim_cell(1, 1)?;
//! assert_eq!(log.status(), GameStatus::InProgress { next: Mark::Circle });
//!
//! log.rewind_to(1)?;
//! assert_eq!(log.current_player(), Mark::Cross);
//! # Ok::<(), tictac_game::GameError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod projection;
pub mod rules;
mod turn_log;
mod types;

pub use error::GameError;
pub use projection::project;
pub use rules::{current_player, has_won, is_draw, status};
pub use turn_log::TurnLog;
pub use types::{BOARD_CELLS, BOARD_SIZE, Board, Cell, FIRST_MARK, GameStatus, Mark, Move};
