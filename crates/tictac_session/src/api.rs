//! Wire types shared by the gateway and the backend.

use crate::GatewayError;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tictac_game::{GameError, Mark, Move, TurnLog};
use tracing::{debug, instrument};

/// Stable identifier of a saved game.
pub type GameId = i64;

/// Response envelope: `{"status": "success", "data": ...}` or
/// `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse<T> {
    /// Request succeeded.
    Success {
        /// Payload.
        data: T,
    },
    /// Backend refused or failed the request.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl<T> ApiResponse<T> {
    /// Wraps a successful payload.
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Wraps an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Converts the envelope into a `Result`.
    pub fn into_result(self) -> Result<T, GatewayError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Error { message } => Err(GatewayError::Api(message)),
        }
    }
}

/// A saved game without its moves, as shown in the games list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    id: GameId,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// One stored move. `turn_order` is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    id: i64,
    turn_order: i64,
    mark: Mark,
    row: usize,
    col: usize,
}

/// A saved game with its moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    id: GameId,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    turns: Vec<TurnRecord>,
}

impl GameRecord {
    /// The listing part of this record.
    pub fn summary(&self) -> GameSummary {
        GameSummary::new(
            self.id,
            self.title.clone(),
            self.created_at,
            self.updated_at,
        )
    }

    /// Rebuilds the turn log, fully played back.
    ///
    /// Turns are ordered by `turn_order`, not by their position in the
    /// response.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] when a turn is off the board or the sequence
    /// is not a legal game.
    #[instrument(skip(self), fields(game_id = self.id, turns = self.turns.len()))]
    pub fn turn_log(&self) -> Result<TurnLog, GameError> {
        let mut ordered: Vec<&TurnRecord> = self.turns.iter().collect();
        ordered.sort_by_key(|t| t.turn_order);

        let moves = ordered
            .into_iter()
            .map(|t| Move::new(t.mark, t.row, t.col))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Rebuilding turn log from record");
        TurnLog::from_stored(moves)
    }
}

/// Body of create and update requests: the title plus the full turn log in
/// play order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct GamePayload {
    title: String,
    turns: Vec<Move>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_orders(orders: &[(i64, usize, usize)]) -> GameRecord {
        let now = Utc::now();
        let turns = orders
            .iter()
            .map(|&(order, row, col)| {
                let mark = if order % 2 == 1 { Mark::Circle } else { Mark::Cross };
                TurnRecord::new(order * 10, order, mark, row, col)
            })
            .collect();
        GameRecord::new(7, "shuffled".to_string(), now, now, turns)
    }

    #[test]
    fn test_turns_sorted_by_turn_order() {
        let record = record_with_orders(&[(3, 2, 2), (1, 0, 0), (2, 1, 1)]);
        let log = record.turn_log().expect("Legal game");

        let cells: Vec<_> = log.turns().iter().map(|m| (m.row(), m.col())).collect();
        assert_eq!(cells, vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(log.cursor(), 3);
    }

    #[test]
    fn test_out_of_bounds_turn_rejected() {
        let record = record_with_orders(&[(1, 4, 0)]);
        assert!(matches!(
            record.turn_log(),
            Err(GameError::OutOfBounds { row: 4, col: 0 })
        ));
    }

    #[test]
    fn test_envelope_shapes() {
        let ok: ApiResponse<i64> = serde_json::from_str(r#"{"status":"success","data":7}"#).unwrap();
        assert_eq!(ok.into_result(), Ok(7));

        let err: ApiResponse<i64> =
            serde_json::from_str(r#"{"status":"error","message":"Unknown id"}"#).unwrap();
        assert_eq!(err.into_result(), Err(GatewayError::Api("Unknown id".to_string())));
    }

    #[test]
    fn test_record_camel_case() {
        let record = record_with_orders(&[(1, 0, 0)]);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["turns"][0]["turnOrder"], 1);
        assert_eq!(json["turns"][0]["mark"], "O");
    }
}
