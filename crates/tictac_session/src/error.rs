//! Session and gateway error types.

use crate::Lifecycle;
use derive_more::{Display, Error, From};
use tictac_game::GameError;

/// Why a session operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// A load or save is in flight.
    #[display("session is busy ({state})")]
    Busy {
        /// Lifecycle state that blocked the operation.
        state: Lifecycle,
    },

    /// Saving needs a non-blank title.
    #[display("title must not be empty")]
    EmptyTitle,

    /// The turn log refused the move or rewind.
    #[display("{_0}")]
    #[from]
    Game(GameError),
}

/// Failure talking to the persistence backend.
///
/// Transport failures and `status: error` replies both end up as a plain
/// message on the session; the variants only exist for logging.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GatewayError {
    /// The request never produced a response.
    #[display("request failed: {_0}")]
    Transport(String),

    /// The backend answered with `status: error`.
    #[display("{_0}")]
    Api(String),

    /// The response body was not the expected envelope.
    #[display("unexpected response: {_0}")]
    Decode(String),
}

impl GatewayError {
    /// Message handed to the `*_failed` transitions.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl std::error::Error for GatewayError {}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
