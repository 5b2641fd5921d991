//! Session management for rewindable tic-tac-toe.
//!
//! Wraps a [`tictac_game::TurnLog`] in a session with an identity and a
//! load/save lifecycle, and talks to a persistence backend through the
//! [`GameGateway`] trait.
//!
//! # Architecture
//!
//! - **Controller**: synchronous state machine for the open game ([`SessionController`])
//! - **Games list**: saved game listings and deletes ([`GamesList`])
//! - **Gateway**: persistence boundary ([`GameGateway`], [`RestGateway`], [`InMemoryGateway`])
//! - **Service**: async driver running request/completion pairs ([`GameService`])
//!
//! Network work is two-phase. Starting a request moves the lifecycle to
//! `loading`/`saving` straight away and hands out a [`RequestTicket`]; the
//! completion is applied later only if that ticket is still the newest one.
//!
//! # Example
//!
//! ```no_run
//! use tictac_session::{GameService, RestGateway};
//!
//! # async fn example() -> Result<(), tictac_session::SessionError> {
//! let service = GameService::new(RestGateway::new("http://127.0.0.1:8080/api/"));
//! service.claim_cell(1, 1).await?;
//! service.save_current("opening").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod controller;
mod error;
mod games_list;
mod gateway;
mod service;
mod session;

pub use api::{ApiResponse, GameId, GamePayload, GameRecord, GameSummary, TurnRecord};
pub use controller::{Completion, Lifecycle, RequestTicket, SaveRequest, SaveTarget, SessionController};
pub use error::{GatewayError, SessionError};
pub use games_list::GamesList;
pub use gateway::{GameGateway, InMemoryGateway, RestGateway};
pub use service::{GameService, ServiceState};
pub use session::Session;
