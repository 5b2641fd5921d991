//! SQLite persistence for saved games and their turns.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use repository::GameRepository;
