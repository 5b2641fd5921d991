//! Database repository for saved games.

use chrono::Utc;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tictac_session::{GameId, GamePayload, GameRecord, GameSummary};
use tracing::{debug, info, instrument, warn};

use crate::db::DbError;
use crate::db::models::{GameRow, NewGame, NewTurn, TurnRow};
use crate::db::schema::{games, turns};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for game operations.
///
/// Holds only the path; every call opens its own connection, so the
/// repository is cheap to clone into blocking tasks.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path must not be empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Path or URL of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(applied = applied.len(), "Migrations up to date");
        Ok(())
    }

    /// Lists all games in creation order, without turns.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameSummary>, DbError> {
        let mut conn = self.connection()?;
        let rows = games::table
            .order(games::id.asc())
            .select(GameRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Games loaded");
        Ok(rows.iter().map(GameRow::to_summary).collect())
    }

    /// Gets a game with its turns ordered by `turn_order`. Returns `None`
    /// if no such game exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or a stored turn is
    /// unreadable.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: GameId) -> Result<Option<GameRecord>, DbError> {
        let mut conn = self.connection()?;
        let record = conn.transaction::<_, DbError, _>(|conn| load_record(conn, id))?;
        if record.is_none() {
            debug!("Game not found");
        }
        Ok(record)
    }

    /// Stores a new game and its turns in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the schema refuses the data or a database
    /// error occurs.
    #[instrument(skip(self, payload), fields(title = %payload.title(), turns = payload.turns().len()))]
    pub fn create_game(&self, payload: &GamePayload) -> Result<GameRecord, DbError> {
        let mut conn = self.connection()?;
        let record = conn.transaction::<_, DbError, _>(|conn| {
            let now = Utc::now().naive_utc();
            let id = diesel::insert_into(games::table)
                .values(&NewGame::new(payload.title().clone(), now, now))
                .returning(games::id)
                .get_result::<GameId>(conn)?;

            insert_turns(conn, id, payload)?;
            load_record(conn, id)?
                .ok_or_else(|| DbError::new(format!("Game {} vanished after insert", id)))
        })?;

        info!(game_id = *record.id(), "Game created");
        Ok(record)
    }

    /// Replaces title and turns of an existing game and bumps `updated_at`.
    /// Returns `None` if no such game exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the schema refuses the data or a database
    /// error occurs.
    #[instrument(skip(self, payload), fields(title = %payload.title(), turns = payload.turns().len()))]
    pub fn update_game(
        &self,
        id: GameId,
        payload: &GamePayload,
    ) -> Result<Option<GameRecord>, DbError> {
        let mut conn = self.connection()?;
        let record = conn.transaction::<_, DbError, _>(|conn| {
            let updated = diesel::update(games::table.find(id))
                .set((
                    games::title.eq(payload.title().as_str()),
                    games::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            if updated == 0 {
                return Ok(None);
            }

            diesel::delete(turns::table.filter(turns::game_id.eq(id))).execute(conn)?;
            insert_turns(conn, id, payload)?;
            load_record(conn, id)
        })?;

        match &record {
            Some(_) => info!("Game updated"),
            None => warn!("Update of unknown game"),
        }
        Ok(record)
    }

    /// Deletes a game and its turns. Returns whether a game was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_game(&self, id: GameId) -> Result<bool, DbError> {
        let mut conn = self.connection()?;
        let deleted = conn.transaction::<_, DbError, _>(|conn| {
            diesel::delete(turns::table.filter(turns::game_id.eq(id))).execute(conn)?;
            Ok(diesel::delete(games::table.find(id)).execute(conn)?)
        })?;

        if deleted == 0 {
            warn!("Delete of unknown game");
        } else {
            info!("Game deleted");
        }
        Ok(deleted > 0)
    }
}

fn insert_turns(
    conn: &mut SqliteConnection,
    game_id: GameId,
    payload: &GamePayload,
) -> Result<(), DbError> {
    for (order, mv) in payload.turns().iter().enumerate() {
        diesel::insert_into(turns::table)
            .values(&NewTurn::from_move(game_id, order, mv))
            .execute(conn)?;
    }
    debug!(count = payload.turns().len(), "Turns inserted");
    Ok(())
}

fn load_record(conn: &mut SqliteConnection, id: GameId) -> Result<Option<GameRecord>, DbError> {
    let Some(game) = games::table
        .find(id)
        .select(GameRow::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let rows = TurnRow::belonging_to(&game)
        .select(TurnRow::as_select())
        .order(turns::turn_order.asc())
        .load(conn)?;

    game.into_record(rows).map(Some)
}
