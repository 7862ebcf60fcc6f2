// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Tourney bracket engine.
//!
//! Tournaments, teams, the game catalog and bracket matches are stored in
//! `SQLite` through Diesel. Migrations are embedded and run when a
//! connection is opened.
//!
//! [`Persistence`] implements every storage collaborator the engine needs
//! (`TeamRepository`, `MatchRepository`, `GameCatalog` and
//! `TournamentLifecycle`), so a single instance can back a
//! [`tourney::BracketService`]:
//!
//! ```ignore
//! let store = Arc::new(Persistence::new_in_memory()?);
//! let service = BracketService::from_store(store, EngineConfig::default());
//! ```
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated shared-cache in-memory databases
//! - Each `new_in_memory()` call receives its own database
//! - Full bracket flows are exercised through `BracketService`

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tourney::MatchFilter;
use tourney_domain::{
    DomainError, Game, GameId, Match, ScoringRules, Standing, Team, TeamId, Tournament,
    TournamentFormat, TournamentId, TournamentStatus, compute_standings, validate_capacity,
    validate_game_name, validate_team_name, validate_team_name_unique, validate_tournament,
};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod repositories;

#[cfg(test)]
mod tests;

pub use data_models::TournamentExport;
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite` storage for tournaments, teams, games and matches.
///
/// The connection is guarded by a mutex so one instance can be shared
/// between the engine's collaborators and request handlers.
pub struct Persistence {
    conn: Mutex<SqliteConnection>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_tourney_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Runs `f` with exclusive access to the connection.
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let mut conn: MutexGuard<'_, SqliteConnection> =
            self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut conn)
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&self) -> Result<(), PersistenceError> {
        self.with_conn(PersistenceBackend::verify_foreign_key_enforcement)
    }

    // ========================================================================
    // Tournaments
    // ========================================================================

    /// Creates a tournament in the `Setup` state.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name
    /// * `format` - Single or double elimination
    /// * `max_teams` - Registration capacity
    /// * `scoring` - Points per win and per played loss
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the capacity is below 2 or the
    /// insert fails.
    pub fn create_tournament(
        &self,
        name: &str,
        format: TournamentFormat,
        max_teams: u32,
        scoring: ScoringRules,
    ) -> Result<Tournament, PersistenceError> {
        let mut tournament: Tournament =
            Tournament::new(TournamentId::new(0), name.trim(), format);
        tournament.max_teams = max_teams;
        tournament.scoring = scoring;
        validate_tournament(&tournament)?;

        let tournament_id: i64 =
            self.with_conn(|conn| mutations::tournaments::insert_tournament(conn, &tournament))?;
        tournament.tournament_id = TournamentId::new(tournament_id);
        Ok(tournament)
    }

    /// Fetches a tournament.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::TournamentNotFound` if it does not exist.
    pub fn fetch_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Tournament, PersistenceError> {
        self.with_conn(|conn| queries::tournaments::get_tournament(conn, tournament_id))?
            .ok_or(PersistenceError::TournamentNotFound(tournament_id.value()))
    }

    /// Lists every tournament, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tournaments(&self) -> Result<Vec<Tournament>, PersistenceError> {
        self.with_conn(queries::tournaments::list_tournaments)
    }

    /// Opens a tournament for team registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the tournament does not exist or is past setup.
    pub fn open_registration(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Tournament, PersistenceError> {
        self.with_conn(|conn| {
            let mut tournament: Tournament =
                queries::tournaments::get_tournament(conn, tournament_id)?
                    .ok_or(PersistenceError::TournamentNotFound(tournament_id.value()))?;
            tournament.transition_to(TournamentStatus::Registration)?;
            mutations::tournaments::update_tournament(conn, &tournament)?;
            Ok(tournament)
        })
    }

    // ========================================================================
    // Teams
    // ========================================================================

    /// Registers a team.
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - The tournament to join
    /// * `name` - Team name; surrounding whitespace is dropped
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tournament does not exist or no longer accepts registrations
    /// - The name is too short or already taken
    /// - The tournament is full
    pub fn register_team(
        &self,
        tournament_id: TournamentId,
        name: &str,
    ) -> Result<Team, PersistenceError> {
        let name: &str = name.trim();
        validate_team_name(name)?;

        self.with_conn(|conn| {
            let tournament: Tournament = queries::tournaments::get_tournament(conn, tournament_id)?
                .ok_or(PersistenceError::TournamentNotFound(tournament_id.value()))?;
            if !tournament.status.accepts_registrations() {
                return Err(PersistenceError::Domain(DomainError::RegistrationClosed {
                    status: tournament.status,
                }));
            }
            let existing: Vec<Team> = queries::teams::list_teams(conn, tournament_id)?;
            validate_team_name_unique(name, &existing)?;
            validate_capacity(&tournament, existing.len())?;

            let team_id: i64 = mutations::teams::insert_team(conn, tournament_id, name)?;
            Ok(Team::new(TeamId::new(team_id), tournament_id, name))
        })
    }

    /// Number of teams registered in a tournament.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_teams(&self, tournament_id: TournamentId) -> Result<usize, PersistenceError> {
        self.with_conn(|conn| queries::teams::count_teams(conn, tournament_id))
    }

    // ========================================================================
    // Game catalog
    // ========================================================================

    /// Adds an active game to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or already used.
    pub fn add_game(&self, name: &str, emoji: Option<&str>) -> Result<Game, PersistenceError> {
        let name: &str = name.trim();
        validate_game_name(name)?;

        let game_id: i64 =
            self.with_conn(|conn| mutations::games::insert_game(conn, name, emoji))?;
        let mut game: Game = Game::new(GameId::new(game_id), name);
        game.emoji = emoji.map(str::to_string);
        Ok(game)
    }

    /// Switches a game on or off for future assignments.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::GameNotFound` if the game does not exist.
    pub fn set_game_active(
        &self,
        game_id: GameId,
        active: bool,
    ) -> Result<Game, PersistenceError> {
        self.with_conn(|conn| {
            if mutations::games::set_game_active(conn, game_id, active)? == 0 {
                return Err(PersistenceError::GameNotFound(game_id.value()));
            }
            queries::games::get_game(conn, game_id)?
                .ok_or(PersistenceError::GameNotFound(game_id.value()))
        })
    }

    /// Lists the whole catalog, including inactive games.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_games(&self) -> Result<Vec<Game>, PersistenceError> {
        self.with_conn(|conn| queries::games::list_games(conn, false))
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Collects everything stored for a tournament.
    ///
    /// # Errors
    ///
    /// Returns an error if the tournament does not exist or a query fails.
    pub fn export(
        &self,
        tournament_id: TournamentId,
    ) -> Result<TournamentExport, PersistenceError> {
        self.with_conn(|conn| {
            let tournament: Tournament = queries::tournaments::get_tournament(conn, tournament_id)?
                .ok_or(PersistenceError::TournamentNotFound(tournament_id.value()))?;
            let teams: Vec<Team> = queries::teams::list_teams(conn, tournament_id)?;
            let matches: Vec<Match> =
                queries::matches::list_matches(conn, tournament_id, &MatchFilter::all())?;
            let standings: Vec<Standing> = compute_standings(&teams);
            Ok(TournamentExport {
                tournament,
                teams,
                matches,
                standings,
            })
        })
    }

    /// Serializes [`export`](Self::export) as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the export or serialization fails.
    pub fn export_json(&self, tournament_id: TournamentId) -> Result<String, PersistenceError> {
        let export: TournamentExport = self.export(tournament_id)?;
        Ok(serde_json::to_string_pretty(&export)?)
    }
}
