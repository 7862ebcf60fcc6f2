// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use tourney::StoreError;
use tourney_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// A write violated a uniqueness constraint.
    Conflict(String),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested tournament was not found.
    TournamentNotFound(i64),
    /// The requested team was not found.
    TeamNotFound(i64),
    /// The requested match was not found.
    MatchNotFound(i64),
    /// The requested game was not found.
    GameNotFound(i64),
    /// A domain rule rejected the write.
    Domain(DomainError),
    /// The requested resource was not found.
    NotFound(String),
}

impl PersistenceError {
    /// Stable identifier for the error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DatabaseError(_) => "database_error",
            Self::DatabaseConnectionFailed(_) => "database_connection_failed",
            Self::MigrationFailed(_) => "migration_failed",
            Self::QueryFailed(_) => "query_failed",
            Self::Conflict(_) => "conflict",
            Self::ReconstructionError(_) => "reconstruction_error",
            Self::SerializationError(_) => "serialization_error",
            Self::InitializationError(_) => "initialization_error",
            Self::ForeignKeyEnforcementNotEnabled => "foreign_keys_disabled",
            Self::TournamentNotFound(_) => "tournament_not_found",
            Self::TeamNotFound(_) => "team_not_found",
            Self::MatchNotFound(_) => "match_not_found",
            Self::GameNotFound(_) => "game_not_found",
            Self::Domain(_) => "domain_violation",
            Self::NotFound(_) => "not_found",
        }
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::ReconstructionError(msg) => write!(f, "Reconstruction error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::TournamentNotFound(id) => write!(f, "Tournament not found: {id}"),
            Self::TeamNotFound(id) => write!(f, "Team not found: {id}"),
            Self::MatchNotFound(id) => write!(f, "Match not found: {id}"),
            Self::GameNotFound(id) => write!(f, "Game not found: {id}"),
            Self::Domain(err) => write!(f, "{err}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Conflict(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::TournamentNotFound(id) => Self::NotFound {
                entity: "tournament",
                id,
            },
            PersistenceError::TeamNotFound(id) => Self::NotFound { entity: "team", id },
            PersistenceError::MatchNotFound(id) => Self::NotFound { entity: "match", id },
            PersistenceError::GameNotFound(id) => Self::NotFound { entity: "game", id },
            PersistenceError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
