// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use tourney::{AdvanceError, BuildError, StoreError};
use tourney_domain::DomainError;
use tourney_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from engine and storage errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

fn rule(rule: &str, message: String) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message,
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTeamName(msg) => invalid("name", msg),
        DomainError::DuplicateTeamName { name } => rule(
            "unique_team_name",
            format!("A team named '{name}' is already registered in this tournament"),
        ),
        DomainError::InvalidTournamentName(msg) | DomainError::InvalidGameName(msg) => {
            invalid("name", msg)
        }
        DomainError::TournamentFull { max_teams } => rule(
            "tournament_capacity",
            format!("The tournament already holds its maximum of {max_teams} teams"),
        ),
        DomainError::RegistrationClosed { status } => rule(
            "registration_open",
            format!("Teams cannot register while the tournament is '{status}'"),
        ),
        DomainError::InvalidMaxTeams { max_teams } => invalid(
            "max_teams",
            format!("Invalid team capacity: {max_teams}. Must be at least 2"),
        ),
        DomainError::NotEnoughTeams { count } => rule(
            "minimum_teams",
            format!("At least 2 teams are required, found {count}"),
        ),
        DomainError::InvalidStatusTransition { team_id, from, to } => rule(
            "bracket_status_transition",
            format!("Team {team_id} cannot move from '{from}' to '{to}'"),
        ),
        DomainError::InvalidLifecycleTransition { from, to } => rule(
            "tournament_lifecycle",
            format!("A tournament cannot move from '{from}' to '{to}'"),
        ),
        DomainError::InvalidBracketType(value) => {
            invalid("bracket_type", format!("Unknown bracket type '{value}'"))
        }
        DomainError::InvalidMatchStatus(value) => {
            invalid("status", format!("Unknown match status '{value}'"))
        }
        DomainError::InvalidBracketStatus(value) => {
            invalid("bracket_status", format!("Unknown bracket status '{value}'"))
        }
        DomainError::InvalidFormat(value) => invalid(
            "format",
            format!("Unknown format '{value}'. Expected 'single' or 'double'"),
        ),
        DomainError::InvalidTournamentStatus(value) => {
            invalid("status", format!("Unknown tournament status '{value}'"))
        }
        DomainError::InvalidDropSchedule(value) => invalid(
            "drop_schedule",
            format!("Unknown drop schedule '{value}'. Expected 'standard' or 'staggered'"),
        ),
    }
}

/// Translates a storage collaborator error into an API error.
#[must_use]
pub fn translate_store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound { entity, id } => {
            not_found(entity, format!("No {entity} exists with id {id}"))
        }
        StoreError::Conflict(msg) => rule("storage_conflict", msg),
        StoreError::Unavailable(msg) => ApiError::Internal { message: msg },
    }
}

/// Translates a bracket generation error into an API error.
#[must_use]
pub fn translate_build_error(err: BuildError) -> ApiError {
    match err {
        BuildError::InsufficientTeams { count } => rule(
            "minimum_teams",
            format!("At least 2 teams are required to build a bracket, found {count}"),
        ),
        BuildError::EmptyCatalog => rule(
            "active_game_required",
            String::from("At least one active game is required"),
        ),
        BuildError::TournamentNotFound(id) => {
            not_found("Tournament", format!("Tournament {id} does not exist"))
        }
        BuildError::TournamentCompleted(id) => rule(
            "tournament_open",
            format!("Tournament {id} is already completed"),
        ),
        BuildError::Domain(domain_err) => translate_domain_error(domain_err),
        BuildError::Store(store_err) => translate_store_error(store_err),
    }
}

/// Translates a bracket advancement error into an API error.
#[must_use]
pub fn translate_advance_error(err: AdvanceError) -> ApiError {
    match err {
        AdvanceError::AlreadyCompleted(id) => rule(
            "match_open",
            format!("Match {id} already has a winner"),
        ),
        AdvanceError::InvalidWinner { match_id, team_id } => invalid(
            "winner_id",
            format!("Team {team_id} is not playing in match {match_id}"),
        ),
        AdvanceError::MatchNotFound(id) => {
            not_found("Match", format!("Match {id} does not exist"))
        }
        AdvanceError::TeamNotFound(id) => not_found("Team", format!("Team {id} does not exist")),
        AdvanceError::TournamentNotFound(id) => {
            not_found("Tournament", format!("Tournament {id} does not exist"))
        }
        AdvanceError::NotAByeMatch { match_id, teams } => rule(
            "single_waiting_team",
            format!("Match {match_id} holds {teams} team(s); only a lone team can be advanced"),
        ),
        AdvanceError::MatchNotReady(id) => rule(
            "match_ready",
            format!("Match {id} needs two teams and must be pending to start"),
        ),
        AdvanceError::TournamentCompleted(id) => rule(
            "tournament_open",
            format!("Tournament {id} is already completed"),
        ),
        AdvanceError::SlotUnavailable {
            bracket_type,
            team_id,
        } => ApiError::Internal {
            message: format!("No open slot in the {bracket_type} for team {team_id}"),
        },
        AdvanceError::EmptyCatalog => rule(
            "active_game_required",
            String::from("At least one active game is required to schedule the next match"),
        ),
        AdvanceError::Domain(domain_err) => translate_domain_error(domain_err),
        AdvanceError::Store(store_err) => translate_store_error(store_err),
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::TournamentNotFound(id) => {
            not_found("Tournament", format!("Tournament {id} does not exist"))
        }
        PersistenceError::TeamNotFound(id) => {
            not_found("Team", format!("Team {id} does not exist"))
        }
        PersistenceError::MatchNotFound(id) => {
            not_found("Match", format!("Match {id} does not exist"))
        }
        PersistenceError::GameNotFound(id) => {
            not_found("Game", format!("Game {id} does not exist"))
        }
        PersistenceError::NotFound(msg) => not_found("Record", msg),
        PersistenceError::Domain(domain_err) => translate_domain_error(domain_err),
        PersistenceError::Conflict(msg) => rule("unique_record", msg),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
