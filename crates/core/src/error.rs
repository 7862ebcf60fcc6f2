// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;
use tourney_domain::{BracketType, DomainError, MatchId, TeamId, TournamentId};

/// Failure reported by a storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record referenced by id does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// The missing id.
        id: i64,
    },
    /// The write conflicts with stored data.
    #[error("storage conflict: {0}")]
    Conflict(String),
    /// The backend could not serve the request.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Stable identifier for the error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Conflict(_) => "storage_conflict",
            Self::Unavailable(_) => "storage_unavailable",
        }
    }
}

/// Errors raised while generating a bracket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Fewer than two teams are registered.
    #[error("at least 2 teams are required to build a bracket, found {count}")]
    InsufficientTeams {
        /// Number of registered teams.
        count: usize,
    },
    /// No active game is available for assignment.
    #[error("no active games are available for assignment")]
    EmptyCatalog,
    /// The tournament does not exist.
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),
    /// The tournament already finished.
    #[error("tournament {0} is already completed")]
    TournamentCompleted(TournamentId),
    /// A domain rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// A storage collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BuildError {
    /// Stable identifier for the error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientTeams { .. } => "insufficient_teams",
            Self::EmptyCatalog => "empty_catalog",
            Self::TournamentNotFound(_) => "tournament_not_found",
            Self::TournamentCompleted(_) => "tournament_completed",
            Self::Domain(_) => "domain_violation",
            Self::Store(_) => "storage",
        }
    }
}

/// Errors raised while advancing a bracket.
///
/// A rejected command leaves stored state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvanceError {
    /// The match already has a winner.
    #[error("match {0} is already completed")]
    AlreadyCompleted(MatchId),
    /// The declared winner is not playing in the match.
    #[error("team {team_id} is not a participant of match {match_id}")]
    InvalidWinner {
        /// The match.
        match_id: MatchId,
        /// The rejected team.
        team_id: TeamId,
    },
    /// No match with this id.
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
    /// No team with this id.
    #[error("team {0} not found")]
    TeamNotFound(TeamId),
    /// No tournament with this id.
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),
    /// Manual advancement requires exactly one waiting team.
    #[error("match {match_id} has {teams} team(s); only a single waiting team can be advanced")]
    NotAByeMatch {
        /// The match.
        match_id: MatchId,
        /// Number of teams present.
        teams: usize,
    },
    /// The match cannot start yet.
    #[error("match {0} is not ready to start")]
    MatchNotReady(MatchId),
    /// The tournament already finished.
    #[error("tournament {0} is already completed")]
    TournamentCompleted(TournamentId),
    /// A team was routed to a final whose slots are both taken.
    #[error("no open slot left in the {bracket_type} for team {team_id}")]
    SlotUnavailable {
        /// The full final.
        bracket_type: BracketType,
        /// The team that could not be seated.
        team_id: TeamId,
    },
    /// A new match was needed but no active game can be assigned to it.
    #[error("no active games are available for new matches")]
    EmptyCatalog,
    /// A domain rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// A storage collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AdvanceError {
    /// Stable identifier for the error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyCompleted(_) => "already_completed",
            Self::InvalidWinner { .. } => "invalid_winner",
            Self::MatchNotFound(_) => "match_not_found",
            Self::TeamNotFound(_) => "team_not_found",
            Self::TournamentNotFound(_) => "tournament_not_found",
            Self::NotAByeMatch { .. } => "not_a_bye_match",
            Self::MatchNotReady(_) => "match_not_ready",
            Self::TournamentCompleted(_) => "tournament_completed",
            Self::SlotUnavailable { .. } => "slot_unavailable",
            Self::EmptyCatalog => "empty_catalog",
            Self::Domain(_) => "domain_violation",
            Self::Store(_) => "storage",
        }
    }
}
