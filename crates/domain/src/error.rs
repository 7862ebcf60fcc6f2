// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bracket_status::BracketStatus;
use crate::types::{TeamId, TournamentStatus};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Team name is empty or too short.
    InvalidTeamName(String),
    /// A team with the same name is already registered in the tournament.
    DuplicateTeamName {
        /// The duplicated name.
        name: String,
    },
    /// Tournament name is empty.
    InvalidTournamentName(String),
    /// Game name is empty.
    InvalidGameName(String),
    /// The tournament has no room for another team.
    TournamentFull {
        /// The configured capacity.
        max_teams: u32,
    },
    /// The tournament no longer accepts team registrations.
    RegistrationClosed {
        /// The tournament's current status.
        status: TournamentStatus,
    },
    /// The configured team capacity cannot hold a bracket.
    InvalidMaxTeams {
        /// The invalid capacity.
        max_teams: u32,
    },
    /// Fewer teams than a bracket needs.
    NotEnoughTeams {
        /// Number of teams available.
        count: usize,
    },
    /// A team's bracket status cannot move in the requested direction.
    InvalidStatusTransition {
        /// The team whose status was being changed.
        team_id: TeamId,
        /// The current status.
        from: BracketStatus,
        /// The requested status.
        to: BracketStatus,
    },
    /// A tournament's lifecycle status cannot move in the requested direction.
    InvalidLifecycleTransition {
        /// The current status.
        from: TournamentStatus,
        /// The requested status.
        to: TournamentStatus,
    },
    /// A string could not be parsed into a bracket type.
    InvalidBracketType(String),
    /// A string could not be parsed into a match status.
    InvalidMatchStatus(String),
    /// A string could not be parsed into a bracket status.
    InvalidBracketStatus(String),
    /// A string could not be parsed into a tournament format.
    InvalidFormat(String),
    /// A string could not be parsed into a tournament status.
    InvalidTournamentStatus(String),
    /// A string could not be parsed into a drop schedule.
    InvalidDropSchedule(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTeamName(msg) => write!(f, "Invalid team name: {msg}"),
            Self::DuplicateTeamName { name } => {
                write!(f, "A team named '{name}' is already registered")
            }
            Self::InvalidTournamentName(msg) => write!(f, "Invalid tournament name: {msg}"),
            Self::InvalidGameName(msg) => write!(f, "Invalid game name: {msg}"),
            Self::TournamentFull { max_teams } => {
                write!(f, "Tournament is full ({max_teams} teams)")
            }
            Self::RegistrationClosed { status } => {
                write!(f, "Registration is closed (tournament is '{status}')")
            }
            Self::InvalidMaxTeams { max_teams } => {
                write!(f, "Invalid team capacity: {max_teams}. Must be at least 2")
            }
            Self::NotEnoughTeams { count } => {
                write!(f, "At least 2 teams are required, found {count}")
            }
            Self::InvalidStatusTransition { team_id, from, to } => {
                write!(
                    f,
                    "Team {team_id} cannot move from bracket status '{from}' to '{to}'"
                )
            }
            Self::InvalidLifecycleTransition { from, to } => {
                write!(f, "Tournament cannot move from '{from}' to '{to}'")
            }
            Self::InvalidBracketType(s) => write!(f, "Invalid bracket type: {s}"),
            Self::InvalidMatchStatus(s) => write!(f, "Invalid match status: {s}"),
            Self::InvalidBracketStatus(s) => write!(f, "Invalid bracket status: {s}"),
            Self::InvalidFormat(s) => write!(f, "Invalid tournament format: {s}"),
            Self::InvalidTournamentStatus(s) => write!(f, "Invalid tournament status: {s}"),
            Self::InvalidDropSchedule(s) => write!(f, "Invalid drop schedule: {s}"),
        }
    }
}

impl std::error::Error for DomainError {}
