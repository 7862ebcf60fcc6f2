// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator interfaces the engine reads from and writes through.
//!
//! The engine never owns storage. Every implementation must be safe to share
//! across threads; mutual exclusion per tournament is provided by the service.

use crate::error::StoreError;
use tourney_domain::{
    BracketType, Game, Match, MatchId, MatchStatus, Team, TeamId, Tournament, TournamentFormat,
    TournamentId,
};

/// Team storage.
pub trait TeamRepository: Send + Sync {
    /// Lists the teams registered in a tournament, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError>;

    /// Fetches one team.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_team(&self, team_id: TeamId) -> Result<Option<Team>, StoreError>;

    /// Persists status and result changes of an existing team.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the team does not exist.
    fn save_team(&self, team: &Team) -> Result<(), StoreError>;
}

/// Narrows a match listing. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFilter {
    /// Only this bracket section.
    pub bracket_type: Option<BracketType>,
    /// Only this round.
    pub round_number: Option<u32>,
    /// Only this status.
    pub status: Option<MatchStatus>,
}

impl MatchFilter {
    /// Matches every match.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            bracket_type: None,
            round_number: None,
            status: None,
        }
    }

    /// Restricts to a bracket section.
    #[must_use]
    pub const fn in_bracket(mut self, bracket_type: BracketType) -> Self {
        self.bracket_type = Some(bracket_type);
        self
    }

    /// Restricts to a round.
    #[must_use]
    pub const fn in_round(mut self, round_number: u32) -> Self {
        self.round_number = Some(round_number);
        self
    }

    /// Restricts to a status.
    #[must_use]
    pub const fn with_status(mut self, status: MatchStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if `m` passes the filter.
    #[must_use]
    pub fn accepts(&self, m: &Match) -> bool {
        self.bracket_type.is_none_or(|bt| bt == m.bracket_type)
            && self.round_number.is_none_or(|round| round == m.round_number)
            && self.status.is_none_or(|status| status == m.status)
    }
}

/// Match storage.
pub trait MatchRepository: Send + Sync {
    /// Lists a tournament's matches passing `filter`, ordered by
    /// bracket section, round and match number.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_matches(
        &self,
        tournament_id: TournamentId,
        filter: &MatchFilter,
    ) -> Result<Vec<Match>, StoreError>;

    /// Fetches one match.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_match(&self, match_id: MatchId) -> Result<Option<Match>, StoreError>;

    /// Stores a new match and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the position is already taken.
    fn create_match(&self, new_match: &Match) -> Result<Match, StoreError>;

    /// Persists changes to an existing match.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the match does not exist.
    fn save_match(&self, updated: &Match) -> Result<(), StoreError>;

    /// Removes every match of a tournament and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn delete_all(&self, tournament_id: TournamentId) -> Result<usize, StoreError>;
}

/// Read-only game source.
pub trait GameCatalog: Send + Sync {
    /// Lists the games currently available for assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_active_games(&self) -> Result<Vec<Game>, StoreError>;
}

/// Owner of the tournament entity and its status.
pub trait TournamentLifecycle: Send + Sync {
    /// Fetches a tournament.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_tournament(&self, tournament_id: TournamentId)
    -> Result<Option<Tournament>, StoreError>;

    /// Called after a bracket has been generated and stored.
    ///
    /// The owner records the format the bracket was built for and moves the
    /// tournament to active.
    ///
    /// # Errors
    ///
    /// Returns an error if the tournament cannot be updated.
    fn on_bracket_generated(
        &self,
        tournament_id: TournamentId,
        format: TournamentFormat,
    ) -> Result<(), StoreError>;

    /// Called once when the engine decides the final standing.
    ///
    /// # Errors
    ///
    /// Returns an error if the tournament cannot be updated.
    fn on_tournament_completed(
        &self,
        tournament_id: TournamentId,
        champion: TeamId,
        runner_up: Option<TeamId>,
    ) -> Result<(), StoreError>;
}
