// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Team, Tournament};

/// Shortest accepted team name, in characters.
pub const MIN_TEAM_NAME_LEN: usize = 2;

/// Validates a team name in isolation.
///
/// Names are trimmed before checking. Uniqueness is checked separately by
/// [`validate_team_name_unique`] because it needs the other teams.
///
/// # Arguments
///
/// * `name` - The proposed team name
///
/// # Errors
///
/// Returns `DomainError::InvalidTeamName` if the trimmed name is shorter than
/// [`MIN_TEAM_NAME_LEN`] characters.
pub fn validate_team_name(name: &str) -> Result<(), DomainError> {
    if name.trim().chars().count() < MIN_TEAM_NAME_LEN {
        return Err(DomainError::InvalidTeamName(format!(
            "Team name must be at least {MIN_TEAM_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates that no registered team already uses `name`.
///
/// Comparison ignores case and surrounding whitespace.
///
/// # Errors
///
/// Returns `DomainError::DuplicateTeamName` if the name is taken.
pub fn validate_team_name_unique(name: &str, existing: &[Team]) -> Result<(), DomainError> {
    let wanted: String = name.trim().to_lowercase();
    if existing
        .iter()
        .any(|team| team.name.trim().to_lowercase() == wanted)
    {
        return Err(DomainError::DuplicateTeamName {
            name: name.trim().to_string(),
        });
    }
    Ok(())
}

/// Validates a tournament's own configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - `max_teams` is below 2
pub fn validate_tournament(tournament: &Tournament) -> Result<(), DomainError> {
    if tournament.name.trim().is_empty() {
        return Err(DomainError::InvalidTournamentName(String::from(
            "Tournament name cannot be empty",
        )));
    }
    if tournament.max_teams < 2 {
        return Err(DomainError::InvalidMaxTeams {
            max_teams: tournament.max_teams,
        });
    }
    Ok(())
}

/// Validates that a tournament can take one more team.
///
/// # Errors
///
/// Returns `DomainError::TournamentFull` when `registered` already reached capacity.
pub fn validate_capacity(tournament: &Tournament, registered: usize) -> Result<(), DomainError> {
    let capacity: usize = usize::try_from(tournament.max_teams).unwrap_or(usize::MAX);
    if registered >= capacity {
        return Err(DomainError::TournamentFull {
            max_teams: tournament.max_teams,
        });
    }
    Ok(())
}

/// Validates a game name.
///
/// # Errors
///
/// Returns `DomainError::InvalidGameName` if the trimmed name is empty.
pub fn validate_game_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidGameName(String::from(
            "Game name cannot be empty",
        )));
    }
    Ok(())
}
