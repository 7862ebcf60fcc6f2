// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leaderboard and tournament summary figures.

use crate::bracket_match::{Match, MatchStatus};
use crate::bracket_status::BracketStatus;
use crate::types::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// The team.
    pub team_id: TeamId,
    /// Display name.
    pub name: String,
    /// Accumulated points.
    pub points: u32,
    /// Played victories.
    pub wins: u32,
    /// Played losses.
    pub losses: u32,
    /// Percentage of played matches won.
    pub win_rate: f64,
    /// Current bracket position.
    pub bracket_status: BracketStatus,
}

/// Builds the leaderboard: points descending, then wins descending, then name.
#[must_use]
pub fn compute_standings(teams: &[Team]) -> Vec<Standing> {
    let mut ordered: Vec<&Team> = teams.iter().collect();
    ordered.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.wins.cmp(&a.wins))
            .then_with(|| a.name.cmp(&b.name))
    });

    ordered
        .into_iter()
        .map(|team| Standing {
            team_id: team.team_id,
            name: team.name.clone(),
            points: team.points,
            wins: team.wins,
            losses: team.losses,
            win_rate: team.win_rate(),
            bracket_status: team.bracket_status,
        })
        .collect()
}

/// Head counts for a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TournamentSummary {
    /// Registered teams.
    pub total_teams: usize,
    /// Teams not yet eliminated.
    pub active_teams: usize,
    /// Eliminated teams.
    pub eliminated_teams: usize,
    /// The champion, once decided.
    pub champion: Option<TeamId>,
    /// The runner-up, once decided.
    pub runner_up: Option<TeamId>,
    /// All matches.
    pub total_matches: usize,
    /// Completed matches.
    pub completed_matches: usize,
    /// Pending matches.
    pub pending_matches: usize,
    /// Matches being played.
    pub in_progress_matches: usize,
}

/// Counts teams and matches by status.
#[must_use]
pub fn summarize(teams: &[Team], matches: &[Match]) -> TournamentSummary {
    let count_matches = |status: MatchStatus| matches.iter().filter(|m| m.status == status).count();
    let find_team = |status: BracketStatus| {
        teams
            .iter()
            .find(|team| team.bracket_status == status)
            .map(|team| team.team_id)
    };
    let eliminated_teams: usize = teams
        .iter()
        .filter(|team| team.bracket_status == BracketStatus::Eliminated)
        .count();

    TournamentSummary {
        total_teams: teams.len(),
        active_teams: teams.len() - eliminated_teams,
        eliminated_teams,
        champion: find_team(BracketStatus::Champion),
        runner_up: find_team(BracketStatus::RunnerUp),
        total_matches: matches.len(),
        completed_matches: count_matches(MatchStatus::Completed),
        pending_matches: count_matches(MatchStatus::Pending),
        in_progress_matches: count_matches(MatchStatus::InProgress),
    }
}
