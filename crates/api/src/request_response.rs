// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.

use serde::{Deserialize, Serialize};

/// API request to create a tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTournamentRequest {
    /// Display name.
    pub name: String,
    /// Elimination format: `single` or `double`.
    pub format: String,
    /// Registration capacity. Defaults to 16.
    #[serde(default)]
    pub max_teams: Option<u32>,
    /// Points for a played victory. Defaults to 3.
    #[serde(default)]
    pub points_per_win: Option<u32>,
    /// Points for a played loss. Defaults to 1.
    #[serde(default)]
    pub points_per_participation: Option<u32>,
}

/// A tournament as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentInfo {
    /// The tournament's canonical identifier.
    pub tournament_id: i64,
    /// Display name.
    pub name: String,
    /// Elimination format.
    pub format: String,
    /// Lifecycle status.
    pub status: String,
    /// Registration capacity.
    pub max_teams: u32,
    /// Teams registered so far.
    pub team_count: usize,
    /// Points for a played victory.
    pub points_per_win: u32,
    /// Points for a played loss.
    pub points_per_participation: u32,
    /// When the bracket was first generated (RFC 3339).
    pub started_at: Option<String>,
    /// When the tournament completed (RFC 3339).
    pub finished_at: Option<String>,
}

/// API response listing tournaments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTournamentsResponse {
    /// Every tournament, oldest first.
    pub tournaments: Vec<TournamentInfo>,
}

/// API request to register a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTeamRequest {
    /// Team name, unique within the tournament.
    pub name: String,
}

/// A team as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    /// The team's canonical identifier.
    pub team_id: i64,
    /// Display name.
    pub name: String,
    /// Played victories.
    pub wins: u32,
    /// Played losses.
    pub losses: u32,
    /// Accumulated points.
    pub points: u32,
    /// Position in the bracket.
    pub bracket_status: String,
}

/// API response listing a tournament's teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTeamsResponse {
    /// The tournament.
    pub tournament_id: i64,
    /// Teams in registration order.
    pub teams: Vec<TeamInfo>,
}

/// API request to add a game to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddGameRequest {
    /// Display name, unique across the catalog.
    pub name: String,
    /// Optional emoji shown next to the name.
    #[serde(default)]
    pub emoji: Option<String>,
}

/// API request to switch a game on or off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetGameActiveRequest {
    /// Whether the game is handed out to new matches.
    pub active: bool,
}

/// A catalog game as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    /// The game's canonical identifier.
    pub game_id: i64,
    /// Display name.
    pub name: String,
    /// Optional emoji.
    pub emoji: Option<String>,
    /// Whether the game is assigned to new matches.
    pub is_active: bool,
}

/// API response listing games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListGamesResponse {
    /// The games.
    pub games: Vec<GameInfo>,
}

/// API request to generate a bracket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateBracketRequest {
    /// Overrides the tournament's format when set.
    #[serde(default)]
    pub format: Option<String>,
}

/// A match as exposed by the API, with team and game names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    /// The match's canonical identifier.
    pub match_id: i64,
    /// Short label such as `W1-2` or `GF`.
    pub label: String,
    /// Bracket section.
    pub bracket_type: String,
    /// Round within the section.
    pub round_number: u32,
    /// Position within the round.
    pub match_number: u32,
    /// First slot.
    pub team1_id: Option<i64>,
    /// First slot's team name.
    pub team1_name: Option<String>,
    /// Second slot.
    pub team2_id: Option<i64>,
    /// Second slot's team name.
    pub team2_name: Option<String>,
    /// The winner, once decided.
    pub winner_id: Option<i64>,
    /// Progress.
    pub status: String,
    /// Assigned game.
    pub game_id: Option<i64>,
    /// Assigned game's name.
    pub game_name: Option<String>,
    /// True when the match completed without being played.
    pub is_bye: bool,
}

/// API response for bracket generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateBracketResponse {
    /// The tournament.
    pub tournament_id: i64,
    /// Format the bracket was built for.
    pub format: String,
    /// Number of matches stored.
    pub match_count: usize,
    /// The stored matches.
    pub matches: Vec<MatchInfo>,
}

/// API request to record the result of a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeclareWinnerRequest {
    /// The team that won.
    pub winner_id: i64,
}

/// API response for any command that advances the bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceResponse {
    /// The targeted match.
    pub match_id: i64,
    /// The recorded winner, if the match completed.
    pub winner_id: Option<i64>,
    /// The beaten team of a played match.
    pub loser_id: Option<i64>,
    /// True when the match completed without being played.
    pub bye: bool,
    /// Teams advanced by the follow-up sweep.
    pub swept: usize,
    /// The champion, if this call decided the tournament.
    pub champion_id: Option<i64>,
    /// The runner-up, if this call decided the tournament.
    pub runner_up_id: Option<i64>,
    /// Human-readable description of what happened.
    pub message: String,
}

/// API response for a reconciliation sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileResponse {
    /// The tournament.
    pub tournament_id: i64,
    /// Teams advanced by bye.
    pub advanced: usize,
    /// Set when the sweep had to close a stalled tournament.
    pub champion_id: Option<i64>,
    /// Runner-up of a closed tournament.
    pub runner_up_id: Option<i64>,
}

/// API response for finishing a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishTournamentResponse {
    /// The tournament.
    pub tournament_id: i64,
    /// The champion.
    pub champion_id: i64,
    /// The champion's name.
    pub champion_name: Option<String>,
    /// The runner-up, if one could be determined.
    pub runner_up_id: Option<i64>,
    /// The runner-up's name.
    pub runner_up_name: Option<String>,
}

/// API response listing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMatchesResponse {
    /// The tournament.
    pub tournament_id: i64,
    /// The matches.
    pub matches: Vec<MatchInfo>,
}

/// API response with matches grouped by bracket section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketResponse {
    /// The tournament.
    pub tournament_id: i64,
    /// Winners bracket.
    pub winners: Vec<MatchInfo>,
    /// Losers bracket.
    pub losers: Vec<MatchInfo>,
    /// Grand final and final reset.
    pub finals: Vec<MatchInfo>,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingInfo {
    /// 1-based position.
    pub rank: usize,
    /// The team.
    pub team_id: i64,
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
    /// Position in the bracket.
    pub bracket_status: String,
}

/// API response with the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsResponse {
    /// The tournament.
    pub tournament_id: i64,
    /// Rows, best first.
    pub standings: Vec<StandingInfo>,
}

/// API response with head counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The tournament.
    pub tournament_id: i64,
    /// Lifecycle status.
    pub status: String,
    /// Registered teams.
    pub total_teams: usize,
    /// Teams not yet eliminated.
    pub active_teams: usize,
    /// Eliminated teams.
    pub eliminated_teams: usize,
    /// All matches.
    pub total_matches: usize,
    /// Completed matches.
    pub completed_matches: usize,
    /// Pending matches.
    pub pending_matches: usize,
    /// Matches being played.
    pub in_progress_matches: usize,
    /// The champion, once decided.
    pub champion_id: Option<i64>,
    /// The runner-up, once decided.
    pub runner_up_id: Option<i64>,
}

/// Usage of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameUsageInfo {
    /// The game.
    pub game_id: i64,
    /// Display name.
    pub name: String,
    /// Times assigned.
    pub usage_count: u32,
    /// Share of all assignments, in percent.
    pub percentage: f64,
}

/// API response describing how evenly games were handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReportResponse {
    /// The tournament.
    pub tournament_id: i64,
    /// Games assigned to stored matches.
    pub total_assigned: u32,
    /// Per-game usage.
    pub usage: Vec<GameUsageInfo>,
    /// Lowest usage count.
    pub min_usage: u32,
    /// Highest usage count.
    pub max_usage: u32,
    /// Gap between the most and least used game.
    pub difference: u32,
    /// 100 when every game was used equally often, lower as the gap grows.
    pub balance_score: f64,
    /// True while usage counts differ by at most one.
    pub is_balanced: bool,
}
