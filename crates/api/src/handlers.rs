// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler validates its input, runs the operation against the
//! persistence layer or the bracket service, and converts the result into
//! an API response. Engine and storage errors are translated explicitly.

use std::collections::HashMap;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tourney::{
    AdvanceSummary, BracketOverview, BracketService, DEFAULT_NEXT_MATCHES, DistributionReport,
    MatchRepository, Outcome, SweepReport, TeamRepository,
};
use tourney_domain::{
    DropSchedule, Game, GameId, Match, MatchId, ScoringRules, Standing, Team, TeamId,
    Tournament, TournamentFormat, TournamentId, TournamentSummary,
};
use tourney_persistence::{Persistence, TournamentExport};
use tracing::info;

use crate::error::{
    ApiError, translate_advance_error, translate_build_error, translate_domain_error,
    translate_persistence_error, translate_store_error,
};
use crate::request_response::{
    AddGameRequest, AdvanceResponse, BracketResponse, CreateTournamentRequest,
    DeclareWinnerRequest, FinishTournamentResponse, GameInfo, GameReportResponse, GameUsageInfo,
    GenerateBracketRequest, GenerateBracketResponse, ListGamesResponse, ListMatchesResponse,
    ListTeamsResponse, ListTournamentsResponse, MatchInfo, ReconcileResponse,
    RegisterTeamRequest, SetGameActiveRequest, StandingInfo, StandingsResponse, SummaryResponse,
    TeamInfo, TournamentInfo,
};

/// Largest number of matches or games a listing may ask for.
pub const MAX_LISTING: usize = 100;

/// Team and game names used to decorate match listings.
struct NameIndex {
    teams: HashMap<TeamId, String>,
    games: HashMap<GameId, String>,
}

impl NameIndex {
    fn load(persistence: &Persistence, tournament_id: TournamentId) -> Result<Self, ApiError> {
        let teams: Vec<Team> = persistence
            .list_teams(tournament_id)
            .map_err(translate_store_error)?;
        let games: Vec<Game> = persistence
            .list_games()
            .map_err(translate_persistence_error)?;
        Ok(Self {
            teams: teams.into_iter().map(|t| (t.team_id, t.name)).collect(),
            games: games.into_iter().map(|g| (g.game_id, g.name)).collect(),
        })
    }

    fn team(&self, team_id: Option<TeamId>) -> Option<String> {
        team_id.and_then(|id| self.teams.get(&id).cloned())
    }

    fn match_info(&self, m: &Match) -> Result<MatchInfo, ApiError> {
        let match_id: MatchId = m.match_id.ok_or_else(|| ApiError::Internal {
            message: format!("Match {} has no identifier", m.label()),
        })?;
        Ok(MatchInfo {
            match_id: match_id.value(),
            label: m.label(),
            bracket_type: m.bracket_type.to_string(),
            round_number: m.round_number,
            match_number: m.match_number,
            team1_id: m.team1.map(|t| t.value()),
            team1_name: self.team(m.team1),
            team2_id: m.team2.map(|t| t.value()),
            team2_name: self.team(m.team2),
            winner_id: m.winner.map(|t| t.value()),
            status: m.status.to_string(),
            game_id: m.game.map(|g| g.value()),
            game_name: m.game.and_then(|g| self.games.get(&g).cloned()),
            is_bye: m.is_bye,
        })
    }

    fn match_infos(&self, matches: &[Match]) -> Result<Vec<MatchInfo>, ApiError> {
        matches.iter().map(|m| self.match_info(m)).collect()
    }

    fn describe(&self, summary: &AdvanceSummary) -> String {
        let name = |id: Option<TeamId>| {
            self.team(id).unwrap_or_else(|| String::from("Unknown team"))
        };
        let mut message: String = if summary.bye {
            format!("{} advanced by bye", name(summary.winner))
        } else if summary.loser.is_some() {
            format!("{} defeated {}", name(summary.winner), name(summary.loser))
        } else {
            format!("Match {} started", summary.match_id)
        };
        if summary.swept > 0 {
            message.push_str(&format!("; {} team(s) advanced by bye", summary.swept));
        }
        if let Some(outcome) = summary.outcome {
            message.push_str(&format!("; {} won the tournament", name(Some(outcome.champion))));
        }
        message
    }
}

fn format_timestamp(value: Option<OffsetDateTime>) -> Result<Option<String>, ApiError> {
    value
        .map(|ts| {
            ts.format(&Rfc3339).map_err(|e| ApiError::Internal {
                message: format!("Failed to format timestamp: {e}"),
            })
        })
        .transpose()
}

fn tournament_info(
    persistence: &Persistence,
    tournament: &Tournament,
) -> Result<TournamentInfo, ApiError> {
    let team_count: usize = persistence
        .count_teams(tournament.tournament_id)
        .map_err(translate_persistence_error)?;
    Ok(TournamentInfo {
        tournament_id: tournament.tournament_id.value(),
        name: tournament.name.clone(),
        format: tournament.format.to_string(),
        status: tournament.status.to_string(),
        max_teams: tournament.max_teams,
        team_count,
        points_per_win: tournament.scoring.points_per_win,
        points_per_participation: tournament.scoring.points_per_participation,
        started_at: format_timestamp(tournament.started_at)?,
        finished_at: format_timestamp(tournament.finished_at)?,
    })
}

fn team_info(team: &Team) -> TeamInfo {
    TeamInfo {
        team_id: team.team_id.value(),
        name: team.name.clone(),
        wins: team.wins,
        losses: team.losses,
        points: team.points,
        bracket_status: team.bracket_status.to_string(),
    }
}

fn game_info(game: &Game) -> GameInfo {
    GameInfo {
        game_id: game.game_id.value(),
        name: game.name.clone(),
        emoji: game.emoji.clone(),
        is_active: game.is_active,
    }
}

fn ensure_tournament(
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<Tournament, ApiError> {
    persistence
        .fetch_tournament(TournamentId::new(tournament_id))
        .map_err(translate_persistence_error)
}

fn validate_listing(field: &str, value: usize) -> Result<(), ApiError> {
    if value == 0 || value > MAX_LISTING {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Must be between 1 and {MAX_LISTING}, got {value}"),
        });
    }
    Ok(())
}

/// Parses a drop schedule name.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for an unknown schedule.
pub fn parse_drop_schedule(value: &str) -> Result<DropSchedule, ApiError> {
    value.parse().map_err(translate_domain_error)
}

// ============================================================================
// Tournaments
// ============================================================================

/// Creates a new tournament.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The API request to create a tournament
///
/// # Errors
///
/// Returns an error if:
/// - The format is unknown
/// - The name is empty
/// - The capacity is below 2
pub fn create_tournament(
    persistence: &Persistence,
    request: &CreateTournamentRequest,
) -> Result<TournamentInfo, ApiError> {
    let format: TournamentFormat = request.format.parse().map_err(translate_domain_error)?;
    let defaults: ScoringRules = ScoringRules::default();
    let scoring: ScoringRules = ScoringRules {
        points_per_win: request.points_per_win.unwrap_or(defaults.points_per_win),
        points_per_participation: request
            .points_per_participation
            .unwrap_or(defaults.points_per_participation),
    };
    let max_teams: u32 = request.max_teams.unwrap_or(Tournament::DEFAULT_MAX_TEAMS);

    let tournament: Tournament = persistence
        .create_tournament(&request.name, format, max_teams, scoring)
        .map_err(translate_persistence_error)?;

    info!(
        tournament_id = %tournament.tournament_id,
        name = %tournament.name,
        format = %format,
        "Created tournament"
    );
    tournament_info(persistence, &tournament)
}

/// Lists every tournament.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_tournaments(persistence: &Persistence) -> Result<ListTournamentsResponse, ApiError> {
    let tournaments: Vec<Tournament> = persistence
        .list_tournaments()
        .map_err(translate_persistence_error)?;
    let tournaments: Vec<TournamentInfo> = tournaments
        .iter()
        .map(|t| tournament_info(persistence, t))
        .collect::<Result<_, _>>()?;
    Ok(ListTournamentsResponse { tournaments })
}

/// Fetches one tournament.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the tournament does not exist.
pub fn get_tournament(
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<TournamentInfo, ApiError> {
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    tournament_info(persistence, &tournament)
}

/// Opens a tournament for registration.
///
/// # Errors
///
/// Returns an error if the tournament does not exist or is past setup.
pub fn open_registration(
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<TournamentInfo, ApiError> {
    let tournament: Tournament = persistence
        .open_registration(TournamentId::new(tournament_id))
        .map_err(translate_persistence_error)?;
    info!(tournament_id, "Registration opened");
    tournament_info(persistence, &tournament)
}

// ============================================================================
// Teams
// ============================================================================

/// Registers a team.
///
/// # Errors
///
/// Returns an error if:
/// - The tournament does not exist or is no longer accepting teams
/// - The name is too short or already taken
/// - The tournament is full
pub fn register_team(
    persistence: &Persistence,
    tournament_id: i64,
    request: &RegisterTeamRequest,
) -> Result<TeamInfo, ApiError> {
    let team: Team = persistence
        .register_team(TournamentId::new(tournament_id), &request.name)
        .map_err(translate_persistence_error)?;
    info!(
        tournament_id,
        team_id = %team.team_id,
        name = %team.name,
        "Registered team"
    );
    Ok(team_info(&team))
}

/// Lists a tournament's teams.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the tournament does not exist.
pub fn list_teams(
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<ListTeamsResponse, ApiError> {
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    let teams: Vec<Team> = persistence
        .list_teams(tournament.tournament_id)
        .map_err(translate_store_error)?;
    Ok(ListTeamsResponse {
        tournament_id,
        teams: teams.iter().map(team_info).collect(),
    })
}

// ============================================================================
// Game catalog
// ============================================================================

/// Adds a game to the catalog.
///
/// # Errors
///
/// Returns an error if the name is empty or already used.
pub fn add_game(persistence: &Persistence, request: &AddGameRequest) -> Result<GameInfo, ApiError> {
    let emoji: Option<&str> = request
        .emoji
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());
    let game: Game = persistence
        .add_game(&request.name, emoji)
        .map_err(translate_persistence_error)?;
    info!(game_id = %game.game_id, name = %game.name, "Added game");
    Ok(game_info(&game))
}

/// Switches a game on or off.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the game does not exist.
pub fn set_game_active(
    persistence: &Persistence,
    game_id: i64,
    request: SetGameActiveRequest,
) -> Result<GameInfo, ApiError> {
    let game: Game = persistence
        .set_game_active(GameId::new(game_id), request.active)
        .map_err(translate_persistence_error)?;
    info!(game_id, active = request.active, "Updated game");
    Ok(game_info(&game))
}

/// Lists the catalog, including inactive games.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_games(persistence: &Persistence) -> Result<ListGamesResponse, ApiError> {
    let games: Vec<Game> = persistence
        .list_games()
        .map_err(translate_persistence_error)?;
    Ok(ListGamesResponse {
        games: games.iter().map(game_info).collect(),
    })
}

/// The next games a fresh rotation would hand out.
///
/// # Errors
///
/// Returns an error if the count is out of range or no game is active.
pub fn preview_games(
    service: &BracketService,
    count: usize,
) -> Result<ListGamesResponse, ApiError> {
    validate_listing("count", count)?;
    let games: Vec<Game> = service
        .preview_games(count)
        .map_err(translate_build_error)?;
    Ok(ListGamesResponse {
        games: games.iter().map(game_info).collect(),
    })
}

// ============================================================================
// Bracket commands
// ============================================================================

/// Generates the bracket, replacing any existing one.
///
/// # Arguments
///
/// * `service` - The bracket service
/// * `persistence` - The persistence layer, used to resolve names
/// * `tournament_id` - The tournament
/// * `request` - Optional format override
///
/// # Errors
///
/// Returns an error if:
/// - The tournament does not exist or is completed
/// - Fewer than two teams are registered
/// - No game is active
pub fn generate_bracket(
    service: &BracketService,
    persistence: &Persistence,
    tournament_id: i64,
    request: &GenerateBracketRequest,
) -> Result<GenerateBracketResponse, ApiError> {
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    let format: TournamentFormat = match request.format.as_deref() {
        Some(value) => value.parse().map_err(translate_domain_error)?,
        None => tournament.format,
    };

    let matches: Vec<Match> = service
        .generate_bracket(tournament.tournament_id, format)
        .map_err(translate_build_error)?;

    let names: NameIndex = NameIndex::load(persistence, tournament.tournament_id)?;
    Ok(GenerateBracketResponse {
        tournament_id,
        format: format.to_string(),
        match_count: matches.len(),
        matches: names.match_infos(&matches)?,
    })
}

fn advance_response(
    persistence: &Persistence,
    summary: &AdvanceSummary,
) -> Result<AdvanceResponse, ApiError> {
    let tournament_id: TournamentId = persistence
        .get_match(summary.match_id)
        .map_err(translate_store_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Match"),
            message: format!("Match {} does not exist", summary.match_id),
        })?
        .tournament_id;
    let names: NameIndex = NameIndex::load(persistence, tournament_id)?;
    Ok(AdvanceResponse {
        match_id: summary.match_id.value(),
        winner_id: summary.winner.map(|t| t.value()),
        loser_id: summary.loser.map(|t| t.value()),
        bye: summary.bye,
        swept: summary.swept,
        champion_id: summary.outcome.map(|o| o.champion.value()),
        runner_up_id: summary
            .outcome
            .and_then(|o| o.runner_up)
            .map(|t| t.value()),
        message: names.describe(summary),
    })
}

/// Records the result of a match.
///
/// # Errors
///
/// Returns an error if the match is unknown or completed, the winner is not
/// playing in it, or the tournament is completed.
pub fn declare_winner(
    service: &BracketService,
    persistence: &Persistence,
    match_id: i64,
    request: DeclareWinnerRequest,
) -> Result<AdvanceResponse, ApiError> {
    let summary: AdvanceSummary = service
        .declare_winner(MatchId::new(match_id), TeamId::new(request.winner_id))
        .map_err(translate_advance_error)?;
    advance_response(persistence, &summary)
}

/// Advances the single waiting team of a match.
///
/// # Errors
///
/// Returns an error if the match does not hold exactly one team.
pub fn manual_advance(
    service: &BracketService,
    persistence: &Persistence,
    match_id: i64,
) -> Result<AdvanceResponse, ApiError> {
    let summary: AdvanceSummary = service
        .manual_advance(MatchId::new(match_id))
        .map_err(translate_advance_error)?;
    advance_response(persistence, &summary)
}

/// Marks a ready match as being played.
///
/// # Errors
///
/// Returns an error if the match is unknown or not ready.
pub fn start_match(
    service: &BracketService,
    persistence: &Persistence,
    match_id: i64,
) -> Result<MatchInfo, ApiError> {
    let started: Match = service
        .start_match(MatchId::new(match_id))
        .map_err(translate_advance_error)?;
    NameIndex::load(persistence, started.tournament_id)?.match_info(&started)
}

/// Runs a reconciliation sweep.
///
/// # Errors
///
/// Returns an error if the tournament does not exist or routing fails.
pub fn reconcile(
    service: &BracketService,
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<ReconcileResponse, ApiError> {
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    let report: SweepReport = service
        .reconcile(tournament.tournament_id)
        .map_err(translate_advance_error)?;
    Ok(ReconcileResponse {
        tournament_id,
        advanced: report.advanced,
        champion_id: report.finalized.map(|o| o.champion.value()),
        runner_up_id: report
            .finalized
            .and_then(|o| o.runner_up)
            .map(|t| t.value()),
    })
}

/// Closes a tournament from the current results.
///
/// # Errors
///
/// Returns an error if the tournament does not exist, is already completed
/// or has no team left to crown.
pub fn finish_tournament(
    service: &BracketService,
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<FinishTournamentResponse, ApiError> {
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    let outcome: Outcome = service
        .finish_tournament(tournament.tournament_id)
        .map_err(translate_advance_error)?;
    let names: NameIndex = NameIndex::load(persistence, tournament.tournament_id)?;
    Ok(FinishTournamentResponse {
        tournament_id,
        champion_id: outcome.champion.value(),
        champion_name: names.team(Some(outcome.champion)),
        runner_up_id: outcome.runner_up.map(|t| t.value()),
        runner_up_name: names.team(outcome.runner_up),
    })
}

// ============================================================================
// Queries
// ============================================================================

/// Matches that can be played now.
///
/// # Errors
///
/// Returns an error if the limit is out of range or the tournament does not exist.
pub fn next_matches(
    service: &BracketService,
    persistence: &Persistence,
    tournament_id: i64,
    limit: Option<usize>,
) -> Result<ListMatchesResponse, ApiError> {
    let limit: usize = limit.unwrap_or(DEFAULT_NEXT_MATCHES);
    validate_listing("limit", limit)?;
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    let matches: Vec<Match> = service
        .next_matches(tournament.tournament_id, limit)
        .map_err(translate_store_error)?;
    let names: NameIndex = NameIndex::load(persistence, tournament.tournament_id)?;
    Ok(ListMatchesResponse {
        tournament_id,
        matches: names.match_infos(&matches)?,
    })
}

/// All matches grouped by bracket section.
///
/// # Errors
///
/// Returns an error if the tournament does not exist.
pub fn bracket(
    service: &BracketService,
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<BracketResponse, ApiError> {
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    let overview: BracketOverview = service
        .bracket_overview(tournament.tournament_id)
        .map_err(translate_store_error)?;
    let names: NameIndex = NameIndex::load(persistence, tournament.tournament_id)?;
    Ok(BracketResponse {
        tournament_id,
        winners: names.match_infos(&overview.winners)?,
        losers: names.match_infos(&overview.losers)?,
        finals: names.match_infos(&overview.finals)?,
    })
}

/// The leaderboard.
///
/// # Errors
///
/// Returns an error if the tournament does not exist.
pub fn standings(
    service: &BracketService,
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<StandingsResponse, ApiError> {
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    let rows: Vec<Standing> = service
        .standings(tournament.tournament_id)
        .map_err(translate_store_error)?;
    Ok(StandingsResponse {
        tournament_id,
        standings: rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| StandingInfo {
                rank: index + 1,
                team_id: row.team_id.value(),
                name: row.name,
                points: row.points,
                wins: row.wins,
                losses: row.losses,
                win_rate: row.win_rate,
                bracket_status: row.bracket_status.to_string(),
            })
            .collect(),
    })
}

/// Team and match counts.
///
/// # Errors
///
/// Returns an error if the tournament does not exist.
pub fn summary(
    service: &BracketService,
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<SummaryResponse, ApiError> {
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    let counts: TournamentSummary = service
        .summary(tournament.tournament_id)
        .map_err(translate_store_error)?;
    Ok(SummaryResponse {
        tournament_id,
        status: tournament.status.to_string(),
        total_teams: counts.total_teams,
        active_teams: counts.active_teams,
        eliminated_teams: counts.eliminated_teams,
        total_matches: counts.total_matches,
        completed_matches: counts.completed_matches,
        pending_matches: counts.pending_matches,
        in_progress_matches: counts.in_progress_matches,
        champion_id: counts.champion.map(|t| t.value()),
        runner_up_id: counts.runner_up.map(|t| t.value()),
    })
}

/// Game usage across a tournament's matches.
///
/// # Errors
///
/// Returns an error if the tournament does not exist or no game is active.
pub fn game_report(
    service: &BracketService,
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<GameReportResponse, ApiError> {
    let tournament: Tournament = ensure_tournament(persistence, tournament_id)?;
    let report: DistributionReport = service
        .game_report(tournament.tournament_id)
        .map_err(translate_build_error)?;
    Ok(GameReportResponse {
        tournament_id,
        total_assigned: report.total_assigned,
        usage: report
            .usage
            .into_iter()
            .map(|u| GameUsageInfo {
                game_id: u.game_id.value(),
                name: u.name,
                usage_count: u.usage_count,
                percentage: u.percentage,
            })
            .collect(),
        min_usage: report.min_usage,
        max_usage: report.max_usage,
        difference: report.difference,
        balance_score: report.balance_score,
        is_balanced: report.is_balanced,
    })
}

/// Everything stored for a tournament.
///
/// # Errors
///
/// Returns an error if the tournament does not exist.
pub fn export_tournament(
    persistence: &Persistence,
    tournament_id: i64,
) -> Result<TournamentExport, ApiError> {
    persistence
        .export(TournamentId::new(tournament_id))
        .map_err(translate_persistence_error)
}
