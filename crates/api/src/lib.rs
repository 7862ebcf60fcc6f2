// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Tourney bracket engine.
//!
//! Handlers accept plain request types, call into the persistence layer or
//! the [`tourney::BracketService`], and return plain response types. Every
//! engine and storage error is translated into an [`ApiError`] so callers
//! never depend on internal error types.

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

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_advance_error, translate_build_error, translate_domain_error,
    translate_persistence_error, translate_store_error,
};
pub use handlers::{
    MAX_LISTING, add_game, bracket, create_tournament, declare_winner, export_tournament,
    finish_tournament, game_report, generate_bracket, get_tournament, list_games, list_teams,
    list_tournaments, manual_advance, next_matches, open_registration, parse_drop_schedule,
    preview_games, reconcile, register_team, set_game_active, standings, start_match, summary,
};
pub use request_response::{
    AddGameRequest, AdvanceResponse, BracketResponse, CreateTournamentRequest,
    DeclareWinnerRequest, FinishTournamentResponse, GameInfo, GameReportResponse, GameUsageInfo,
    GenerateBracketRequest, GenerateBracketResponse, ListGamesResponse, ListMatchesResponse,
    ListTeamsResponse, ListTournamentsResponse, MatchInfo, ReconcileResponse,
    RegisterTeamRequest, SetGameActiveRequest, StandingInfo, StandingsResponse, SummaryResponse,
    TeamInfo, TournamentInfo,
};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
