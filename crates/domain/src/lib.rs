// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod bracket_match;
mod bracket_status;
mod error;
mod standings;
mod structure;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use bracket_match::{BracketType, Match, MatchStatus};
pub use bracket_status::BracketStatus;
pub use error::DomainError;
pub use standings::{Standing, TournamentSummary, compute_standings, summarize};
pub use structure::{
    DropSchedule, bracket_size, bye_count, first_round_match_count,
    losers_first_round_match_count, winners_round_count, winners_round_match_count,
};
pub use types::{
    Game, GameId, MatchId, ScoringRules, Team, TeamId, Tournament, TournamentFormat,
    TournamentId, TournamentStatus,
};
pub use validation::{
    MIN_TEAM_NAME_LEN, validate_capacity, validate_game_name, validate_team_name,
    validate_team_name_unique, validate_tournament,
};
