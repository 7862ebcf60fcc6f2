// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion into domain values.
//!
//! Counters are stored as `INTEGER`, booleans as `0`/`1`, enums by their
//! snake_case name and timestamps as RFC 3339 text.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tourney_domain::{
    DomainError, Game, GameId, Match, MatchId, ScoringRules, Standing, Team, TeamId, Tournament,
    TournamentId,
};

use crate::diesel_schema::{games, matches, teams, tournaments};
use crate::error::PersistenceError;

/// Diesel Queryable struct for tournament rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = tournaments)]
pub struct TournamentRow {
    pub tournament_id: i64,
    pub name: String,
    pub format: String,
    pub status: String,
    pub max_teams: i32,
    pub points_per_win: i32,
    pub points_per_participation: i32,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
}

/// Diesel Queryable struct for team rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = teams)]
pub struct TeamRow {
    pub team_id: i64,
    pub tournament_id: i64,
    pub name: String,
    pub wins: i32,
    pub losses: i32,
    pub points: i32,
    pub bracket_status: String,
}

/// Diesel Queryable struct for game rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = games)]
pub struct GameRow {
    pub game_id: i64,
    pub name: String,
    pub emoji: Option<String>,
    pub is_active: i32,
}

/// Diesel Queryable struct for match rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = matches)]
pub struct MatchRow {
    pub match_id: i64,
    pub tournament_id: i64,
    pub bracket_type: String,
    pub round_number: i32,
    pub match_number: i32,
    pub team1_id: Option<i64>,
    pub team2_id: Option<i64>,
    pub winner_id: Option<i64>,
    pub status: String,
    pub game_id: Option<i64>,
    pub is_bye: i32,
    pub created_at: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

/// Everything stored for one tournament, as written by
/// [`Persistence::export_json`](crate::Persistence::export_json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentExport {
    pub tournament: Tournament,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub standings: Vec<Standing>,
}

/// Converts an unsigned counter to its column type.
///
/// # Errors
///
/// Returns an error if the value does not fit.
pub fn to_column(value: u32, field: &str) -> Result<i32, PersistenceError> {
    value.to_i32().ok_or_else(|| {
        PersistenceError::SerializationError(format!("{field} out of range: {value}"))
    })
}

/// Converts a stored counter back to its domain type.
///
/// # Errors
///
/// Returns an error if the stored value is negative.
pub fn from_column(value: i32, field: &str) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("{field} out of range: {value}"))
    })
}

/// Parses a stored enum name.
///
/// # Errors
///
/// Returns an error if the name is unknown.
pub fn parse_column<T>(value: &str) -> Result<T, PersistenceError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .parse::<T>()
        .map_err(|e: DomainError| PersistenceError::ReconstructionError(e.to_string()))
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Formats an optional timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_optional_timestamp(
    at: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    at.map(format_timestamp).transpose()
}

fn parse_timestamp(value: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value
        .map(|s| {
            OffsetDateTime::parse(s, &Rfc3339)
                .map_err(|e| PersistenceError::ReconstructionError(format!("timestamp '{s}': {e}")))
        })
        .transpose()
}

impl TryFrom<TournamentRow> for Tournament {
    type Error = PersistenceError;

    fn try_from(row: TournamentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            tournament_id: TournamentId::new(row.tournament_id),
            name: row.name,
            format: parse_column(&row.format)?,
            status: parse_column(&row.status)?,
            max_teams: from_column(row.max_teams, "max_teams")?,
            scoring: ScoringRules {
                points_per_win: from_column(row.points_per_win, "points_per_win")?,
                points_per_participation: from_column(
                    row.points_per_participation,
                    "points_per_participation",
                )?,
            },
            started_at: parse_timestamp(row.started_at.as_deref())?,
            finished_at: parse_timestamp(row.finished_at.as_deref())?,
        })
    }
}

impl TryFrom<TeamRow> for Team {
    type Error = PersistenceError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(Self {
            team_id: TeamId::new(row.team_id),
            tournament_id: TournamentId::new(row.tournament_id),
            name: row.name,
            wins: from_column(row.wins, "wins")?,
            losses: from_column(row.losses, "losses")?,
            points: from_column(row.points, "points")?,
            bracket_status: parse_column(&row.bracket_status)?,
        })
    }
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Self {
            game_id: GameId::new(row.game_id),
            name: row.name,
            emoji: row.emoji,
            is_active: row.is_active != 0,
        }
    }
}

impl TryFrom<MatchRow> for Match {
    type Error = PersistenceError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        Ok(Self {
            match_id: Some(MatchId::new(row.match_id)),
            tournament_id: TournamentId::new(row.tournament_id),
            bracket_type: parse_column(&row.bracket_type)?,
            round_number: from_column(row.round_number, "round_number")?,
            match_number: from_column(row.match_number, "match_number")?,
            team1: row.team1_id.map(TeamId::new),
            team2: row.team2_id.map(TeamId::new),
            winner: row.winner_id.map(TeamId::new),
            status: parse_column(&row.status)?,
            game: row.game_id.map(GameId::new),
            is_bye: row.is_bye != 0,
            created_at: parse_timestamp(row.created_at.as_deref())?,
            started_at: parse_timestamp(row.started_at.as_deref())?,
            completed_at: parse_timestamp(row.completed_at.as_deref())?,
        })
    }
}
