// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Match queries.
//!
//! Bracket section names do not sort in display order, so listings are
//! ordered in Rust by [`Match::position`] after loading.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tourney::MatchFilter;
use tourney_domain::{Match, MatchId, TournamentId};
use tracing::debug;

use crate::data_models::{MatchRow, to_column};
use crate::diesel_schema::matches;
use crate::error::PersistenceError;

/// Lists a tournament's matches passing `filter`, ordered by bracket
/// section, round and match number.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tournament_id` - The tournament
/// * `filter` - Optional section, round and status restrictions
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn list_matches(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
    filter: &MatchFilter,
) -> Result<Vec<Match>, PersistenceError> {
    let mut query = matches::table
        .filter(matches::tournament_id.eq(tournament_id.value()))
        .select(MatchRow::as_select())
        .into_boxed();
    if let Some(bracket_type) = filter.bracket_type {
        query = query.filter(matches::bracket_type.eq(bracket_type.as_str()));
    }
    if let Some(round_number) = filter.round_number {
        query = query.filter(matches::round_number.eq(to_column(round_number, "round_number")?));
    }
    if let Some(status) = filter.status {
        query = query.filter(matches::status.eq(status.as_str()));
    }

    let rows: Vec<MatchRow> = query.load(conn)?;
    debug!(tournament_id = %tournament_id, count = rows.len(), "Loaded matches");

    let mut listed: Vec<Match> = rows
        .into_iter()
        .map(Match::try_from)
        .collect::<Result<_, _>>()?;
    listed.sort_by_key(Match::position);
    Ok(listed)
}

/// Retrieves a match by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is malformed.
/// Returns `Ok(None)` if the match is not found.
pub fn get_match(
    conn: &mut SqliteConnection,
    match_id: MatchId,
) -> Result<Option<Match>, PersistenceError> {
    let result: Result<MatchRow, diesel::result::Error> = matches::table
        .filter(matches::match_id.eq(match_id.value()))
        .select(MatchRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Match::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
