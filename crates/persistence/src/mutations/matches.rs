// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tourney_domain::{Match, TournamentId};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{format_optional_timestamp, format_timestamp, to_column};
use crate::diesel_schema::matches;
use crate::error::PersistenceError;

/// Inserts a match and returns its id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_match` - The match to store; its id is ignored
/// * `created_at` - Creation time to record
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the bracket position is taken.
pub fn insert_match(
    conn: &mut SqliteConnection,
    new_match: &Match,
    created_at: time::OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(matches::table)
        .values((
            matches::tournament_id.eq(new_match.tournament_id.value()),
            matches::bracket_type.eq(new_match.bracket_type.as_str()),
            matches::round_number.eq(to_column(new_match.round_number, "round_number")?),
            matches::match_number.eq(to_column(new_match.match_number, "match_number")?),
            matches::team1_id.eq(new_match.team1.map(|t| t.value())),
            matches::team2_id.eq(new_match.team2.map(|t| t.value())),
            matches::winner_id.eq(new_match.winner.map(|t| t.value())),
            matches::status.eq(new_match.status.as_str()),
            matches::game_id.eq(new_match.game.map(|g| g.value())),
            matches::is_bye.eq(i32::from(new_match.is_bye)),
            matches::created_at.eq(Some(format_timestamp(created_at)?)),
            matches::started_at.eq(format_optional_timestamp(new_match.started_at)?),
            matches::completed_at.eq(format_optional_timestamp(new_match.completed_at)?),
        ))
        .execute(conn)?;

    let match_id: i64 = conn.get_last_insert_rowid()?;
    debug!(match_id, label = %new_match.label(), "Created match");
    Ok(match_id)
}

/// Writes a stored match's slots, result, status and timestamps.
///
/// Returns the number of rows updated. A match without an id updates nothing.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_match(
    conn: &mut SqliteConnection,
    updated: &Match,
) -> Result<usize, PersistenceError> {
    let Some(match_id) = updated.match_id else {
        return Ok(0);
    };

    let rows: usize = diesel::update(matches::table)
        .filter(matches::match_id.eq(match_id.value()))
        .set((
            matches::team1_id.eq(updated.team1.map(|t| t.value())),
            matches::team2_id.eq(updated.team2.map(|t| t.value())),
            matches::winner_id.eq(updated.winner.map(|t| t.value())),
            matches::status.eq(updated.status.as_str()),
            matches::game_id.eq(updated.game.map(|g| g.value())),
            matches::is_bye.eq(i32::from(updated.is_bye)),
            matches::started_at.eq(format_optional_timestamp(updated.started_at)?),
            matches::completed_at.eq(format_optional_timestamp(updated.completed_at)?),
        ))
        .execute(conn)?;

    Ok(rows)
}

/// Deletes every match of a tournament. Returns how many were removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_matches(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
) -> Result<usize, PersistenceError> {
    let removed: usize = diesel::delete(matches::table)
        .filter(matches::tournament_id.eq(tournament_id.value()))
        .execute(conn)?;

    info!(tournament_id = %tournament_id, removed, "Cleared matches");
    Ok(removed)
}
