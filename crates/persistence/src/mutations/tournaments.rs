// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tourney_domain::Tournament;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{format_optional_timestamp, to_column};
use crate::diesel_schema::tournaments;
use crate::error::PersistenceError;

/// Inserts a tournament and returns its id.
///
/// The id carried by `tournament` is ignored.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_tournament(
    conn: &mut SqliteConnection,
    tournament: &Tournament,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(tournaments::table)
        .values((
            tournaments::name.eq(&tournament.name),
            tournaments::format.eq(tournament.format.as_str()),
            tournaments::status.eq(tournament.status.as_str()),
            tournaments::max_teams.eq(to_column(tournament.max_teams, "max_teams")?),
            tournaments::points_per_win.eq(to_column(
                tournament.scoring.points_per_win,
                "points_per_win",
            )?),
            tournaments::points_per_participation.eq(to_column(
                tournament.scoring.points_per_participation,
                "points_per_participation",
            )?),
        ))
        .execute(conn)?;

    let tournament_id: i64 = conn.get_last_insert_rowid()?;
    info!(tournament_id, name = %tournament.name, "Created tournament");
    Ok(tournament_id)
}

/// Writes a tournament's format, status and timestamps.
///
/// Returns the number of rows updated.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_tournament(
    conn: &mut SqliteConnection,
    tournament: &Tournament,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(tournaments::table)
        .filter(tournaments::tournament_id.eq(tournament.tournament_id.value()))
        .set((
            tournaments::format.eq(tournament.format.as_str()),
            tournaments::status.eq(tournament.status.as_str()),
            tournaments::started_at.eq(format_optional_timestamp(tournament.started_at)?),
            tournaments::finished_at.eq(format_optional_timestamp(tournament.finished_at)?),
        ))
        .execute(conn)?;

    Ok(updated)
}
