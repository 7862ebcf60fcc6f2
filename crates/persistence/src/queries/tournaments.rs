// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tourney_domain::{Tournament, TournamentId};
use tracing::debug;

use crate::data_models::TournamentRow;
use crate::diesel_schema::tournaments;
use crate::error::PersistenceError;

/// Retrieves a tournament by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tournament_id` - The tournament to look up
///
/// # Errors
///
/// Returns an error if the database query fails or the row is malformed.
/// Returns `Ok(None)` if the tournament is not found.
pub fn get_tournament(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
) -> Result<Option<Tournament>, PersistenceError> {
    debug!(tournament_id = %tournament_id, "Looking up tournament");

    let result: Result<TournamentRow, diesel::result::Error> = tournaments::table
        .filter(tournaments::tournament_id.eq(tournament_id.value()))
        .select(TournamentRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Tournament::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists every tournament, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn list_tournaments(conn: &mut SqliteConnection) -> Result<Vec<Tournament>, PersistenceError> {
    let rows: Vec<TournamentRow> = tournaments::table
        .order(tournaments::tournament_id.asc())
        .select(TournamentRow::as_select())
        .load(conn)?;

    rows.into_iter().map(Tournament::try_from).collect()
}
