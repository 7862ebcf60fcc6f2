// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tourney_domain::{Team, TeamId, TournamentId};

use crate::data_models::TeamRow;
use crate::diesel_schema::teams;
use crate::error::PersistenceError;

/// Lists the teams registered in a tournament, ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn list_teams(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
) -> Result<Vec<Team>, PersistenceError> {
    let rows: Vec<TeamRow> = teams::table
        .filter(teams::tournament_id.eq(tournament_id.value()))
        .order(teams::team_id.asc())
        .select(TeamRow::as_select())
        .load(conn)?;

    rows.into_iter().map(Team::try_from).collect()
}

/// Retrieves a team by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is malformed.
/// Returns `Ok(None)` if the team is not found.
pub fn get_team(
    conn: &mut SqliteConnection,
    team_id: TeamId,
) -> Result<Option<Team>, PersistenceError> {
    let result: Result<TeamRow, diesel::result::Error> = teams::table
        .filter(teams::team_id.eq(team_id.value()))
        .select(TeamRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Team::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Counts the teams registered in a tournament.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_teams(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
) -> Result<usize, PersistenceError> {
    let count: i64 = teams::table
        .filter(teams::tournament_id.eq(tournament_id.value()))
        .count()
        .get_result(conn)?;

    usize::try_from(count).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}
