// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tourney_domain::{Team, TournamentId};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::to_column;
use crate::diesel_schema::teams;
use crate::error::PersistenceError;

/// Inserts a team with no results and returns its id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tournament_id` - The tournament to register in
/// * `name` - The team name, unique within the tournament
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the name is already taken.
pub fn insert_team(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
    name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(teams::table)
        .values((
            teams::tournament_id.eq(tournament_id.value()),
            teams::name.eq(name),
        ))
        .execute(conn)?;

    let team_id: i64 = conn.get_last_insert_rowid()?;
    info!(team_id, tournament_id = %tournament_id, name, "Registered team");
    Ok(team_id)
}

/// Writes a team's results and bracket status.
///
/// Returns the number of rows updated.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_team(conn: &mut SqliteConnection, team: &Team) -> Result<usize, PersistenceError> {
    debug!(
        team_id = %team.team_id,
        status = %team.bracket_status,
        "Saving team"
    );

    let updated: usize = diesel::update(teams::table)
        .filter(teams::team_id.eq(team.team_id.value()))
        .set((
            teams::wins.eq(to_column(team.wins, "wins")?),
            teams::losses.eq(to_column(team.losses, "losses")?),
            teams::points.eq(to_column(team.points, "points")?),
            teams::bracket_status.eq(team.bracket_status.as_str()),
        ))
        .execute(conn)?;

    Ok(updated)
}
