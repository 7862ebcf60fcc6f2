// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tourney_domain::GameId;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::games;
use crate::error::PersistenceError;

/// Adds an active game to the catalog and returns its id.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if a game with that name exists.
pub fn insert_game(
    conn: &mut SqliteConnection,
    name: &str,
    emoji: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(games::table)
        .values((games::name.eq(name), games::emoji.eq(emoji)))
        .execute(conn)?;

    let game_id: i64 = conn.get_last_insert_rowid()?;
    info!(game_id, name, "Added game");
    Ok(game_id)
}

/// Switches a game on or off. Returns the number of rows updated.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_game_active(
    conn: &mut SqliteConnection,
    game_id: GameId,
    active: bool,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(games::table)
        .filter(games::game_id.eq(game_id.value()))
        .set(games::is_active.eq(i32::from(active)))
        .execute(conn)?;

    info!(game_id = %game_id, active, "Updated game availability");
    Ok(updated)
}
