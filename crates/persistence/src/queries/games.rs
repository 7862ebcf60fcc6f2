// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tourney_domain::{Game, GameId};

use crate::data_models::GameRow;
use crate::diesel_schema::games;
use crate::error::PersistenceError;

/// Lists catalog games ordered by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `active_only` - Skip games that are switched off
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_games(
    conn: &mut SqliteConnection,
    active_only: bool,
) -> Result<Vec<Game>, PersistenceError> {
    let rows: Vec<GameRow> = if active_only {
        games::table
            .filter(games::is_active.eq(1))
            .order(games::game_id.asc())
            .select(GameRow::as_select())
            .load(conn)?
    } else {
        games::table
            .order(games::game_id.asc())
            .select(GameRow::as_select())
            .load(conn)?
    };

    Ok(rows.into_iter().map(Game::from).collect())
}

/// Retrieves a game by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the game is not found.
pub fn get_game(
    conn: &mut SqliteConnection,
    game_id: GameId,
) -> Result<Option<Game>, PersistenceError> {
    let result: Result<GameRow, diesel::result::Error> = games::table
        .filter(games::game_id.eq(game_id.value()))
        .select(GameRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Game::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
