// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine collaborator implementations backed by `SQLite`.

use time::OffsetDateTime;
use tourney::{
    GameCatalog, MatchFilter, MatchRepository, StoreError, TeamRepository, TournamentLifecycle,
};
use tourney_domain::{
    Game, Match, MatchId, Team, TeamId, Tournament, TournamentFormat, TournamentId,
    TournamentStatus,
};
use tracing::info;

use crate::error::PersistenceError;
use crate::{Persistence, mutations, queries};

impl TeamRepository for Persistence {
    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError> {
        Ok(self.with_conn(|conn| queries::teams::list_teams(conn, tournament_id))?)
    }

    fn get_team(&self, team_id: TeamId) -> Result<Option<Team>, StoreError> {
        Ok(self.with_conn(|conn| queries::teams::get_team(conn, team_id))?)
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            if mutations::teams::update_team(conn, team)? == 0 {
                return Err(PersistenceError::TeamNotFound(team.team_id.value()));
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl MatchRepository for Persistence {
    fn list_matches(
        &self,
        tournament_id: TournamentId,
        filter: &MatchFilter,
    ) -> Result<Vec<Match>, StoreError> {
        Ok(self.with_conn(|conn| queries::matches::list_matches(conn, tournament_id, filter))?)
    }

    fn get_match(&self, match_id: MatchId) -> Result<Option<Match>, StoreError> {
        Ok(self.with_conn(|conn| queries::matches::get_match(conn, match_id))?)
    }

    fn create_match(&self, new_match: &Match) -> Result<Match, StoreError> {
        let created_at: OffsetDateTime =
            new_match.created_at.unwrap_or_else(OffsetDateTime::now_utc);
        let match_id: i64 =
            self.with_conn(|conn| mutations::matches::insert_match(conn, new_match, created_at))?;

        let mut stored: Match = new_match.clone();
        stored.match_id = Some(MatchId::new(match_id));
        stored.created_at = Some(created_at);
        Ok(stored)
    }

    fn save_match(&self, updated: &Match) -> Result<(), StoreError> {
        let Some(match_id) = updated.match_id else {
            return Err(StoreError::NotFound {
                entity: "match",
                id: 0,
            });
        };
        self.with_conn(|conn| {
            if mutations::matches::update_match(conn, updated)? == 0 {
                return Err(PersistenceError::MatchNotFound(match_id.value()));
            }
            Ok(())
        })?;
        Ok(())
    }

    fn delete_all(&self, tournament_id: TournamentId) -> Result<usize, StoreError> {
        Ok(self.with_conn(|conn| mutations::matches::delete_matches(conn, tournament_id))?)
    }
}

impl GameCatalog for Persistence {
    fn list_active_games(&self) -> Result<Vec<Game>, StoreError> {
        Ok(self.with_conn(|conn| queries::games::list_games(conn, true))?)
    }
}

impl TournamentLifecycle for Persistence {
    fn get_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Option<Tournament>, StoreError> {
        Ok(self.with_conn(|conn| queries::tournaments::get_tournament(conn, tournament_id))?)
    }

    fn on_bracket_generated(
        &self,
        tournament_id: TournamentId,
        format: TournamentFormat,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let mut tournament: Tournament =
                queries::tournaments::get_tournament(conn, tournament_id)?
                    .ok_or(PersistenceError::TournamentNotFound(tournament_id.value()))?;
            if tournament.status == TournamentStatus::Setup {
                tournament.transition_to(TournamentStatus::Registration)?;
            }
            tournament.transition_to(TournamentStatus::Active)?;
            tournament.format = format;
            tournament.started_at.get_or_insert_with(OffsetDateTime::now_utc);
            mutations::tournaments::update_tournament(conn, &tournament)?;

            info!(tournament_id = %tournament_id, format = %format, "Tournament is active");
            Ok(())
        })
        .map_err(lifecycle_error)
    }

    fn on_tournament_completed(
        &self,
        tournament_id: TournamentId,
        champion: TeamId,
        runner_up: Option<TeamId>,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let mut tournament: Tournament =
                queries::tournaments::get_tournament(conn, tournament_id)?
                    .ok_or(PersistenceError::TournamentNotFound(tournament_id.value()))?;
            if tournament.is_completed() {
                return Ok(());
            }
            tournament.transition_to(TournamentStatus::Completed)?;
            tournament.finished_at = Some(OffsetDateTime::now_utc());
            mutations::tournaments::update_tournament(conn, &tournament)?;

            info!(
                tournament_id = %tournament_id,
                champion = %champion,
                runner_up = ?runner_up.map(|t| t.value()),
                "Tournament completed"
            );
            Ok(())
        })
        .map_err(lifecycle_error)
    }
}

/// Lifecycle rule violations surface as conflicts with the stored status.
fn lifecycle_error(err: PersistenceError) -> StoreError {
    match err {
        PersistenceError::Domain(domain) => StoreError::Conflict(domain.to_string()),
        other => StoreError::from(other),
    }
}
