// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared test helpers.

use std::sync::Arc;
use tourney::{BracketService, EngineConfig};
use tourney_persistence::Persistence;

use crate::{
    AddGameRequest, ApiError, CreateTournamentRequest, RegisterTeamRequest, TeamInfo,
    TournamentInfo, add_game, create_tournament, register_team,
};

/// Persistence and a seeded service sharing one in-memory database.
pub struct TestContext {
    pub persistence: Arc<Persistence>,
    pub service: BracketService,
}

impl TestContext {
    pub fn new() -> Self {
        let persistence: Arc<Persistence> =
            Arc::new(Persistence::new_in_memory().expect("in-memory database"));
        let service: BracketService = BracketService::from_store(
            Arc::clone(&persistence),
            EngineConfig::default().with_seed(7),
        );
        Self {
            persistence,
            service,
        }
    }
}

pub fn create_request(name: &str, format: &str) -> CreateTournamentRequest {
    CreateTournamentRequest {
        name: name.to_string(),
        format: format.to_string(),
        max_teams: None,
        points_per_win: None,
        points_per_participation: None,
    }
}

pub fn create_test_tournament(ctx: &TestContext, format: &str) -> TournamentInfo {
    create_tournament(&ctx.persistence, &create_request("Friday Cup", format)).unwrap()
}

pub fn register(ctx: &TestContext, tournament_id: i64, name: &str) -> Result<TeamInfo, ApiError> {
    register_team(
        &ctx.persistence,
        tournament_id,
        &RegisterTeamRequest {
            name: name.to_string(),
        },
    )
}

/// A tournament with `teams` registered teams and two active games.
pub fn prepared_tournament(ctx: &TestContext, format: &str, teams: u32) -> TournamentInfo {
    let tournament: TournamentInfo = create_test_tournament(ctx, format);
    for n in 1..=teams {
        register(ctx, tournament.tournament_id, &format!("Team {n:02}")).unwrap();
    }
    for name in ["Darts", "Shuffleboard"] {
        add_game(
            &ctx.persistence,
            &AddGameRequest {
                name: name.to_string(),
                emoji: None,
            },
        )
        .unwrap();
    }
    tournament
}

pub fn assert_rule(err: &ApiError, expected: &str) {
    match err {
        ApiError::DomainRuleViolation { rule, .. } => assert_eq!(rule, expected),
        other => panic!("expected rule violation '{expected}', got {other:?}"),
    }
}

pub fn assert_invalid_field(err: &ApiError, expected: &str) {
    match err {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, expected),
        other => panic!("expected invalid '{expected}', got {other:?}"),
    }
}

pub fn assert_not_found(err: &ApiError, expected: &str) {
    match err {
        ApiError::ResourceNotFound { resource_type, .. } => assert_eq!(resource_type, expected),
        other => panic!("expected missing {expected}, got {other:?}"),
    }
}
