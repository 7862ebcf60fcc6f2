// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod team_tests;
mod tournament_tests;

use crate::Persistence;
use std::sync::Arc;
use tourney::{BracketService, EngineConfig};
use tourney_domain::{ScoringRules, Team, Tournament, TournamentFormat};
use tourney_events::MemorySink;

pub fn create_test_tournament(persistence: &Persistence, format: TournamentFormat) -> Tournament {
    persistence
        .create_tournament("Spring Open", format, 16, ScoringRules::default())
        .unwrap()
}

/// Registers `count` teams named `Team 01`, `Team 02`, ...
pub fn register_test_teams(
    persistence: &Persistence,
    tournament: &Tournament,
    count: u32,
) -> Vec<Team> {
    (1..=count)
        .map(|n| {
            persistence
                .register_team(tournament.tournament_id, &format!("Team {n:02}"))
                .unwrap()
        })
        .collect()
}

pub fn add_test_games(persistence: &Persistence, count: u32) {
    for n in 1..=count {
        persistence.add_game(&format!("Game {n}"), None).unwrap();
    }
}

/// A seeded service over a fresh in-memory database, with events captured.
pub struct Fixture {
    pub store: Arc<Persistence>,
    pub service: BracketService,
    pub sink: Arc<MemorySink>,
    pub tournament: Tournament,
    pub teams: Vec<Team>,
}

impl Fixture {
    pub fn new(format: TournamentFormat, team_count: u32) -> Self {
        let store: Arc<Persistence> = Arc::new(Persistence::new_in_memory().unwrap());
        let tournament: Tournament = create_test_tournament(&store, format);
        let teams: Vec<Team> = register_test_teams(&store, &tournament, team_count);
        add_test_games(&store, 4);

        let sink: Arc<MemorySink> = Arc::new(MemorySink::new());
        let service: BracketService =
            BracketService::from_store(Arc::clone(&store), EngineConfig::default().with_seed(11))
                .with_sink(sink.clone());
        Self {
            store,
            service,
            sink,
            tournament,
            teams,
        }
    }
}
