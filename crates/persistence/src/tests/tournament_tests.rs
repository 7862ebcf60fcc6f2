// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_tournament;
use crate::{Persistence, PersistenceError};
use tourney::TournamentLifecycle;
use tourney_domain::{
    DomainError, ScoringRules, TeamId, Tournament, TournamentFormat, TournamentId,
    TournamentStatus,
};

#[test]
fn test_create_tournament_stores_configuration() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let scoring: ScoringRules = ScoringRules {
        points_per_win: 2,
        points_per_participation: 0,
    };

    let created: Tournament = persistence
        .create_tournament("  Winter Cup  ", TournamentFormat::Double, 8, scoring)
        .unwrap();
    let fetched: Tournament = persistence.fetch_tournament(created.tournament_id).unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Winter Cup");
    assert_eq!(fetched.status, TournamentStatus::Setup);
    assert_eq!(fetched.max_teams, 8);
    assert_eq!(fetched.scoring, scoring);
    assert!(fetched.started_at.is_none());
}

#[test]
fn test_create_tournament_rejects_empty_name() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.create_tournament(
        "   ",
        TournamentFormat::Single,
        8,
        ScoringRules::default(),
    );

    assert!(matches!(
        result,
        Err(PersistenceError::Domain(DomainError::InvalidTournamentName(_)))
    ));
}

#[test]
fn test_create_tournament_rejects_capacity_below_two() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result =
        persistence.create_tournament("Tiny", TournamentFormat::Single, 1, ScoringRules::default());

    assert_eq!(
        result,
        Err(PersistenceError::Domain(DomainError::InvalidMaxTeams {
            max_teams: 1
        }))
    );
}

#[test]
fn test_fetch_missing_tournament_fails() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.fetch_tournament(TournamentId::new(42));

    assert_eq!(result, Err(PersistenceError::TournamentNotFound(42)));
    assert_eq!(result.unwrap_err().kind(), "tournament_not_found");
}

#[test]
fn test_list_tournaments_is_ordered_by_creation() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    for name in ["First", "Second", "Third"] {
        persistence
            .create_tournament(name, TournamentFormat::Single, 4, ScoringRules::default())
            .unwrap();
    }

    let names: Vec<String> = persistence
        .list_tournaments()
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[test]
fn test_open_registration_moves_setup_to_registration() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);

    let opened: Tournament = persistence
        .open_registration(tournament.tournament_id)
        .unwrap();

    assert_eq!(opened.status, TournamentStatus::Registration);
    assert_eq!(
        persistence
            .fetch_tournament(tournament.tournament_id)
            .unwrap()
            .status,
        TournamentStatus::Registration
    );
}

#[test]
fn test_open_registration_twice_fails() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);
    persistence
        .open_registration(tournament.tournament_id)
        .unwrap();

    let result = persistence.open_registration(tournament.tournament_id);

    assert!(matches!(
        result,
        Err(PersistenceError::Domain(
            DomainError::InvalidLifecycleTransition { .. }
        ))
    ));
}

#[test]
fn test_bracket_generation_activates_tournament() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);

    persistence
        .on_bracket_generated(tournament.tournament_id, TournamentFormat::Double)
        .unwrap();

    let active: Tournament = persistence.fetch_tournament(tournament.tournament_id).unwrap();
    assert_eq!(active.status, TournamentStatus::Active);
    assert_eq!(active.format, TournamentFormat::Double);
    assert!(active.started_at.is_some());
}

#[test]
fn test_regeneration_keeps_original_start_time() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);
    persistence
        .on_bracket_generated(tournament.tournament_id, TournamentFormat::Single)
        .unwrap();
    let first_start = persistence
        .fetch_tournament(tournament.tournament_id)
        .unwrap()
        .started_at;

    persistence
        .on_bracket_generated(tournament.tournament_id, TournamentFormat::Single)
        .unwrap();

    assert_eq!(
        persistence
            .fetch_tournament(tournament.tournament_id)
            .unwrap()
            .started_at,
        first_start
    );
}

#[test]
fn test_completion_is_recorded_once() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);
    persistence
        .on_bracket_generated(tournament.tournament_id, TournamentFormat::Single)
        .unwrap();

    persistence
        .on_tournament_completed(tournament.tournament_id, TeamId::new(1), None)
        .unwrap();
    let finished_at = persistence
        .fetch_tournament(tournament.tournament_id)
        .unwrap()
        .finished_at;
    persistence
        .on_tournament_completed(tournament.tournament_id, TeamId::new(1), None)
        .unwrap();

    let completed: Tournament = persistence.fetch_tournament(tournament.tournament_id).unwrap();
    assert_eq!(completed.status, TournamentStatus::Completed);
    assert!(finished_at.is_some());
    assert_eq!(completed.finished_at, finished_at);
}

#[test]
fn test_completion_before_activation_is_a_conflict() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);

    let result =
        persistence.on_tournament_completed(tournament.tournament_id, TeamId::new(1), None);

    assert_eq!(result.unwrap_err().kind(), "storage_conflict");
}
