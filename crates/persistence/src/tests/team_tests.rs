// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_tournament, register_test_teams};
use crate::{Persistence, PersistenceError};
use tourney::{StoreError, TeamRepository, TournamentLifecycle};
use tourney_domain::{
    BracketStatus, DomainError, ScoringRules, Team, TeamId, Tournament, TournamentFormat,
    TournamentStatus,
};

#[test]
fn test_register_team_assigns_id_and_trims_name() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);

    let team: Team = persistence
        .register_team(tournament.tournament_id, "  Night Owls ")
        .unwrap();

    assert_eq!(team.name, "Night Owls");
    assert_eq!(team.bracket_status, BracketStatus::Winners);
    assert_eq!(persistence.get_team(team.team_id).unwrap(), Some(team));
}

#[test]
fn test_register_team_rejects_short_name() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);

    let result = persistence.register_team(tournament.tournament_id, " A ");

    assert!(matches!(
        result,
        Err(PersistenceError::Domain(DomainError::InvalidTeamName(_)))
    ));
}

#[test]
fn test_register_team_rejects_duplicate_name() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);
    persistence
        .register_team(tournament.tournament_id, "Comets")
        .unwrap();

    let result = persistence.register_team(tournament.tournament_id, "Comets");

    assert!(matches!(
        result,
        Err(PersistenceError::Domain(DomainError::DuplicateTeamName { .. }))
    ));
}

#[test]
fn test_same_name_is_allowed_in_another_tournament() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let first: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);
    let second: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);

    persistence.register_team(first.tournament_id, "Comets").unwrap();
    let result = persistence.register_team(second.tournament_id, "Comets");

    assert!(result.is_ok());
}

#[test]
fn test_register_team_rejects_full_tournament() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = persistence
        .create_tournament("Small", TournamentFormat::Single, 2, ScoringRules::default())
        .unwrap();
    register_test_teams(&persistence, &tournament, 2);

    let result = persistence.register_team(tournament.tournament_id, "Latecomers");

    assert_eq!(
        result,
        Err(PersistenceError::Domain(DomainError::TournamentFull {
            max_teams: 2
        }))
    );
    assert_eq!(persistence.count_teams(tournament.tournament_id).unwrap(), 2);
}

#[test]
fn test_register_team_rejects_active_tournament() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);
    persistence
        .on_bracket_generated(tournament.tournament_id, TournamentFormat::Single)
        .unwrap();

    let result = persistence.register_team(tournament.tournament_id, "Latecomers");

    assert_eq!(
        result,
        Err(PersistenceError::Domain(DomainError::RegistrationClosed {
            status: TournamentStatus::Active
        }))
    );
}

#[test]
fn test_list_teams_is_ordered_by_id_and_scoped() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let first: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);
    let second: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);
    let registered: Vec<Team> = register_test_teams(&persistence, &first, 3);
    register_test_teams(&persistence, &second, 2);

    let listed: Vec<Team> = persistence.list_teams(first.tournament_id).unwrap();

    assert_eq!(listed, registered);
}

#[test]
fn test_save_team_persists_results() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Double);
    let mut team: Team = register_test_teams(&persistence, &tournament, 1).remove(0);

    team.record_victory(&tournament.scoring);
    team.record_loss(&tournament.scoring);
    team.advance_status(BracketStatus::Losers).unwrap();
    persistence.save_team(&team).unwrap();

    let stored: Team = persistence.get_team(team.team_id).unwrap().unwrap();
    assert_eq!(stored.wins, 1);
    assert_eq!(stored.losses, 1);
    assert_eq!(stored.points, 4);
    assert_eq!(stored.bracket_status, BracketStatus::Losers);
}

#[test]
fn test_save_missing_team_fails() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tournament: Tournament = create_test_tournament(&persistence, TournamentFormat::Single);
    let ghost: Team = Team::new(TeamId::new(77), tournament.tournament_id, "Ghosts");

    let result = persistence.save_team(&ghost);

    assert_eq!(
        result,
        Err(StoreError::NotFound {
            entity: "team",
            id: 77
        })
    );
}

#[test]
fn test_get_missing_team_is_none() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert_eq!(persistence.get_team(TeamId::new(5)).unwrap(), None);
}
