// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BracketStatus, DomainError, Game, GameId, ScoringRules, Team, TeamId, Tournament,
    TournamentFormat, TournamentId, TournamentStatus,
};
use std::str::FromStr;

fn create_test_team() -> Team {
    Team::new(TeamId::new(1), TournamentId::new(1), "Alpha")
}

#[test]
fn test_new_team_starts_in_winners_bracket() {
    let team: Team = create_test_team();

    assert_eq!(team.bracket_status, BracketStatus::Winners);
    assert_eq!(team.matches_played(), 0);
    assert!((team.win_rate() - 0.0).abs() < f64::EPSILON);
}

#[test]
fn test_record_results_uses_scoring_rules() {
    let mut team: Team = create_test_team();
    let scoring: ScoringRules = ScoringRules::default();

    team.record_victory(&scoring);
    team.record_victory(&scoring);
    team.record_loss(&scoring);

    assert_eq!(team.wins, 2);
    assert_eq!(team.losses, 1);
    assert_eq!(team.points, 7);
    assert_eq!(team.bracket_status, BracketStatus::Winners);
}

#[test]
fn test_win_rate_percentage() {
    let mut team: Team = create_test_team();
    let scoring: ScoringRules = ScoringRules::default();
    team.record_victory(&scoring);
    team.record_loss(&scoring);
    team.record_loss(&scoring);
    team.record_victory(&scoring);

    assert!((team.win_rate() - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_advance_status_rejects_backward_move() {
    let mut team: Team = create_test_team();
    team.advance_status(BracketStatus::Losers).unwrap();

    let result: Result<(), DomainError> = team.advance_status(BracketStatus::Winners);

    assert!(matches!(
        result,
        Err(DomainError::InvalidStatusTransition {
            from: BracketStatus::Losers,
            to: BracketStatus::Winners,
            ..
        })
    ));
    assert_eq!(team.bracket_status, BracketStatus::Losers);
}

#[test]
fn test_reset_results() {
    let mut team: Team = create_test_team();
    team.record_victory(&ScoringRules::default());
    team.advance_status(BracketStatus::Eliminated).unwrap();

    team.reset_results();

    assert_eq!(team.points, 0);
    assert_eq!(team.bracket_status, BracketStatus::Winners);
}

#[test]
fn test_tournament_defaults() {
    let tournament: Tournament =
        Tournament::new(TournamentId::new(7), "Cup", TournamentFormat::Double);

    assert_eq!(tournament.status, TournamentStatus::Setup);
    assert_eq!(tournament.max_teams, 16);
    assert_eq!(tournament.scoring.points_per_win, 3);
    assert_eq!(tournament.scoring.points_per_participation, 1);
}

#[test]
fn test_tournament_lifecycle_transitions() {
    let mut tournament: Tournament =
        Tournament::new(TournamentId::new(7), "Cup", TournamentFormat::Single);

    assert!(tournament.transition_to(TournamentStatus::Active).is_err());
    tournament.transition_to(TournamentStatus::Registration).unwrap();
    tournament.transition_to(TournamentStatus::Active).unwrap();
    tournament.transition_to(TournamentStatus::Active).unwrap();
    tournament.transition_to(TournamentStatus::Completed).unwrap();

    assert!(tournament.is_completed());
    assert!(matches!(
        tournament.transition_to(TournamentStatus::Active),
        Err(DomainError::InvalidLifecycleTransition { .. })
    ));
}

#[test]
fn test_format_parsing() {
    assert_eq!(
        TournamentFormat::from_str("double").unwrap(),
        TournamentFormat::Double
    );
    assert!(matches!(
        TournamentFormat::from_str("swiss"),
        Err(DomainError::InvalidFormat(_))
    ));
}

#[test]
fn test_game_display_includes_emoji() {
    let game: Game = Game::new(GameId::new(1), "Tekken").with_emoji("🥋");
    assert_eq!(game.to_string(), "🥋 Tekken");

    let plain: Game = Game::new(GameId::new(2), "FIFA");
    assert_eq!(plain.to_string(), "FIFA");
    assert!(plain.is_active);
}

#[test]
fn test_ids_display_raw_value() {
    assert_eq!(TeamId::new(42).to_string(), "42");
    assert_eq!(TeamId::new(42).value(), 42);
}
