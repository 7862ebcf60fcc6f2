// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{Harness, TOURNAMENT, create_test_teams, create_test_tournament};
use crate::{
    Bracket, Command, MatchRef, Outcome, SweepReport, finalize_if_stalled, find_orphan,
    is_orphaned, sweep,
};
use time::OffsetDateTime;
use tourney_domain::{
    BracketStatus, BracketType, DropSchedule, Match, MatchId, Team, TeamId, TournamentFormat,
};
use tourney_events::EventKind;

fn team_id(id: i64) -> TeamId {
    TeamId::new(id)
}

fn pending(
    bracket_type: BracketType,
    round: u32,
    team1: Option<i64>,
    team2: Option<i64>,
) -> Match {
    Match::new(TOURNAMENT, bracket_type, round, 1)
        .with_teams(team1.map(TeamId::new), team2.map(TeamId::new))
}

fn completed(bracket_type: BracketType, round: u32, team1: i64, team2: i64, winner: i64) -> Match {
    let mut m: Match = pending(bracket_type, round, Some(team1), Some(team2));
    m.complete(team_id(winner), false, OffsetDateTime::now_utc());
    m
}

fn hand_built(matches: Vec<Match>, statuses: &[(i64, BracketStatus)]) -> Bracket {
    let mut teams: Vec<Team> = create_test_teams(4);
    for team in &mut teams {
        if let Some((_, status)) = statuses.iter().find(|(id, _)| *id == team.team_id.value()) {
            team.bracket_status = *status;
        }
    }
    let matches: Vec<Match> = matches
        .into_iter()
        .zip(1_i64..)
        .map(|(mut m, id)| {
            m.match_id = Some(MatchId::new(id));
            m
        })
        .collect();
    Bracket::new(
        create_test_tournament(TournamentFormat::Double),
        teams,
        matches,
        DropSchedule::Standard,
    )
}

#[test]
fn test_losers_match_waits_for_earlier_losers_round() {
    let bracket: Bracket = hand_built(
        vec![
            pending(BracketType::Losers, 1, Some(1), Some(2)),
            pending(BracketType::Losers, 2, Some(3), None),
        ],
        &[],
    );

    assert!(!is_orphaned(&bracket, &bracket.matches()[1]));
    assert_eq!(find_orphan(&bracket), None);
}

#[test]
fn test_losers_match_ignores_empty_earlier_containers() {
    let bracket: Bracket = hand_built(
        vec![
            pending(BracketType::Losers, 1, None, None),
            pending(BracketType::Losers, 2, Some(3), None),
        ],
        &[],
    );

    assert!(is_orphaned(&bracket, &bracket.matches()[1]));
}

#[test]
fn test_losers_match_waits_for_feeding_winners_round() {
    // Winners round 2 drops into losers round 2
    let bracket: Bracket = hand_built(
        vec![
            pending(BracketType::Winners, 2, Some(1), Some(2)),
            pending(BracketType::Losers, 2, Some(3), None),
            pending(BracketType::Losers, 1, Some(4), None),
        ],
        &[],
    );

    assert!(!is_orphaned(&bracket, &bracket.matches()[1]));
    assert!(is_orphaned(&bracket, &bracket.matches()[2]));
}

#[test]
fn test_winners_match_waits_for_earlier_rounds() {
    let waiting: Bracket = hand_built(
        vec![
            pending(BracketType::Winners, 1, Some(1), Some(2)),
            pending(BracketType::Winners, 2, Some(3), None),
        ],
        &[],
    );
    let stranded: Bracket = hand_built(
        vec![
            completed(BracketType::Winners, 1, 1, 2, 1),
            pending(BracketType::Winners, 2, Some(3), None),
        ],
        &[],
    );

    assert!(!is_orphaned(&waiting, &waiting.matches()[1]));
    assert!(is_orphaned(&stranded, &stranded.matches()[1]));
}

#[test]
fn test_finals_are_never_orphaned() {
    let bracket: Bracket = hand_built(
        vec![
            pending(BracketType::GrandFinal, 1, Some(1), None),
            pending(BracketType::FinalReset, 1, None, Some(2)),
        ],
        &[],
    );

    assert!(!is_orphaned(&bracket, &bracket.matches()[0]));
    assert!(!is_orphaned(&bracket, &bracket.matches()[1]));
}

#[test]
fn test_sweep_advances_stranded_losers_team() {
    let mut harness: Harness = Harness::standard(3);
    let opening: MatchRef = harness.find(BracketType::Winners, 1, 1);
    let (winner, loser) = {
        let m: &Match = harness.bracket.get(opening);
        (m.team1.unwrap(), m.team2.unwrap())
    };
    harness
        .apply(Command::DeclareWinner {
            match_id: harness.match_id(opening),
            winner,
        })
        .unwrap();

    let stranded: MatchRef = harness.find(BracketType::Losers, 1, 1);
    assert_eq!(find_orphan(&harness.bracket), Some(stranded));

    let report: SweepReport = harness.sweep();

    assert_eq!(report.advanced, 1);
    assert_eq!(report.finalized, None);
    assert!(harness.bracket.get(stranded).is_bye);
    let waiting: &Match = harness.bracket.get(harness.find(BracketType::Losers, 2, 1));
    assert_eq!(waiting.lone_team(), Some(loser));
}

#[test]
fn test_default_schedule_carries_team_further() {
    let mut harness: Harness = Harness::double(3);
    let opening: MatchRef = harness.find(BracketType::Winners, 1, 1);
    let winner: TeamId = harness.bracket.get(opening).team1.unwrap();
    harness
        .apply(Command::DeclareWinner {
            match_id: harness.match_id(opening),
            winner,
        })
        .unwrap();

    let report: SweepReport = harness.sweep();

    // Losers rounds 1 and 2 are both byes; round 3 waits for the winners final
    assert_eq!(report.advanced, 2);
    let waiting: &Match = harness.bracket.get(harness.find(BracketType::Losers, 3, 1));
    assert_eq!(waiting.team_count(), 1);
}

#[test]
fn test_sweep_is_idempotent() {
    let mut harness: Harness = Harness::double(7);
    for _ in 0..4 {
        let next: MatchRef = harness.first_playable();
        let winner: TeamId = harness.bracket.get(next).team2.unwrap();
        harness
            .apply(Command::DeclareWinner {
                match_id: harness.match_id(next),
                winner,
            })
            .unwrap();
    }
    harness.sweep();
    let before: Vec<Match> = harness.bracket.matches().to_vec();

    let again: SweepReport = harness.sweep();

    assert_eq!(again, SweepReport::default());
    assert_eq!(harness.bracket.matches(), before.as_slice());
    assert!(harness.flush().is_empty());
}

#[test]
fn test_stalled_bracket_is_closed_from_best_results() {
    let mut bracket: Bracket = hand_built(
        vec![
            completed(BracketType::Winners, 1, 1, 2, 1),
            completed(BracketType::Winners, 2, 1, 3, 1),
            pending(BracketType::GrandFinal, 1, Some(1), None),
        ],
        &[
            (2, BracketStatus::Eliminated),
            (3, BracketStatus::Losers),
            (4, BracketStatus::Eliminated),
        ],
    );

    let outcome: Option<Outcome> = finalize_if_stalled(&mut bracket).unwrap();

    assert_eq!(
        outcome,
        Some(Outcome {
            champion: team_id(1),
            runner_up: Some(team_id(3))
        })
    );
    assert!(bracket.is_finished());
    let status = |id: i64| bracket.team(team_id(id)).unwrap().bracket_status;
    assert_eq!(status(1), BracketStatus::Champion);
    assert_eq!(status(2), BracketStatus::Eliminated);
    assert_eq!(status(3), BracketStatus::RunnerUp);
    assert!(
        bracket
            .take_events()
            .iter()
            .any(|e| e.kind == EventKind::Champion)
    );
}

#[test]
fn test_bracket_with_playable_match_is_not_stalled() {
    let mut bracket: Bracket = hand_built(
        vec![
            completed(BracketType::Winners, 1, 1, 2, 1),
            pending(BracketType::Winners, 2, Some(1), Some(3)),
        ],
        &[(2, BracketStatus::Eliminated)],
    );

    assert_eq!(finalize_if_stalled(&mut bracket).unwrap(), None);
    assert_eq!(sweep(&mut bracket).unwrap(), SweepReport::default());
    assert!(!bracket.is_finished());
}

#[test]
fn test_finished_bracket_is_left_alone() {
    let mut harness: Harness = Harness::double(2);
    let outcome: Outcome = harness.play_out(|a, b| a.min(b));

    assert_eq!(outcome.champion, team_id(1));
    assert_eq!(sweep(&mut harness.bracket).unwrap(), SweepReport::default());
    assert_eq!(find_orphan(&harness.bracket), None);
}
