// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BracketStatus, BracketType, Match, ScoringRules, Standing, Team, TeamId, TournamentId,
    TournamentSummary, compute_standings, summarize,
};
use time::OffsetDateTime;

fn team(id: i64, name: &str, wins: u32, losses: u32) -> Team {
    let scoring: ScoringRules = ScoringRules::default();
    let mut team: Team = Team::new(TeamId::new(id), TournamentId::new(1), name);
    for _ in 0..wins {
        team.record_victory(&scoring);
    }
    for _ in 0..losses {
        team.record_loss(&scoring);
    }
    team
}

#[test]
fn test_standings_order_by_points_then_wins_then_name() {
    let teams: Vec<Team> = vec![
        team(1, "Delta", 1, 0),
        team(2, "Bravo", 0, 3),
        team(3, "Charlie", 1, 0),
        team(4, "Alpha", 2, 1),
    ];

    let standings: Vec<Standing> = compute_standings(&teams);
    let names: Vec<&str> = standings.iter().map(|s| s.name.as_str()).collect();

    // Alpha 7, Bravo 3 (no wins), Charlie 3, Delta 3
    assert_eq!(names, vec!["Alpha", "Charlie", "Delta", "Bravo"]);
}

#[test]
fn test_summarize_counts() {
    let mut champion: Team = team(1, "Alpha", 2, 0);
    champion.advance_status(BracketStatus::Champion).unwrap();
    let mut out: Team = team(2, "Bravo", 0, 2);
    out.advance_status(BracketStatus::Eliminated).unwrap();
    let teams: Vec<Team> = vec![champion, out, team(3, "Charlie", 0, 0)];

    let mut done: Match = Match::new(TournamentId::new(1), BracketType::Winners, 1, 1)
        .with_teams(Some(TeamId::new(1)), Some(TeamId::new(2)));
    done.complete(TeamId::new(1), false, OffsetDateTime::now_utc());
    let waiting: Match = Match::new(TournamentId::new(1), BracketType::Winners, 2, 1);

    let summary: TournamentSummary = summarize(&teams, &[done, waiting]);

    assert_eq!(summary.total_teams, 3);
    assert_eq!(summary.eliminated_teams, 1);
    assert_eq!(summary.active_teams, 2);
    assert_eq!(summary.champion, Some(TeamId::new(1)));
    assert_eq!(summary.runner_up, None);
    assert_eq!(summary.completed_matches, 1);
    assert_eq!(summary.pending_matches, 1);
    assert_eq!(summary.in_progress_matches, 0);
}
