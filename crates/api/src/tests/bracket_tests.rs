// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bracket commands and queries through the API handlers.

use super::helpers::{
    TestContext, assert_invalid_field, assert_not_found, assert_rule, prepared_tournament,
};
use crate::{
    AdvanceResponse, BracketResponse, DeclareWinnerRequest, FinishTournamentResponse,
    GameReportResponse, GenerateBracketRequest, GenerateBracketResponse, ListMatchesResponse,
    MatchInfo, ReconcileResponse, StandingsResponse, SummaryResponse, TournamentInfo, bracket,
    declare_winner, export_tournament, finish_tournament, game_report, generate_bracket,
    get_tournament, manual_advance, next_matches, reconcile, standings, start_match, summary,
};

fn generate(
    ctx: &TestContext,
    tournament_id: i64,
    format: Option<&str>,
) -> GenerateBracketResponse {
    generate_bracket(
        &ctx.service,
        &ctx.persistence,
        tournament_id,
        &GenerateBracketRequest {
            format: format.map(str::to_string),
        },
    )
    .unwrap()
}

fn first_ready(ctx: &TestContext, tournament_id: i64) -> Option<MatchInfo> {
    next_matches(&ctx.service, &ctx.persistence, tournament_id, Some(1))
        .unwrap()
        .matches
        .into_iter()
        .next()
}

/// Lets the team with the lower id win every match until a champion is crowned.
fn play_favourites(ctx: &TestContext, tournament_id: i64) -> AdvanceResponse {
    for _ in 0..64 {
        let m: MatchInfo = first_ready(ctx, tournament_id).expect("a playable match");
        let winner: i64 = m.team1_id.unwrap().min(m.team2_id.unwrap());
        let response: AdvanceResponse = declare_winner(
            &ctx.service,
            &ctx.persistence,
            m.match_id,
            DeclareWinnerRequest { winner_id: winner },
        )
        .unwrap();
        if response.champion_id.is_some() {
            return response;
        }
    }
    panic!("tournament did not finish");
}

#[test]
fn test_generate_double_bracket_sections() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "double", 4);

    let generated: GenerateBracketResponse = generate(&ctx, info.tournament_id, None);
    assert_eq!(generated.format, "double");
    assert_eq!(generated.match_count, generated.matches.len());

    let overview: BracketResponse =
        bracket(&ctx.service, &ctx.persistence, info.tournament_id).unwrap();
    assert_eq!(overview.winners.len(), 3);
    assert_eq!(overview.finals.len(), 2);
    assert_eq!(
        overview.winners.len() + overview.losers.len() + overview.finals.len(),
        generated.match_count
    );

    let opener: &MatchInfo = &overview.winners[0];
    assert_eq!(opener.round_number, 1);
    assert!(opener.team1_name.is_some());
    assert!(opener.team2_name.is_some());
    assert!(opener.game_name.is_some());

    let tournament: TournamentInfo = get_tournament(&ctx.persistence, info.tournament_id).unwrap();
    assert_eq!(tournament.status, "active");
    assert!(tournament.started_at.is_some());
}

#[test]
fn test_generate_with_format_override() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "double", 4);

    let generated: GenerateBracketResponse = generate(&ctx, info.tournament_id, Some("single"));

    assert_eq!(generated.format, "single");
    assert_eq!(generated.match_count, 3);
    let tournament: TournamentInfo = get_tournament(&ctx.persistence, info.tournament_id).unwrap();
    assert_eq!(tournament.format, "single");
}

#[test]
fn test_generate_rejections() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "double", 1);

    let err = generate_bracket(
        &ctx.service,
        &ctx.persistence,
        info.tournament_id,
        &GenerateBracketRequest::default(),
    )
    .unwrap_err();
    assert_rule(&err, "minimum_teams");

    let err = generate_bracket(
        &ctx.service,
        &ctx.persistence,
        info.tournament_id,
        &GenerateBracketRequest {
            format: Some(String::from("swiss")),
        },
    )
    .unwrap_err();
    assert_invalid_field(&err, "format");

    let err = generate_bracket(
        &ctx.service,
        &ctx.persistence,
        77,
        &GenerateBracketRequest::default(),
    )
    .unwrap_err();
    assert_not_found(&err, "Tournament");
}

#[test]
fn test_play_double_elimination_to_the_end() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "double", 4);
    generate(&ctx, info.tournament_id, None);

    let last: AdvanceResponse = play_favourites(&ctx, info.tournament_id);
    assert!(last.message.contains("won the tournament"));

    let table: StandingsResponse =
        standings(&ctx.service, &ctx.persistence, info.tournament_id).unwrap();
    assert_eq!(table.standings[0].rank, 1);
    assert_eq!(table.standings[0].name, "Team 01");
    assert_eq!(table.standings[0].bracket_status, "champion");
    assert_eq!(Some(table.standings[0].team_id), last.champion_id);

    let counts: SummaryResponse =
        summary(&ctx.service, &ctx.persistence, info.tournament_id).unwrap();
    assert_eq!(counts.status, "completed");
    assert_eq!(counts.total_teams, 4);
    assert_eq!(counts.champion_id, last.champion_id);
    assert_eq!(counts.runner_up_id, last.runner_up_id);
    assert_eq!(counts.in_progress_matches, 0);

    assert!(first_ready(&ctx, info.tournament_id).is_none());
}

#[test]
fn test_declare_winner_rejections() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "single", 4);
    generate(&ctx, info.tournament_id, None);
    let m: MatchInfo = first_ready(&ctx, info.tournament_id).unwrap();

    let outsider: i64 = (1..=4)
        .map(i64::from)
        .find(|id| Some(*id) != m.team1_id && Some(*id) != m.team2_id)
        .unwrap();
    let err = declare_winner(
        &ctx.service,
        &ctx.persistence,
        m.match_id,
        DeclareWinnerRequest { winner_id: outsider },
    )
    .unwrap_err();
    assert_invalid_field(&err, "winner_id");

    let err = declare_winner(
        &ctx.service,
        &ctx.persistence,
        9_999,
        DeclareWinnerRequest { winner_id: 1 },
    )
    .unwrap_err();
    assert_not_found(&err, "Match");

    let winner: i64 = m.team1_id.unwrap();
    let played: AdvanceResponse = declare_winner(
        &ctx.service,
        &ctx.persistence,
        m.match_id,
        DeclareWinnerRequest { winner_id: winner },
    )
    .unwrap();
    assert_eq!(played.winner_id, Some(winner));
    assert_eq!(played.loser_id, m.team2_id);
    assert!(!played.bye);
    assert!(played.message.contains("defeated"));

    let err = declare_winner(
        &ctx.service,
        &ctx.persistence,
        m.match_id,
        DeclareWinnerRequest { winner_id: winner },
    )
    .unwrap_err();
    assert_rule(&err, "match_open");
}

#[test]
fn test_start_match_then_reject_restart() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "double", 4);
    generate(&ctx, info.tournament_id, None);
    let m: MatchInfo = first_ready(&ctx, info.tournament_id).unwrap();

    let started: MatchInfo = start_match(&ctx.service, &ctx.persistence, m.match_id).unwrap();
    assert_eq!(started.status, "in_progress");
    assert_eq!(started.match_id, m.match_id);

    let err = start_match(&ctx.service, &ctx.persistence, m.match_id).unwrap_err();
    assert_rule(&err, "match_ready");
}

#[test]
fn test_manual_advance_needs_a_lone_team() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "single", 4);
    generate(&ctx, info.tournament_id, None);
    let m: MatchInfo = first_ready(&ctx, info.tournament_id).unwrap();

    let err = manual_advance(&ctx.service, &ctx.persistence, m.match_id).unwrap_err();

    assert_rule(&err, "single_waiting_team");
}

#[test]
fn test_reconcile_on_balanced_bracket_is_a_no_op() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "double", 4);
    generate(&ctx, info.tournament_id, None);

    let report: ReconcileResponse =
        reconcile(&ctx.service, &ctx.persistence, info.tournament_id).unwrap();

    assert_eq!(report.advanced, 0);
    assert!(report.champion_id.is_none());
}

#[test]
fn test_finish_tournament_early() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "double", 4);
    generate(&ctx, info.tournament_id, None);
    let m: MatchInfo = first_ready(&ctx, info.tournament_id).unwrap();
    let winner: i64 = m.team1_id.unwrap();
    declare_winner(
        &ctx.service,
        &ctx.persistence,
        m.match_id,
        DeclareWinnerRequest { winner_id: winner },
    )
    .unwrap();
    let other: MatchInfo = first_ready(&ctx, info.tournament_id).unwrap();

    let finished: FinishTournamentResponse =
        finish_tournament(&ctx.service, &ctx.persistence, info.tournament_id).unwrap();
    assert_eq!(finished.champion_id, winner);
    assert_eq!(finished.champion_name, m.team1_name);
    assert!(finished.runner_up_id.is_some());

    let err = finish_tournament(&ctx.service, &ctx.persistence, info.tournament_id).unwrap_err();
    assert_rule(&err, "tournament_open");

    let err = declare_winner(
        &ctx.service,
        &ctx.persistence,
        other.match_id,
        DeclareWinnerRequest {
            winner_id: other.team1_id.unwrap(),
        },
    )
    .unwrap_err();
    assert_rule(&err, "tournament_open");
}

#[test]
fn test_next_matches_limit_is_validated() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "single", 4);
    generate(&ctx, info.tournament_id, None);

    let listed: ListMatchesResponse =
        next_matches(&ctx.service, &ctx.persistence, info.tournament_id, None).unwrap();
    assert_eq!(listed.matches.len(), 2);

    let err = next_matches(&ctx.service, &ctx.persistence, info.tournament_id, Some(0))
        .unwrap_err();
    assert_invalid_field(&err, "limit");
}

#[test]
fn test_game_report_counts_stored_assignments() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "double", 6);
    generate(&ctx, info.tournament_id, None);

    let report: GameReportResponse =
        game_report(&ctx.service, &ctx.persistence, info.tournament_id).unwrap();

    assert_eq!(report.usage.len(), 2);
    assert!(report.total_assigned > 0);
    assert_eq!(
        report.usage.iter().map(|u| u.usage_count).sum::<u32>(),
        report.total_assigned
    );
    assert_eq!(report.difference, report.max_usage - report.min_usage);
    assert!(report.balance_score > 0.0 && report.balance_score <= 100.0);
}

#[test]
fn test_export_contains_everything() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "single", 3);
    let generated: GenerateBracketResponse = generate(&ctx, info.tournament_id, None);

    let export = export_tournament(&ctx.persistence, info.tournament_id).unwrap();

    assert_eq!(export.tournament.name, "Friday Cup");
    assert_eq!(export.teams.len(), 3);
    assert_eq!(export.matches.len(), generated.match_count);
    assert_eq!(export.standings.len(), 3);

    assert_not_found(&export_tournament(&ctx.persistence, 55).unwrap_err(), "Tournament");
}
