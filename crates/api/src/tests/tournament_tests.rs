// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    TestContext, assert_invalid_field, assert_not_found, assert_rule, create_request,
    create_test_tournament, prepared_tournament, register,
};
use crate::{
    AddGameRequest, CreateTournamentRequest, GameInfo, GenerateBracketRequest, ListGamesResponse,
    ListTeamsResponse, SetGameActiveRequest, TournamentInfo, add_game, create_tournament,
    generate_bracket, get_tournament, list_games, list_teams, list_tournaments,
    open_registration, preview_games, set_game_active,
};

#[test]
fn test_create_tournament_applies_defaults() {
    let ctx: TestContext = TestContext::new();

    let info: TournamentInfo = create_test_tournament(&ctx, "double");

    assert_eq!(info.name, "Friday Cup");
    assert_eq!(info.format, "double");
    assert_eq!(info.status, "setup");
    assert_eq!(info.max_teams, 16);
    assert_eq!(info.team_count, 0);
    assert_eq!(info.points_per_win, 3);
    assert_eq!(info.points_per_participation, 1);
    assert!(info.started_at.is_none());
}

#[test]
fn test_create_tournament_with_custom_scoring() {
    let ctx: TestContext = TestContext::new();
    let request: CreateTournamentRequest = CreateTournamentRequest {
        max_teams: Some(8),
        points_per_win: Some(2),
        points_per_participation: Some(0),
        ..create_request("League Night", "single")
    };

    let info: TournamentInfo = create_tournament(&ctx.persistence, &request).unwrap();

    assert_eq!(info.max_teams, 8);
    assert_eq!(info.points_per_win, 2);
    assert_eq!(info.points_per_participation, 0);
}

#[test]
fn test_create_tournament_rejects_unknown_format() {
    let ctx: TestContext = TestContext::new();

    let err = create_tournament(&ctx.persistence, &create_request("Cup", "triple")).unwrap_err();

    assert_invalid_field(&err, "format");
}

#[test]
fn test_create_tournament_rejects_blank_name() {
    let ctx: TestContext = TestContext::new();

    let err = create_tournament(&ctx.persistence, &create_request("   ", "single")).unwrap_err();

    assert_invalid_field(&err, "name");
}

#[test]
fn test_create_tournament_rejects_tiny_capacity() {
    let ctx: TestContext = TestContext::new();
    let request: CreateTournamentRequest = CreateTournamentRequest {
        max_teams: Some(1),
        ..create_request("Cup", "single")
    };

    let err = create_tournament(&ctx.persistence, &request).unwrap_err();

    assert_invalid_field(&err, "max_teams");
}

#[test]
fn test_request_defaults_when_optional_fields_are_omitted() {
    let request: CreateTournamentRequest =
        serde_json::from_str(r#"{"name":"Cup","format":"double"}"#).unwrap();

    assert!(request.max_teams.is_none());
    assert!(request.points_per_win.is_none());

    let bracket: GenerateBracketRequest = serde_json::from_str("{}").unwrap();
    assert!(bracket.format.is_none());
}

#[test]
fn test_get_missing_tournament() {
    let ctx: TestContext = TestContext::new();

    let err = get_tournament(&ctx.persistence, 404).unwrap_err();

    assert_not_found(&err, "Tournament");
}

#[test]
fn test_list_tournaments_reports_team_counts() {
    let ctx: TestContext = TestContext::new();
    let first: TournamentInfo = create_test_tournament(&ctx, "single");
    create_test_tournament(&ctx, "double");
    register(&ctx, first.tournament_id, "Aces").unwrap();

    let listed = list_tournaments(&ctx.persistence).unwrap();

    assert_eq!(listed.tournaments.len(), 2);
    assert_eq!(listed.tournaments[0].team_count, 1);
    assert_eq!(listed.tournaments[1].team_count, 0);
}

#[test]
fn test_open_registration_only_once() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = create_test_tournament(&ctx, "single");

    let opened: TournamentInfo = open_registration(&ctx.persistence, info.tournament_id).unwrap();
    assert_eq!(opened.status, "registration");

    let err = open_registration(&ctx.persistence, info.tournament_id).unwrap_err();
    assert_rule(&err, "tournament_lifecycle");
}

#[test]
fn test_register_team_and_list() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = create_test_tournament(&ctx, "single");

    register(&ctx, info.tournament_id, "  Aces ").unwrap();
    register(&ctx, info.tournament_id, "Blazers").unwrap();

    let listed: ListTeamsResponse = list_teams(&ctx.persistence, info.tournament_id).unwrap();
    let names: Vec<&str> = listed.teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Aces", "Blazers"]);
    assert!(listed.teams.iter().all(|t| t.bracket_status == "winners"));
}

#[test]
fn test_register_team_rejections() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = create_test_tournament(&ctx, "single");
    register(&ctx, info.tournament_id, "Aces").unwrap();

    assert_rule(
        &register(&ctx, info.tournament_id, "aces").unwrap_err(),
        "unique_team_name",
    );
    assert_invalid_field(&register(&ctx, info.tournament_id, "A").unwrap_err(), "name");
    assert_not_found(&register(&ctx, 999, "Comets").unwrap_err(), "Tournament");
}

#[test]
fn test_register_team_rejected_when_full() {
    let ctx: TestContext = TestContext::new();
    let request: CreateTournamentRequest = CreateTournamentRequest {
        max_teams: Some(2),
        ..create_request("Duel", "single")
    };
    let info: TournamentInfo = create_tournament(&ctx.persistence, &request).unwrap();
    register(&ctx, info.tournament_id, "Aces").unwrap();
    register(&ctx, info.tournament_id, "Blazers").unwrap();

    let err = register(&ctx, info.tournament_id, "Comets").unwrap_err();

    assert_rule(&err, "tournament_capacity");
}

#[test]
fn test_register_team_rejected_once_bracket_exists() {
    let ctx: TestContext = TestContext::new();
    let info: TournamentInfo = prepared_tournament(&ctx, "single", 4);
    generate_bracket(
        &ctx.service,
        &ctx.persistence,
        info.tournament_id,
        &GenerateBracketRequest::default(),
    )
    .unwrap();

    let err = register(&ctx, info.tournament_id, "Latecomers").unwrap_err();

    assert_rule(&err, "registration_open");
}

#[test]
fn test_list_teams_of_missing_tournament() {
    let ctx: TestContext = TestContext::new();

    let err = list_teams(&ctx.persistence, 12).unwrap_err();

    assert_not_found(&err, "Tournament");
}

#[test]
fn test_game_catalog_management() {
    let ctx: TestContext = TestContext::new();
    let darts: GameInfo = add_game(
        &ctx.persistence,
        &AddGameRequest {
            name: String::from("Darts"),
            emoji: Some(String::from("🎯")),
        },
    )
    .unwrap();
    add_game(
        &ctx.persistence,
        &AddGameRequest {
            name: String::from("Pool"),
            emoji: Some(String::from("  ")),
        },
    )
    .unwrap();

    let updated: GameInfo = set_game_active(
        &ctx.persistence,
        darts.game_id,
        SetGameActiveRequest { active: false },
    )
    .unwrap();
    assert!(!updated.is_active);

    let listed: ListGamesResponse = list_games(&ctx.persistence).unwrap();
    assert_eq!(listed.games.len(), 2);
    assert_eq!(listed.games[0].emoji.as_deref(), Some("🎯"));
    assert!(listed.games[1].emoji.is_none());
}

#[test]
fn test_game_catalog_rejections() {
    let ctx: TestContext = TestContext::new();
    let request: AddGameRequest = AddGameRequest {
        name: String::from("Darts"),
        emoji: None,
    };
    add_game(&ctx.persistence, &request).unwrap();

    assert_rule(
        &add_game(&ctx.persistence, &request).unwrap_err(),
        "unique_record",
    );
    assert_not_found(
        &set_game_active(&ctx.persistence, 42, SetGameActiveRequest { active: true })
            .unwrap_err(),
        "Game",
    );
}

#[test]
fn test_preview_games() {
    let ctx: TestContext = TestContext::new();
    prepared_tournament(&ctx, "single", 2);

    let preview: ListGamesResponse = preview_games(&ctx.service, 3).unwrap();

    assert_eq!(preview.games.len(), 3);
    assert_invalid_field(&preview_games(&ctx.service, 0).unwrap_err(), "count");
}

#[test]
fn test_preview_games_without_catalog() {
    let ctx: TestContext = TestContext::new();

    let err = preview_games(&ctx.service, 2).unwrap_err();

    assert_rule(&err, "active_game_required");
}
