// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end tournament simulation.
//!
//! Creates a tournament with generated teams and games, builds the bracket
//! and declares random winners through the API layer until a champion is
//! crowned.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::path::PathBuf;
use std::sync::Arc;
use tourney::{BracketService, EngineConfig};
use tourney_api::{
    AddGameRequest, AdvanceResponse, ApiError, CreateTournamentRequest, DeclareWinnerRequest,
    FinishTournamentResponse, GenerateBracketRequest, GenerateBracketResponse, MatchInfo,
    ReconcileResponse, RegisterTeamRequest, StandingsResponse, TournamentInfo, add_game,
    create_tournament, declare_winner, finish_tournament, generate_bracket, next_matches,
    reconcile, register_team, standings, translate_persistence_error,
};
use tourney_events::{BracketEvent, MemorySink};
use tourney_persistence::Persistence;
use tracing::{debug, info};

const GAME_NAMES: [&str; 8] = [
    "Darts",
    "Shuffleboard",
    "Cornhole",
    "Table Tennis",
    "Foosball",
    "Air Hockey",
    "Pool",
    "Bowling",
];

/// Options for the `simulate` subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Number of teams to register
    #[arg(
        short,
        long,
        default_value_t = 8,
        value_parser = clap::value_parser!(u32).range(2..=128)
    )]
    pub teams: u32,

    /// Elimination format: single or double
    #[arg(short, long, default_value = "double")]
    pub format: String,

    /// Number of games in the catalog
    #[arg(
        short,
        long,
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(1..=32)
    )]
    pub games: u32,

    /// Print the final export as JSON instead of a timeline
    #[arg(long)]
    pub json: bool,

    /// Write the final export as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// What a simulation produced.
#[derive(Debug)]
pub struct SimulationReport {
    /// The simulated tournament.
    pub tournament: TournamentInfo,
    /// Matches created when the bracket was generated.
    pub generated_matches: usize,
    /// Matches decided by a declared winner.
    pub matches_played: usize,
    /// The champion.
    pub champion_id: Option<i64>,
    /// The runner-up.
    pub runner_up_id: Option<i64>,
    /// Every bracket event, oldest first.
    pub events: Vec<BracketEvent>,
    /// Final leaderboard.
    pub standings: StandingsResponse,
}

fn game_name(index: u32) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| GAME_NAMES.get(i))
        .map_or_else(|| format!("Game {}", index + 1), |name| (*name).to_string())
}

/// Runs a full tournament against `persistence`.
///
/// # Arguments
///
/// * `persistence` - Storage for the simulated tournament
/// * `config` - Engine configuration; its seed also drives the winner picks
/// * `args` - Team count, format and catalog size
///
/// # Errors
///
/// Returns an error if any API call is rejected.
pub fn run_simulation(
    persistence: &Arc<Persistence>,
    config: EngineConfig,
    args: &SimulateArgs,
) -> Result<SimulationReport, ApiError> {
    let seed: u64 = config.seed.unwrap_or_else(rand::random);
    let mut rng: StdRng = StdRng::seed_from_u64(seed);
    let sink: Arc<MemorySink> = Arc::new(MemorySink::new());
    let service: BracketService =
        BracketService::from_store(Arc::clone(persistence), config.with_seed(seed))
            .with_sink(sink.clone());

    let tournament: TournamentInfo = create_tournament(
        persistence,
        &CreateTournamentRequest {
            name: format!("Simulated Cup #{seed}"),
            format: args.format.clone(),
            max_teams: Some(args.teams),
            points_per_win: None,
            points_per_participation: None,
        },
    )?;
    let tournament_id: i64 = tournament.tournament_id;
    info!(tournament_id, seed, teams = args.teams, "Starting simulation");

    for n in 1..=args.teams {
        register_team(
            persistence,
            tournament_id,
            &RegisterTeamRequest {
                name: format!("Team {n:02}"),
            },
        )?;
    }
    let existing: usize = persistence
        .list_games()
        .map_err(translate_persistence_error)?
        .len();
    if existing == 0 {
        for index in 0..args.games {
            add_game(
                persistence,
                &AddGameRequest {
                    name: game_name(index),
                    emoji: None,
                },
            )?;
        }
    }

    let generated: GenerateBracketResponse = generate_bracket(
        &service,
        persistence,
        tournament_id,
        &GenerateBracketRequest::default(),
    )?;

    let mut matches_played: usize = 0;
    let mut champion_id: Option<i64> = None;
    let mut runner_up_id: Option<i64> = None;
    // Every played match eliminates or drops a team, plus a possible reset.
    let max_rounds: u32 = args.teams * 2 + 2;
    for _ in 0..max_rounds {
        let ready: Option<MatchInfo> =
            next_matches(&service, persistence, tournament_id, Some(1))?
                .matches
                .into_iter()
                .next();
        let Some(m) = ready else {
            break;
        };
        let (Some(team1), Some(team2)) = (m.team1_id, m.team2_id) else {
            break;
        };
        let mut pair: [i64; 2] = [team1, team2];
        pair.shuffle(&mut rng);
        debug!(label = %m.label, winner = pair[0], "Declaring simulated result");

        let result: AdvanceResponse = declare_winner(
            &service,
            persistence,
            m.match_id,
            DeclareWinnerRequest { winner_id: pair[0] },
        )?;
        matches_played += 1;
        if result.champion_id.is_some() {
            champion_id = result.champion_id;
            runner_up_id = result.runner_up_id;
            break;
        }
    }

    if champion_id.is_none() {
        let swept: ReconcileResponse = reconcile(&service, persistence, tournament_id)?;
        if swept.champion_id.is_some() {
            champion_id = swept.champion_id;
            runner_up_id = swept.runner_up_id;
        } else {
            let finished: FinishTournamentResponse =
                finish_tournament(&service, persistence, tournament_id)?;
            champion_id = Some(finished.champion_id);
            runner_up_id = finished.runner_up_id;
        }
    }

    Ok(SimulationReport {
        tournament,
        generated_matches: generated.match_count,
        matches_played,
        champion_id,
        runner_up_id,
        events: sink.events(),
        standings: standings(&service, persistence, tournament_id)?,
    })
}

/// Renders the report as a human-readable timeline and leaderboard.
#[must_use]
pub fn render_report(report: &SimulationReport) -> String {
    let mut lines: Vec<String> = vec![
        format!(
            "{} ({}, {} teams, {} matches generated)",
            report.tournament.name,
            report.tournament.format,
            report.standings.standings.len(),
            report.generated_matches
        ),
        String::new(),
        String::from("Timeline:"),
    ];
    lines.extend(
        report
            .events
            .iter()
            .map(|event| format!("  [{}] {}", event.kind, event.message)),
    );
    lines.push(String::new());
    lines.push(String::from("Standings:"));
    lines.extend(report.standings.standings.iter().map(|row| {
        format!(
            "  {:>2}. {:<12} {:>3} pts  {}-{}  {:>5.1}%  {}",
            row.rank,
            row.name,
            row.points,
            row.wins,
            row.losses,
            row.win_rate,
            row.bracket_status
        )
    }));
    lines.push(String::new());
    lines.push(format!("Matches played: {}", report.matches_played));
    lines.join("\n")
}
