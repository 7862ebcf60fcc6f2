// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod simulate;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tourney::{BracketService, EngineConfig};
use tourney_api::{
    AddGameRequest, AdvanceResponse, ApiError, BracketResponse, CreateTournamentRequest,
    DeclareWinnerRequest, FinishTournamentResponse, GameInfo, GameReportResponse,
    GenerateBracketRequest, GenerateBracketResponse, ListGamesResponse, ListMatchesResponse,
    ListTeamsResponse, ListTournamentsResponse, MatchInfo, ReconcileResponse,
    RegisterTeamRequest, SetGameActiveRequest, StandingsResponse, SummaryResponse, TeamInfo,
    TournamentInfo,
};
use tourney_domain::DropSchedule;
use tourney_persistence::{Persistence, TournamentExport};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

use crate::live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use crate::simulate::{SimulateArgs, SimulationReport, render_report, run_simulation};

/// Number of games previewed when no count is given.
const DEFAULT_PREVIEW_COUNT: usize = 5;

/// Tourney Server - HTTP server for double-elimination tournaments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Losers-bracket drop schedule: staggered or standard
    #[arg(long, global = true, default_value_t = DropSchedule::Staggered)]
    drop_schedule: DropSchedule,

    /// Seed for shuffles and simulated results
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    fn engine_config(&self) -> EngineConfig {
        let config: EngineConfig = EngineConfig::default().with_drop_schedule(self.drop_schedule);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    fn open_persistence(&self) -> Result<Persistence> {
        if let Some(db_path) = &self.database {
            info!("Using file-based database at: {}", db_path);
            Persistence::new_with_file(db_path)
                .wrap_err_with(|| format!("Failed to open database at {db_path}"))
        } else {
            info!("Using in-memory database");
            Persistence::new_in_memory().wrap_err("Failed to create in-memory database")
        }
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API and live event stream (default)
    Serve {
        /// Port to bind the server to
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },

    /// Play a simulated tournament end to end
    #[command(visible_alias = "sim")]
    Simulate(SimulateArgs),
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// Tournaments, teams, games and matches.
    persistence: Arc<Persistence>,
    /// Bracket operations over the same store.
    service: Arc<BracketService>,
    /// Live event fan-out.
    broadcaster: Arc<LiveEventBroadcaster>,
}

impl AppState {
    fn new(persistence: Arc<Persistence>, config: EngineConfig) -> Self {
        let broadcaster: Arc<LiveEventBroadcaster> = Arc::new(LiveEventBroadcaster::new());
        let service: BracketService = BracketService::from_store(Arc::clone(&persistence), config)
            .with_sink(broadcaster.clone());
        Self {
            persistence,
            service: Arc::new(service),
            broadcaster,
        }
    }
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.broadcaster)
    }
}

/// Query parameters for the next-matches endpoint.
#[derive(Debug, Deserialize)]
struct NextMatchesQuery {
    /// Maximum number of matches to return.
    limit: Option<usize>,
}

/// Query parameters for the game preview endpoint.
#[derive(Debug, Deserialize)]
struct PreviewQuery {
    /// Number of games to preview.
    count: Option<usize>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Tournaments
// ============================================================================

/// Handler for POST `/tournaments`.
async fn handle_create_tournament(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<Json<TournamentInfo>, HttpError> {
    info!(name = %req.name, format = %req.format, "Handling create_tournament request");

    let tournament: TournamentInfo = tourney_api::create_tournament(&app_state.persistence, &req)?;
    app_state.broadcaster.broadcast(&LiveEvent::TournamentCreated {
        tournament_id: tournament.tournament_id,
        name: tournament.name.clone(),
    });
    Ok(Json(tournament))
}

/// Handler for GET `/tournaments`.
async fn handle_list_tournaments(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListTournamentsResponse>, HttpError> {
    Ok(Json(tourney_api::list_tournaments(&app_state.persistence)?))
}

/// Handler for GET `/tournaments/{tournament_id}`.
async fn handle_get_tournament(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<TournamentInfo>, HttpError> {
    Ok(Json(tourney_api::get_tournament(
        &app_state.persistence,
        tournament_id,
    )?))
}

/// Handler for POST `/tournaments/{tournament_id}/registration`.
async fn handle_open_registration(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<TournamentInfo>, HttpError> {
    info!(tournament_id, "Handling open_registration request");
    Ok(Json(tourney_api::open_registration(
        &app_state.persistence,
        tournament_id,
    )?))
}

/// Handler for POST `/tournaments/{tournament_id}/teams`.
async fn handle_register_team(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
    Json(req): Json<RegisterTeamRequest>,
) -> Result<Json<TeamInfo>, HttpError> {
    info!(tournament_id, name = %req.name, "Handling register_team request");

    let team: TeamInfo = tourney_api::register_team(&app_state.persistence, tournament_id, &req)?;
    app_state.broadcaster.broadcast(&LiveEvent::TeamRegistered {
        tournament_id,
        team_id: team.team_id,
        name: team.name.clone(),
    });
    Ok(Json(team))
}

/// Handler for GET `/tournaments/{tournament_id}/teams`.
async fn handle_list_teams(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<ListTeamsResponse>, HttpError> {
    Ok(Json(tourney_api::list_teams(
        &app_state.persistence,
        tournament_id,
    )?))
}

// ============================================================================
// Bracket
// ============================================================================

/// Handler for POST `/tournaments/{tournament_id}/bracket`.
///
/// Generates the bracket, replacing any existing one.
async fn handle_generate_bracket(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
    Json(req): Json<GenerateBracketRequest>,
) -> Result<Json<GenerateBracketResponse>, HttpError> {
    info!(tournament_id, format = ?req.format, "Handling generate_bracket request");

    let generated: GenerateBracketResponse = tourney_api::generate_bracket(
        &app_state.service,
        &app_state.persistence,
        tournament_id,
        &req,
    )?;
    app_state.broadcaster.broadcast(&LiveEvent::BracketGenerated {
        tournament_id,
        match_count: generated.match_count,
    });
    Ok(Json(generated))
}

/// Handler for GET `/tournaments/{tournament_id}/bracket`.
async fn handle_get_bracket(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<BracketResponse>, HttpError> {
    Ok(Json(tourney_api::bracket(
        &app_state.service,
        &app_state.persistence,
        tournament_id,
    )?))
}

/// Handler for POST `/tournaments/{tournament_id}/reconcile`.
async fn handle_reconcile(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<ReconcileResponse>, HttpError> {
    info!(tournament_id, "Handling reconcile request");
    Ok(Json(tourney_api::reconcile(
        &app_state.service,
        &app_state.persistence,
        tournament_id,
    )?))
}

/// Handler for POST `/tournaments/{tournament_id}/finish`.
async fn handle_finish_tournament(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<FinishTournamentResponse>, HttpError> {
    info!(tournament_id, "Handling finish_tournament request");
    Ok(Json(tourney_api::finish_tournament(
        &app_state.service,
        &app_state.persistence,
        tournament_id,
    )?))
}

/// Handler for GET `/tournaments/{tournament_id}/next_matches`.
async fn handle_next_matches(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
    Query(query): Query<NextMatchesQuery>,
) -> Result<Json<ListMatchesResponse>, HttpError> {
    Ok(Json(tourney_api::next_matches(
        &app_state.service,
        &app_state.persistence,
        tournament_id,
        query.limit,
    )?))
}

/// Handler for GET `/tournaments/{tournament_id}/standings`.
async fn handle_standings(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<StandingsResponse>, HttpError> {
    Ok(Json(tourney_api::standings(
        &app_state.service,
        &app_state.persistence,
        tournament_id,
    )?))
}

/// Handler for GET `/tournaments/{tournament_id}/summary`.
async fn handle_summary(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<SummaryResponse>, HttpError> {
    Ok(Json(tourney_api::summary(
        &app_state.service,
        &app_state.persistence,
        tournament_id,
    )?))
}

/// Handler for GET `/tournaments/{tournament_id}/game_report`.
async fn handle_game_report(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<GameReportResponse>, HttpError> {
    Ok(Json(tourney_api::game_report(
        &app_state.service,
        &app_state.persistence,
        tournament_id,
    )?))
}

/// Handler for GET `/tournaments/{tournament_id}/export`.
async fn handle_export(
    AxumState(app_state): AxumState<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<TournamentExport>, HttpError> {
    Ok(Json(tourney_api::export_tournament(
        &app_state.persistence,
        tournament_id,
    )?))
}

// ============================================================================
// Matches
// ============================================================================

/// Handler for POST `/matches/{match_id}/winner`.
async fn handle_declare_winner(
    AxumState(app_state): AxumState<AppState>,
    Path(match_id): Path<i64>,
    Json(req): Json<DeclareWinnerRequest>,
) -> Result<Json<AdvanceResponse>, HttpError> {
    info!(match_id, winner_id = req.winner_id, "Handling declare_winner request");
    Ok(Json(tourney_api::declare_winner(
        &app_state.service,
        &app_state.persistence,
        match_id,
        req,
    )?))
}

/// Handler for POST `/matches/{match_id}/advance`.
async fn handle_manual_advance(
    AxumState(app_state): AxumState<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<AdvanceResponse>, HttpError> {
    info!(match_id, "Handling manual_advance request");
    Ok(Json(tourney_api::manual_advance(
        &app_state.service,
        &app_state.persistence,
        match_id,
    )?))
}

/// Handler for POST `/matches/{match_id}/start`.
async fn handle_start_match(
    AxumState(app_state): AxumState<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<MatchInfo>, HttpError> {
    info!(match_id, "Handling start_match request");
    Ok(Json(tourney_api::start_match(
        &app_state.service,
        &app_state.persistence,
        match_id,
    )?))
}

// ============================================================================
// Games
// ============================================================================

/// Handler for POST `/games`.
async fn handle_add_game(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddGameRequest>,
) -> Result<Json<GameInfo>, HttpError> {
    info!(name = %req.name, "Handling add_game request");
    Ok(Json(tourney_api::add_game(&app_state.persistence, &req)?))
}

/// Handler for GET `/games`.
async fn handle_list_games(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListGamesResponse>, HttpError> {
    Ok(Json(tourney_api::list_games(&app_state.persistence)?))
}

/// Handler for POST `/games/{game_id}/active`.
async fn handle_set_game_active(
    AxumState(app_state): AxumState<AppState>,
    Path(game_id): Path<i64>,
    Json(req): Json<SetGameActiveRequest>,
) -> Result<Json<GameInfo>, HttpError> {
    info!(game_id, active = req.active, "Handling set_game_active request");
    Ok(Json(tourney_api::set_game_active(
        &app_state.persistence,
        game_id,
        req,
    )?))
}

/// Handler for GET `/games/preview`.
async fn handle_preview_games(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<ListGamesResponse>, HttpError> {
    Ok(Json(tourney_api::preview_games(
        &app_state.service,
        query.count.unwrap_or(DEFAULT_PREVIEW_COUNT),
    )?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/tournaments",
            post(handle_create_tournament).get(handle_list_tournaments),
        )
        .route("/tournaments/{tournament_id}", get(handle_get_tournament))
        .route(
            "/tournaments/{tournament_id}/registration",
            post(handle_open_registration),
        )
        .route(
            "/tournaments/{tournament_id}/teams",
            post(handle_register_team).get(handle_list_teams),
        )
        .route(
            "/tournaments/{tournament_id}/bracket",
            post(handle_generate_bracket).get(handle_get_bracket),
        )
        .route(
            "/tournaments/{tournament_id}/reconcile",
            post(handle_reconcile),
        )
        .route(
            "/tournaments/{tournament_id}/finish",
            post(handle_finish_tournament),
        )
        .route(
            "/tournaments/{tournament_id}/next_matches",
            get(handle_next_matches),
        )
        .route(
            "/tournaments/{tournament_id}/standings",
            get(handle_standings),
        )
        .route("/tournaments/{tournament_id}/summary", get(handle_summary))
        .route(
            "/tournaments/{tournament_id}/game_report",
            get(handle_game_report),
        )
        .route("/tournaments/{tournament_id}/export", get(handle_export))
        .route("/matches/{match_id}/winner", post(handle_declare_winner))
        .route("/matches/{match_id}/advance", post(handle_manual_advance))
        .route("/matches/{match_id}/start", post(handle_start_match))
        .route("/games", post(handle_add_game).get(handle_list_games))
        .route("/games/preview", get(handle_preview_games))
        .route("/games/{game_id}/active", post(handle_set_game_active))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

async fn serve(persistence: Persistence, config: EngineConfig, port: u16) -> Result<()> {
    let app_state: AppState = AppState::new(Arc::new(persistence), config);
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{port}").parse()?;
    info!("Server listening on {}", addr);

    let listener: tokio::net::TcpListener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn simulate(persistence: Persistence, config: EngineConfig, args: &SimulateArgs) -> Result<()> {
    let persistence: Arc<Persistence> = Arc::new(persistence);
    let report: SimulationReport = run_simulation(&persistence, config, args)?;
    let export_json: String = persistence
        .export_json(tourney_domain::TournamentId::new(report.tournament.tournament_id))?;

    if let Some(path) = &args.output {
        std::fs::write(path, &export_json)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote tournament export");
    }
    if args.json {
        println!("{export_json}");
    } else {
        println!("{}", render_report(&report));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    let filter: EnvFilter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Initializing Tourney Server");

    let persistence: Persistence = args.open_persistence()?;
    let config: EngineConfig = args.engine_config();

    match &args.command {
        Some(Command::Simulate(simulate_args)) => simulate(persistence, config, simulate_args),
        Some(Command::Serve { port }) => serve(persistence, config, *port).await,
        None => serve(persistence, config, 3000).await,
    }
}
