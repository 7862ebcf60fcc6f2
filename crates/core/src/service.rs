// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The bracket engine's public surface.
//!
//! [`BracketService`] loads a tournament's working set from the repositories,
//! runs the builder, the advancement engine or the sweep on it, writes the
//! changes back and publishes the resulting events. All mutation of one
//! tournament happens under that tournament's lock.

use crate::advancement::{TransitionResult, apply, finish};
use crate::bracket::{Bracket, ChangeSet, Outcome};
use crate::builder::BracketBuilder;
use crate::command::Command;
use crate::config::EngineConfig;
use crate::error::{AdvanceError, BuildError, StoreError};
use crate::game_assigner::{DistributionReport, GameAssigner};
use crate::repository::{
    GameCatalog, MatchFilter, MatchRepository, TeamRepository, TournamentLifecycle,
};
use crate::sweep::{SweepReport, finalize_if_stalled, resolve_next_orphan};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tourney_domain::{
    BracketStatus, BracketType, DomainError, Game, Match, MatchId, MatchStatus, Standing, Team,
    TeamId, Tournament, TournamentFormat, TournamentId, TournamentSummary, compute_standings,
    summarize,
};
use tourney_events::{BracketEvent, NoopSink, NotificationSink};

/// Default number of matches returned by [`BracketService::next_matches`].
pub const DEFAULT_NEXT_MATCHES: usize = 5;

/// Result of a command run through the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceSummary {
    /// The targeted match.
    pub match_id: MatchId,
    /// The recorded winner, if the match completed.
    pub winner: Option<TeamId>,
    /// The beaten team of a played match.
    pub loser: Option<TeamId>,
    /// True when the match completed without being played.
    pub bye: bool,
    /// Teams advanced by the follow-up sweep.
    pub swept: usize,
    /// Set when the tournament was decided by this call.
    pub outcome: Option<Outcome>,
}

/// A tournament's matches grouped for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketOverview {
    /// Winners bracket, by round then match number.
    pub winners: Vec<Match>,
    /// Losers bracket, by round then match number.
    pub losers: Vec<Match>,
    /// Grand final then final reset.
    pub finals: Vec<Match>,
}

/// Runs bracket operations against the storage collaborators.
pub struct BracketService {
    teams: Arc<dyn TeamRepository>,
    matches: Arc<dyn MatchRepository>,
    games: Arc<dyn GameCatalog>,
    lifecycle: Arc<dyn TournamentLifecycle>,
    sink: Arc<dyn NotificationSink>,
    config: EngineConfig,
    base_seed: u64,
    draws: AtomicU64,
    locks: Mutex<HashMap<TournamentId, Weak<Mutex<()>>>>,
}

impl std::fmt::Debug for BracketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BracketService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BracketService {
    /// Creates a service over separate collaborators.
    ///
    /// Events are discarded until a sink is attached with
    /// [`with_sink`](Self::with_sink).
    #[must_use]
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        matches: Arc<dyn MatchRepository>,
        games: Arc<dyn GameCatalog>,
        lifecycle: Arc<dyn TournamentLifecycle>,
        config: EngineConfig,
    ) -> Self {
        let base_seed: u64 = config.seed.unwrap_or_else(rand::random);
        Self {
            teams,
            matches,
            games,
            lifecycle,
            sink: Arc::new(NoopSink),
            config,
            base_seed,
            draws: AtomicU64::new(0),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a service over one store implementing every collaborator.
    #[must_use]
    pub fn from_store<S>(store: Arc<S>, config: EngineConfig) -> Self
    where
        S: TeamRepository + MatchRepository + GameCatalog + TournamentLifecycle + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store, config)
    }

    /// Attaches a notification sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of tournaments that currently hold an entry in the lock map.
    ///
    /// Entries live only while some operation holds the tournament's lock;
    /// released entries are pruned on the next lookup.
    #[must_use]
    pub fn tracked_tournaments(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lock_for(&self, tournament_id: TournamentId) -> Arc<Mutex<()>> {
        let mut locks: MutexGuard<'_, HashMap<TournamentId, Weak<Mutex<()>>>> =
            self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| lock.strong_count() > 0);
        if let Some(lock) = locks.get(&tournament_id).and_then(Weak::upgrade) {
            return lock;
        }
        let lock: Arc<Mutex<()>> = Arc::new(Mutex::new(()));
        locks.insert(tournament_id, Arc::downgrade(&lock));
        lock
    }

    fn next_seed(&self) -> u64 {
        let draw: u64 = self.draws.fetch_add(1, Ordering::Relaxed);
        self.base_seed.wrapping_add(draw)
    }

    fn next_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.next_seed())
    }

    fn get_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Option<Tournament>, StoreError> {
        self.lifecycle.get_tournament(tournament_id)
    }

    /// Builds and stores a fresh bracket, replacing any existing one.
    ///
    /// Teams are shuffled before placement. Regeneration clears every match
    /// and resets every team's results and bracket status.
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - The tournament
    /// * `format` - Single or double elimination
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tournament does not exist or is completed
    /// - Fewer than two teams are registered
    /// - No game is active
    /// - Storage fails
    pub fn generate_bracket(
        &self,
        tournament_id: TournamentId,
        format: TournamentFormat,
    ) -> Result<Vec<Match>, BuildError> {
        let lock: Arc<Mutex<()>> = self.lock_for(tournament_id);
        let _guard: MutexGuard<'_, ()> = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Validate everything before the first write
        let tournament: Tournament = self
            .get_tournament(tournament_id)?
            .ok_or(BuildError::TournamentNotFound(tournament_id))?;
        if tournament.is_completed() {
            return Err(BuildError::TournamentCompleted(tournament_id));
        }
        let teams: Vec<Team> = self.teams.list_teams(tournament_id)?;
        if teams.len() < 2 {
            return Err(BuildError::InsufficientTeams { count: teams.len() });
        }
        let mut assigner: GameAssigner =
            GameAssigner::new(self.games.list_active_games()?, self.next_seed())?;
        let mut rng: StdRng = self.next_rng();
        let skeleton: Vec<Match> = BracketBuilder::new(self.config.recency_window).build(
            tournament_id,
            &teams,
            format,
            &mut assigner,
            &mut rng,
        )?;

        // Replace the previous bracket
        let removed: usize = self.matches.delete_all(tournament_id)?;
        for mut team in teams {
            if team.matches_played() > 0 || team.bracket_status != BracketStatus::Winners {
                team.reset_results();
                self.teams.save_team(&team)?;
            }
        }
        let stored: Vec<Match> = skeleton
            .iter()
            .map(|m| self.matches.create_match(m))
            .collect::<Result<_, _>>()?;
        self.lifecycle.on_bracket_generated(tournament_id, format)?;

        tracing::info!(
            tournament_id = %tournament_id,
            format = %format,
            removed,
            created = stored.len(),
            "Generated bracket"
        );
        Ok(stored)
    }

    /// Records the winner of a match, then sweeps the bracket.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration is rejected or storage fails.
    /// Rejected declarations change nothing.
    pub fn declare_winner(
        &self,
        match_id: MatchId,
        winner: TeamId,
    ) -> Result<AdvanceSummary, AdvanceError> {
        self.run(Command::DeclareWinner { match_id, winner })
    }

    /// Advances the single waiting team of a match, then sweeps the bracket.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceError::NotAByeMatch` unless exactly one team is waiting.
    pub fn manual_advance(&self, match_id: MatchId) -> Result<AdvanceSummary, AdvanceError> {
        self.run(Command::ManualAdvance { match_id })
    }

    /// Marks a ready match as in progress and returns it.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceError::MatchNotReady` unless the match is pending with
    /// both teams present.
    pub fn start_match(&self, match_id: MatchId) -> Result<Match, AdvanceError> {
        self.run(Command::StartMatch { match_id })?;
        self.matches
            .get_match(match_id)?
            .ok_or(AdvanceError::MatchNotFound(match_id))
    }

    /// Resolves every orphaned team of a tournament.
    ///
    /// Safe to call at any time: a second call without new results does
    /// nothing. Each resolution is stored before the next one starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the tournament does not exist or storage fails.
    pub fn reconcile(&self, tournament_id: TournamentId) -> Result<SweepReport, AdvanceError> {
        let lock: Arc<Mutex<()>> = self.lock_for(tournament_id);
        let _guard: MutexGuard<'_, ()> = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut bracket: Bracket = self.load_bracket(tournament_id)?;
        if bracket.is_finished() {
            return Ok(SweepReport::default());
        }
        let report: SweepReport = self.sweep_and_store(&mut bracket)?;
        if let Some(outcome) = bracket.outcome() {
            self.announce_completion(tournament_id, outcome)?;
        }
        Ok(report)
    }

    /// Closes a tournament by hand.
    ///
    /// Among the teams still alive, the leaderboard leader becomes champion
    /// and the next one becomes runner-up. Eliminated teams keep their status.
    ///
    /// # Errors
    ///
    /// Returns an error if the tournament is missing, already completed, has
    /// no team left alive, or storage fails.
    pub fn finish_tournament(&self, tournament_id: TournamentId) -> Result<Outcome, AdvanceError> {
        let lock: Arc<Mutex<()>> = self.lock_for(tournament_id);
        let _guard: MutexGuard<'_, ()> = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut bracket: Bracket = self.load_bracket(tournament_id)?;
        if bracket.is_finished() {
            return Err(AdvanceError::TournamentCompleted(tournament_id));
        }
        let teams: Vec<Team> = bracket.teams().cloned().collect();
        let mut contenders = compute_standings(&teams)
            .into_iter()
            .filter(|s| s.bracket_status.is_alive())
            .map(|s| s.team_id);
        let champion: TeamId = contenders
            .next()
            .ok_or(DomainError::NotEnoughTeams { count: 0 })?;
        let outcome: Outcome = Outcome {
            champion,
            runner_up: contenders.next(),
        };

        finish(&mut bracket, outcome)?;
        self.store(&mut bracket)?;
        self.announce_completion(tournament_id, outcome)?;
        Ok(outcome)
    }

    /// Playable matches, ordered by bracket section, round and match number.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn next_matches(
        &self,
        tournament_id: TournamentId,
        limit: usize,
    ) -> Result<Vec<Match>, StoreError> {
        let pending: Vec<Match> = self.matches.list_matches(
            tournament_id,
            &MatchFilter::all().with_status(MatchStatus::Pending),
        )?;
        Ok(pending
            .into_iter()
            .filter(Match::is_ready_to_play)
            .take(limit)
            .collect())
    }

    /// All matches grouped by bracket section.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn bracket_overview(
        &self,
        tournament_id: TournamentId,
    ) -> Result<BracketOverview, StoreError> {
        let mut overview: BracketOverview = BracketOverview::default();
        for m in self.matches.list_matches(tournament_id, &MatchFilter::all())? {
            match m.bracket_type {
                BracketType::Winners => overview.winners.push(m),
                BracketType::Losers => overview.losers.push(m),
                BracketType::GrandFinal | BracketType::FinalReset => overview.finals.push(m),
            }
        }
        for section in [
            &mut overview.winners,
            &mut overview.losers,
            &mut overview.finals,
        ] {
            section.sort_by_key(Match::position);
        }
        Ok(overview)
    }

    /// The leaderboard.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn standings(&self, tournament_id: TournamentId) -> Result<Vec<Standing>, StoreError> {
        Ok(compute_standings(&self.teams.list_teams(tournament_id)?))
    }

    /// Team and match counts.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn summary(&self, tournament_id: TournamentId) -> Result<TournamentSummary, StoreError> {
        let teams: Vec<Team> = self.teams.list_teams(tournament_id)?;
        let matches: Vec<Match> = self.matches.list_matches(tournament_id, &MatchFilter::all())?;
        Ok(summarize(&teams, &matches))
    }

    /// The next `count` games a fresh rotation would hand out.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::EmptyCatalog` if no game is active.
    pub fn preview_games(&self, count: usize) -> Result<Vec<Game>, BuildError> {
        let assigner: GameAssigner =
            GameAssigner::new(self.games.list_active_games()?, self.next_seed())?;
        Ok(assigner.preview(count))
    }

    /// Game usage across a tournament's stored matches.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::EmptyCatalog` if no game is active.
    pub fn game_report(
        &self,
        tournament_id: TournamentId,
    ) -> Result<DistributionReport, BuildError> {
        let mut assigner: GameAssigner =
            GameAssigner::new(self.games.list_active_games()?, self.next_seed())?;
        let matches: Vec<Match> = self.matches.list_matches(tournament_id, &MatchFilter::all())?;
        for game in matches.iter().filter_map(|m| m.game) {
            assigner.record_usage(game);
        }
        Ok(assigner.report())
    }

    fn run(&self, command: Command) -> Result<AdvanceSummary, AdvanceError> {
        let match_id: MatchId = command.match_id();
        let tournament_id: TournamentId = self
            .matches
            .get_match(match_id)?
            .ok_or(AdvanceError::MatchNotFound(match_id))?
            .tournament_id;

        let lock: Arc<Mutex<()>> = self.lock_for(tournament_id);
        let _guard: MutexGuard<'_, ()> = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut bracket: Bracket = self.load_bracket(tournament_id)?;
        let transition: TransitionResult = apply(&mut bracket, &command)?;
        self.store(&mut bracket)?;

        let swept: SweepReport = if transition.winner.is_some() {
            self.sweep_and_store(&mut bracket)?
        } else {
            SweepReport::default()
        };
        let outcome: Option<Outcome> = bracket.outcome();
        if let Some(outcome) = outcome {
            self.announce_completion(tournament_id, outcome)?;
        }

        Ok(AdvanceSummary {
            match_id,
            winner: transition.winner,
            loser: transition.loser,
            bye: transition.bye,
            swept: swept.advanced,
            outcome,
        })
    }

    fn sweep_and_store(&self, bracket: &mut Bracket) -> Result<SweepReport, AdvanceError> {
        let mut report: SweepReport = SweepReport::default();
        while resolve_next_orphan(bracket)?.is_some() {
            self.store(bracket)?;
            report.advanced += 1;
        }
        report.finalized = finalize_if_stalled(bracket)?;
        self.store(bracket)?;
        Ok(report)
    }

    fn load_bracket(&self, tournament_id: TournamentId) -> Result<Bracket, AdvanceError> {
        let tournament: Tournament = self
            .get_tournament(tournament_id)?
            .ok_or(AdvanceError::TournamentNotFound(tournament_id))?;
        let teams: Vec<Team> = self.teams.list_teams(tournament_id)?;
        let matches: Vec<Match> = self.matches.list_matches(tournament_id, &MatchFilter::all())?;
        let bracket: Bracket = Bracket::new(tournament, teams, matches, self.config.drop_schedule);

        // An empty catalog only fails once advancement needs a new match.
        match GameAssigner::new(self.games.list_active_games()?, self.next_seed()) {
            Ok(assigner) => Ok(bracket.with_assigner(assigner, self.config.recency_window)),
            Err(_) => Ok(bracket),
        }
    }

    /// Writes pending changes, then publishes the events they produced.
    fn store(&self, bracket: &mut Bracket) -> Result<(), StoreError> {
        let changes: ChangeSet = bracket.take_changes();
        for team in &changes.teams {
            self.teams.save_team(team)?;
        }
        for (match_ref, m) in &changes.matches {
            if m.match_id.is_some() {
                self.matches.save_match(m)?;
            } else {
                let stored: Match = self.matches.create_match(m)?;
                bracket.set_match_id(*match_ref, &stored);
            }
        }

        let events: Vec<BracketEvent> = bracket.take_events();
        for event in &events {
            self.sink.notify(event);
        }
        Ok(())
    }

    fn announce_completion(
        &self,
        tournament_id: TournamentId,
        outcome: Outcome,
    ) -> Result<(), StoreError> {
        self.lifecycle
            .on_tournament_completed(tournament_id, outcome.champion, outcome.runner_up)
    }
}
