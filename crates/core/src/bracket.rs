// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The in-memory working set of one tournament's bracket.
//!
//! A [`Bracket`] is loaded from the repositories, mutated by the advancement
//! engine and the reconciliation sweep, and then flushed back. It records
//! which teams and matches changed so only those are written, and collects
//! the events that are published once the write succeeded.

use crate::error::AdvanceError;
use crate::game_assigner::GameAssigner;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tourney_domain::{
    BracketStatus, BracketType, DropSchedule, GameId, Match, MatchId, MatchStatus, Team, TeamId,
    Tournament, TournamentFormat, TournamentId, winners_round_count,
};
use tourney_events::BracketEvent;

/// Handle to a match inside a [`Bracket`].
///
/// Valid for the lifetime of the bracket it came from. Newly created matches
/// have no `MatchId` until they are stored, so the engine addresses matches
/// by position in the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchRef(usize);

impl MatchRef {
    /// Position in the working set.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Final standing of a finished tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// The winner.
    pub champion: TeamId,
    /// The last team beaten, when one can be determined.
    pub runner_up: Option<TeamId>,
}

/// Pending writes taken from a [`Bracket`].
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Teams whose results or status changed.
    pub teams: Vec<Team>,
    /// Matches to create (`match_id` is `None`) or update.
    pub matches: Vec<(MatchRef, Match)>,
}

impl ChangeSet {
    /// Returns true when nothing needs writing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.matches.is_empty()
    }
}

/// A tournament's teams and matches, held for one operation.
#[derive(Debug, Clone)]
pub struct Bracket {
    tournament: Tournament,
    schedule: DropSchedule,
    teams: BTreeMap<TeamId, Team>,
    matches: Vec<Match>,
    dirty_teams: BTreeSet<TeamId>,
    dirty_matches: BTreeSet<MatchRef>,
    events: Vec<BracketEvent>,
    outcome: Option<Outcome>,
    assigner: Option<GameAssigner>,
    recency_window: usize,
}

impl Bracket {
    /// Creates a working set.
    ///
    /// # Arguments
    ///
    /// * `tournament` - The tournament, for its format and scoring rules
    /// * `teams` - Every registered team
    /// * `matches` - Every stored match
    /// * `schedule` - Losers-bracket drop schedule
    #[must_use]
    pub fn new(
        tournament: Tournament,
        teams: Vec<Team>,
        matches: Vec<Match>,
        schedule: DropSchedule,
    ) -> Self {
        Self {
            tournament,
            schedule,
            teams: teams.into_iter().map(|team| (team.team_id, team)).collect(),
            matches,
            dirty_teams: BTreeSet::new(),
            dirty_matches: BTreeSet::new(),
            events: Vec::new(),
            outcome: None,
            assigner: None,
            recency_window: 0,
        }
    }

    /// Attaches a game assigner used for matches created during advancement.
    ///
    /// Without one, any advancement that needs a new match fails with
    /// [`AdvanceError::EmptyCatalog`].
    #[must_use]
    pub fn with_assigner(mut self, assigner: GameAssigner, recency_window: usize) -> Self {
        self.assigner = Some(assigner);
        self.recency_window = recency_window;
        self
    }

    /// The tournament.
    #[must_use]
    pub const fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    /// The tournament id.
    #[must_use]
    pub const fn tournament_id(&self) -> TournamentId {
        self.tournament.tournament_id
    }

    /// Single or double elimination.
    #[must_use]
    pub const fn format(&self) -> TournamentFormat {
        self.tournament.format
    }

    /// The drop schedule in force.
    #[must_use]
    pub const fn schedule(&self) -> DropSchedule {
        self.schedule
    }

    /// Number of registered teams.
    #[must_use]
    pub fn team_count(&self) -> u32 {
        u32::try_from(self.teams.len()).unwrap_or(u32::MAX)
    }

    /// Number of winners-bracket rounds.
    #[must_use]
    pub fn winners_rounds(&self) -> u32 {
        winners_round_count(self.team_count())
    }

    /// Last losers round before the grand final.
    #[must_use]
    pub fn max_losers_round(&self) -> u32 {
        self.schedule.max_losers_round(self.team_count())
    }

    /// Returns true once a champion is decided or the tournament was closed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.outcome.is_some() || self.tournament.is_completed()
    }

    /// The decided outcome, if any.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// All teams, ordered by id.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// One team.
    #[must_use]
    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.teams.get(&team_id)
    }

    /// All matches, in working-set order.
    #[must_use]
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// References to every match, in working-set order.
    pub fn match_refs(&self) -> impl Iterator<Item = MatchRef> + use<> {
        (0..self.matches.len()).map(MatchRef)
    }

    /// The match behind a reference.
    #[must_use]
    pub fn get(&self, match_ref: MatchRef) -> &Match {
        &self.matches[match_ref.0]
    }

    /// Finds a stored match by id.
    #[must_use]
    pub fn find_match(&self, match_id: MatchId) -> Option<MatchRef> {
        self.matches
            .iter()
            .position(|m| m.match_id == Some(match_id))
            .map(MatchRef)
    }

    /// The first unfinished match of `bracket_type`/`round` with a free slot,
    /// lowest match number first.
    #[must_use]
    pub fn find_open_slot(&self, bracket_type: BracketType, round: u32) -> Option<MatchRef> {
        self.match_refs()
            .filter(|r| {
                let m: &Match = self.get(*r);
                m.bracket_type == bracket_type && m.round_number == round && m.has_open_slot()
            })
            .min_by_key(|r| self.get(*r).match_number)
    }

    /// The unfinished grand final or final reset container.
    #[must_use]
    pub fn final_match(&self, bracket_type: BracketType) -> Option<MatchRef> {
        self.match_refs()
            .filter(|r| {
                let m: &Match = self.get(*r);
                m.bracket_type == bracket_type && !m.is_completed()
            })
            .min_by_key(|r| self.get(*r).match_number)
    }

    /// Unfinished matches holding two teams.
    #[must_use]
    pub fn playable_matches(&self) -> Vec<MatchRef> {
        let mut refs: Vec<MatchRef> = self
            .match_refs()
            .filter(|r| {
                let m: &Match = self.get(*r);
                !m.is_completed() && m.team_count() == 2
            })
            .collect();
        refs.sort_by_key(|r| self.get(*r).position());
        refs
    }

    /// The most advanced completed match of `bracket_type`.
    #[must_use]
    pub fn last_completed(&self, bracket_type: BracketType) -> Option<MatchRef> {
        self.match_refs()
            .filter(|r| {
                let m: &Match = self.get(*r);
                m.bracket_type == bracket_type && m.is_completed() && m.winner.is_some()
            })
            .max_by_key(|r| self.get(*r).position())
    }

    /// Picks a runner-up when the final did not produce one.
    ///
    /// Prefers the winner of the most advanced completed losers match, then
    /// the loser of the most advanced played winners match. Only teams still
    /// alive qualify.
    #[must_use]
    pub fn fallback_runner_up(&self, champion: TeamId) -> Option<TeamId> {
        let eligible = |team: &TeamId| {
            *team != champion
                && self
                    .team(*team)
                    .is_some_and(|t| t.bracket_status.is_alive())
        };
        let from_losers: Option<TeamId> = self
            .last_completed(BracketType::Losers)
            .and_then(|r| self.get(r).winner)
            .filter(eligible);
        from_losers.or_else(|| {
            self.last_completed(BracketType::Winners).and_then(|r| {
                let m: &Match = self.get(r);
                m.winner
                    .and_then(|winner| m.opponent_of(winner))
                    .filter(eligible)
            })
        })
    }

    pub(crate) fn team_mut(&mut self, team_id: TeamId) -> Result<&mut Team, AdvanceError> {
        let team: &mut Team = self
            .teams
            .get_mut(&team_id)
            .ok_or(AdvanceError::TeamNotFound(team_id))?;
        self.dirty_teams.insert(team_id);
        Ok(team)
    }

    pub(crate) fn match_mut(&mut self, match_ref: MatchRef) -> &mut Match {
        self.dirty_matches.insert(match_ref);
        &mut self.matches[match_ref.0]
    }

    /// Teams still competing.
    pub(crate) fn alive_teams(&self) -> Vec<TeamId> {
        self.teams
            .values()
            .filter(|team| team.bracket_status.is_alive())
            .map(|team| team.team_id)
            .collect()
    }

    pub(crate) fn status_of(&self, team_id: TeamId) -> Result<BracketStatus, AdvanceError> {
        self.team(team_id)
            .map(|team| team.bracket_status)
            .ok_or(AdvanceError::TeamNotFound(team_id))
    }

    /// Appends a new waiting match with `team` in `team1`.
    pub(crate) fn create_match(
        &mut self,
        bracket_type: BracketType,
        round: u32,
        team: Option<TeamId>,
    ) -> Result<MatchRef, AdvanceError> {
        let tournament_id: TournamentId = self.tournament_id();
        let recent: Vec<GameId> = self.matches.iter().filter_map(|m| m.game).collect();
        let window: usize = self.recency_window;
        let Some(assigner) = self.assigner.as_mut() else {
            tracing::warn!(
                tournament_id = %tournament_id,
                bracket_type = %bracket_type,
                round,
                "No active game for a new match"
            );
            return Err(AdvanceError::EmptyCatalog);
        };
        let game: GameId = assigner.next_avoiding(&recent, window).game_id;

        let match_number: u32 = self
            .matches
            .iter()
            .filter(|m| m.bracket_type == bracket_type && m.round_number == round)
            .map(|m| m.match_number)
            .max()
            .unwrap_or(0)
            + 1;
        let mut created: Match =
            Match::new(tournament_id, bracket_type, round, match_number)
                .with_teams(team, None);
        created.game = Some(game);

        tracing::debug!(
            tournament_id = %tournament_id,
            label = %created.label(),
            "Created waiting match"
        );
        self.matches.push(created);
        let match_ref: MatchRef = MatchRef(self.matches.len() - 1);
        self.dirty_matches.insert(match_ref);
        Ok(match_ref)
    }

    /// Seats `team` in the first open slot of `bracket_type`/`round`,
    /// creating a waiting match when every slot is taken.
    pub(crate) fn place(
        &mut self,
        bracket_type: BracketType,
        round: u32,
        team: TeamId,
    ) -> Result<MatchRef, AdvanceError> {
        if let Some(open) = self.find_open_slot(bracket_type, round) {
            self.match_mut(open).fill_open_slot(team);
            return Ok(open);
        }
        self.create_match(bracket_type, round, Some(team))
    }

    pub(crate) const fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    pub(crate) fn record(&mut self, event: BracketEvent) {
        self.events.push(event);
    }

    /// Removes and returns the events recorded so far.
    pub fn take_events(&mut self) -> Vec<BracketEvent> {
        std::mem::take(&mut self.events)
    }

    /// Removes and returns the pending writes.
    pub fn take_changes(&mut self) -> ChangeSet {
        let teams: Vec<Team> = std::mem::take(&mut self.dirty_teams)
            .into_iter()
            .filter_map(|team_id| self.teams.get(&team_id).cloned())
            .collect();
        let matches: Vec<(MatchRef, Match)> = std::mem::take(&mut self.dirty_matches)
            .into_iter()
            .map(|r| (r, self.matches[r.0].clone()))
            .collect();
        ChangeSet { teams, matches }
    }

    /// Records the id a stored match received.
    pub fn set_match_id(&mut self, match_ref: MatchRef, stored: &Match) {
        let m: &mut Match = &mut self.matches[match_ref.0];
        m.match_id = stored.match_id;
        m.created_at = stored.created_at;
    }

    /// Counts matches by status, for logging.
    #[must_use]
    pub fn count_status(&self, status: MatchStatus) -> usize {
        self.matches.iter().filter(|m| m.status == status).count()
    }
}
