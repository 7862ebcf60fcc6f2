// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AdvanceError, Bracket, BracketBuilder, ChangeSet, Command, DEFAULT_RECENCY_WINDOW,
    GameAssigner, MatchRef, Outcome, SweepReport, TransitionResult, apply, finalize_if_stalled,
    resolve_next_orphan,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tourney_domain::{
    BracketType, DropSchedule, Game, GameId, Match, MatchId, Team, TeamId, Tournament,
    TournamentFormat, TournamentId, TournamentStatus,
};

pub const TOURNAMENT: TournamentId = TournamentId::new(1);

pub fn create_test_tournament(format: TournamentFormat) -> Tournament {
    let mut tournament: Tournament = Tournament::new(TOURNAMENT, "Summer Cup", format);
    tournament.status = TournamentStatus::Active;
    tournament
}

/// Teams with ids `1..=count`.
pub fn create_test_teams(count: u32) -> Vec<Team> {
    (1..=count)
        .map(|id| Team::new(TeamId::new(i64::from(id)), TOURNAMENT, &format!("Team {id:02}")))
        .collect()
}

/// Active games with ids `1..=count`.
pub fn create_test_games(count: u32) -> Vec<Game> {
    (1..=count)
        .map(|id| Game::new(GameId::new(i64::from(id)), &format!("Game {id}")))
        .collect()
}

/// A bracket driven the way the service drives it, with a fake id sequence
/// standing in for storage.
pub struct Harness {
    pub bracket: Bracket,
    next_id: i64,
}

impl Harness {
    pub fn build(count: u32, format: TournamentFormat, schedule: DropSchedule, seed: u64) -> Self {
        Self::assemble(count, format, schedule, seed, true)
    }

    fn assemble(
        count: u32,
        format: TournamentFormat,
        schedule: DropSchedule,
        seed: u64,
        with_catalog: bool,
    ) -> Self {
        let teams: Vec<Team> = create_test_teams(count);
        let mut assigner: GameAssigner =
            GameAssigner::new(create_test_games(4), seed).unwrap();
        let mut rng: StdRng = StdRng::seed_from_u64(seed);
        let skeleton: Vec<Match> = BracketBuilder::new(DEFAULT_RECENCY_WINDOW)
            .build(TOURNAMENT, &teams, format, &mut assigner, &mut rng)
            .unwrap();

        let matches: Vec<Match> = skeleton
            .into_iter()
            .zip(1_i64..)
            .map(|(mut m, id)| {
                m.match_id = Some(MatchId::new(id));
                m
            })
            .collect();
        let next_id: i64 = i64::try_from(matches.len()).unwrap() + 1;
        let bracket: Bracket =
            Bracket::new(create_test_tournament(format), teams, matches, schedule);
        let bracket: Bracket = if with_catalog {
            bracket.with_assigner(assigner, DEFAULT_RECENCY_WINDOW)
        } else {
            bracket
        };
        Self { bracket, next_id }
    }

    /// Double elimination with the default drop schedule.
    pub fn double(count: u32) -> Self {
        Self::build(count, TournamentFormat::Double, DropSchedule::default(), 7)
    }

    /// Double elimination with the `2w - 2` drop schedule.
    pub fn standard(count: u32) -> Self {
        Self::build(count, TournamentFormat::Double, DropSchedule::Standard, 7)
    }

    /// Double elimination whose game catalog emptied after generation.
    pub fn without_catalog(count: u32) -> Self {
        Self::assemble(count, TournamentFormat::Double, DropSchedule::default(), 7, false)
    }

    /// Gives every newly created match an id, like a store would.
    pub fn flush(&mut self) -> ChangeSet {
        let changes: ChangeSet = self.bracket.take_changes();
        for (match_ref, m) in &changes.matches {
            if m.match_id.is_none() {
                let mut stored: Match = m.clone();
                stored.match_id = Some(MatchId::new(self.next_id));
                self.next_id += 1;
                self.bracket.set_match_id(*match_ref, &stored);
            }
        }
        changes
    }

    pub fn apply(&mut self, command: Command) -> Result<TransitionResult, AdvanceError> {
        let result: Result<TransitionResult, AdvanceError> = apply(&mut self.bracket, &command);
        self.flush();
        result
    }

    pub fn sweep(&mut self) -> SweepReport {
        let mut report: SweepReport = SweepReport::default();
        while resolve_next_orphan(&mut self.bracket).unwrap().is_some() {
            self.flush();
            report.advanced += 1;
        }
        report.finalized = finalize_if_stalled(&mut self.bracket).unwrap();
        self.flush();
        report
    }

    /// Declares a winner and sweeps, as the service does.
    pub fn declare(&mut self, match_id: MatchId, winner: TeamId) -> TransitionResult {
        let result: TransitionResult = self
            .apply(Command::DeclareWinner { match_id, winner })
            .unwrap();
        self.sweep();
        result
    }

    pub fn match_id(&self, match_ref: MatchRef) -> MatchId {
        self.bracket.get(match_ref).match_id.unwrap()
    }

    pub fn first_playable(&self) -> MatchRef {
        *self
            .bracket
            .playable_matches()
            .first()
            .expect("bracket has a playable match")
    }

    pub fn find(&self, bracket_type: BracketType, round: u32, number: u32) -> MatchRef {
        self.bracket
            .match_refs()
            .find(|r| self.bracket.get(*r).position() == (bracket_type, round, number))
            .expect("match exists")
    }

    /// Plays every match to the end, `pick` choosing each winner.
    pub fn play_out(&mut self, pick: impl Fn(TeamId, TeamId) -> TeamId) -> Outcome {
        self.play_out_in_order(pick, |_| 0)
    }

    /// Like [`play_out`](Self::play_out), with `choose` picking which of the
    /// currently playable matches is decided next. It receives the number of
    /// playable matches and returns an index below it.
    pub fn play_out_in_order(
        &mut self,
        pick: impl Fn(TeamId, TeamId) -> TeamId,
        mut choose: impl FnMut(usize) -> usize,
    ) -> Outcome {
        self.sweep();
        let mut played: usize = 0;
        while !self.bracket.is_finished() {
            let playable: Vec<MatchRef> = self.bracket.playable_matches();
            assert!(!playable.is_empty(), "bracket has a playable match");
            let next: MatchRef = playable[choose(playable.len())];
            let m: &Match = self.bracket.get(next);
            let winner: TeamId = pick(m.team1.unwrap(), m.team2.unwrap());
            let match_id: MatchId = m.match_id.unwrap();
            self.declare(match_id, winner);
            played += 1;
            assert!(played < 256, "bracket did not terminate");
        }
        self.bracket.outcome().unwrap()
    }
}

pub fn lower_id(a: TeamId, b: TeamId) -> TeamId {
    a.min(b)
}

pub fn higher_id(a: TeamId, b: TeamId) -> TeamId {
    a.max(b)
}
