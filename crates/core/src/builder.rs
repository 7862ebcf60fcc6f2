// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Initial bracket construction.
//!
//! The winners bracket is laid out in full: round 1 pairs the teams without a
//! bye, every later round is created empty and the bye teams take the first
//! round-2 slots. For double elimination only the losers round-1 containers
//! are created up front; later losers matches appear as teams arrive. The
//! grand final and the final reset are always created empty.

use crate::error::BuildError;
use crate::game_assigner::GameAssigner;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tourney_domain::{
    BracketType, DomainError, GameId, Match, Team, TeamId, TournamentFormat, TournamentId,
    first_round_match_count, losers_first_round_match_count, winners_round_count,
    winners_round_match_count,
};

/// Builds the initial match skeleton of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketBuilder {
    recency_window: usize,
}

impl BracketBuilder {
    /// Creates a builder.
    ///
    /// # Arguments
    ///
    /// * `recency_window` - How many previous assignments each match's game avoids
    #[must_use]
    pub const fn new(recency_window: usize) -> Self {
        Self { recency_window }
    }

    /// Shuffles `teams` and lays out the bracket.
    ///
    /// Returned matches have no `match_id`; they are numbered from 1 within
    /// each bracket section and round, and every one has a game.
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Owner of the matches
    /// * `teams` - Registered teams
    /// * `format` - Single or double elimination
    /// * `assigner` - Game source
    /// * `rng` - Seeding shuffle source
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InsufficientTeams` for fewer than two teams.
    pub fn build(
        &self,
        tournament_id: TournamentId,
        teams: &[Team],
        format: TournamentFormat,
        assigner: &mut GameAssigner,
        rng: &mut StdRng,
    ) -> Result<Vec<Match>, BuildError> {
        if teams.len() < 2 {
            return Err(BuildError::InsufficientTeams { count: teams.len() });
        }
        let team_count: u32 = u32::try_from(teams.len()).map_err(|_| {
            BuildError::Domain(DomainError::TournamentFull {
                max_teams: u32::MAX,
            })
        })?;

        let mut seeded: Vec<TeamId> = teams.iter().map(|team| team.team_id).collect();
        seeded.shuffle(rng);

        let mut matches: Vec<Match> = build_winners(tournament_id, team_count, &seeded);
        if format == TournamentFormat::Double {
            for number in 1..=losers_first_round_match_count(team_count) {
                matches.push(Match::new(tournament_id, BracketType::Losers, 1, number));
            }
            matches.push(Match::new(tournament_id, BracketType::GrandFinal, 1, 1));
            matches.push(Match::new(tournament_id, BracketType::FinalReset, 1, 1));
        }

        let mut recent: Vec<GameId> = Vec::with_capacity(matches.len());
        for m in &mut matches {
            let game: GameId = assigner.next_avoiding(&recent, self.recency_window).game_id;
            m.game = Some(game);
            recent.push(game);
        }

        tracing::info!(
            tournament_id = %tournament_id,
            format = %format,
            teams = team_count,
            matches = matches.len(),
            "Built bracket skeleton"
        );
        Ok(matches)
    }
}

fn build_winners(tournament_id: TournamentId, team_count: u32, seeded: &[TeamId]) -> Vec<Match> {
    let opening: usize = usize::try_from(first_round_match_count(team_count)).unwrap_or(0);
    let (paired, byes) = seeded.split_at(opening * 2);

    let mut matches: Vec<Match> = Vec::new();
    for (number, pair) in (1_u32..).zip(paired.chunks(2)) {
        matches.push(
            Match::new(tournament_id, BracketType::Winners, 1, number)
                .with_teams(pair.first().copied(), pair.get(1).copied()),
        );
    }
    for round in 2..=winners_round_count(team_count) {
        for number in 1..=winners_round_match_count(team_count, round) {
            matches.push(Match::new(tournament_id, BracketType::Winners, round, number));
        }
    }

    for team in byes {
        let slot: Option<&mut Match> = matches
            .iter_mut()
            .filter(|m| m.round_number == 2 && m.has_open_slot())
            .min_by_key(|m| m.match_number);
        if let Some(slot) = slot {
            slot.fill_open_slot(*team);
            tracing::debug!(team_id = %team, label = %slot.label(), "Seeded bye");
        }
    }
    matches
}
