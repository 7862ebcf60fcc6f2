// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cyclic, shuffled game distribution.
//!
//! The assigner keeps an append-only pool of catalog indices and a cursor into
//! it. Whenever the cursor reaches the end of the pool a freshly shuffled copy
//! of the whole catalog is appended, so every game is handed out once before
//! any game repeats.

use crate::error::BuildError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tourney_domain::{Game, GameId};

/// Usage figures for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameUsage {
    /// The game.
    pub game_id: GameId,
    /// Display name.
    pub name: String,
    /// Times handed out.
    pub usage_count: u32,
    /// Share of all assignments, in percent.
    pub percentage: f64,
}

/// Snapshot of how evenly games have been handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Total games handed out.
    pub total_assigned: u32,
    /// Games in the catalog.
    pub unique_games: usize,
    /// Shuffled cycles appended to the pool so far.
    pub cycles: u32,
    /// Cursor position in the pool.
    pub cursor: usize,
    /// Pool length.
    pub pool_len: usize,
    /// Per-game usage, catalog order.
    pub usage: Vec<GameUsage>,
    /// Lowest usage count.
    pub min_usage: u32,
    /// Highest usage count.
    pub max_usage: u32,
    /// `max_usage - min_usage`.
    pub difference: u32,
    /// `(1 - difference / max_usage) * 100`, rounded to two decimals; 100
    /// before anything has been assigned.
    pub balance_score: f64,
    /// True while usage counts differ by at most one.
    pub is_balanced: bool,
}

/// Hands each match a game from the active catalog.
#[derive(Debug, Clone)]
pub struct GameAssigner {
    games: Vec<Game>,
    pool: Vec<usize>,
    cursor: usize,
    cycles: u32,
    usage: BTreeMap<GameId, u32>,
    seed: u64,
    shuffles: u64,
}

impl GameAssigner {
    /// Creates an assigner over the active games of `games`.
    ///
    /// Inactive games are ignored. The first cycle is shuffled immediately.
    /// Each cycle is shuffled by an RNG derived from `seed` and the number of
    /// cycles shuffled so far, so the same seed always yields the same rotation.
    ///
    /// # Arguments
    ///
    /// * `games` - The catalog
    /// * `seed` - Base seed for cycle shuffles
    ///
    /// # Errors
    ///
    /// Returns `BuildError::EmptyCatalog` if no game is active.
    pub fn new(games: Vec<Game>, seed: u64) -> Result<Self, BuildError> {
        let games: Vec<Game> = games.into_iter().filter(|game| game.is_active).collect();
        if games.is_empty() {
            return Err(BuildError::EmptyCatalog);
        }

        let mut assigner: Self = Self {
            games,
            pool: Vec::new(),
            cursor: 0,
            cycles: 0,
            usage: BTreeMap::new(),
            seed,
            shuffles: 0,
        };
        assigner.start_cycle();
        Ok(assigner)
    }

    /// Number of games in rotation.
    #[must_use]
    pub const fn catalog_size(&self) -> usize {
        self.games.len()
    }

    fn start_cycle(&mut self) {
        let mut rng: StdRng = StdRng::seed_from_u64(self.seed.wrapping_add(self.shuffles));
        let mut cycle: Vec<usize> = (0..self.games.len()).collect();
        cycle.shuffle(&mut rng);
        self.pool.extend(cycle);
        self.shuffles += 1;
        self.cycles += 1;
        tracing::debug!(
            cycle = self.cycles,
            pool_len = self.pool.len(),
            "Started game cycle"
        );
    }

    /// Returns the next game in the rotation.
    pub fn next_game(&mut self) -> Game {
        if self.cursor >= self.pool.len() {
            self.start_cycle();
        }
        let game: Game = self.games[self.pool[self.cursor]].clone();
        self.cursor += 1;
        *self.usage.entry(game.game_id).or_insert(0) += 1;
        game
    }

    /// Returns the next game not among the last `window` entries of `recent`.
    ///
    /// Draws at most twice the catalog size from the rotation looking for a
    /// game outside the window and accepts a repeat once those draws are
    /// spent. When the window already covers the whole catalog the plain
    /// [`next_game`](Self::next_game) result is returned.
    ///
    /// # Arguments
    ///
    /// * `recent` - Previously assigned games, oldest first
    /// * `window` - How many of the most recent entries to avoid
    pub fn next_avoiding(&mut self, recent: &[GameId], window: usize) -> Game {
        let excluded: &[GameId] = &recent[recent.len().saturating_sub(window)..];
        let has_alternative: bool = self
            .games
            .iter()
            .any(|game| !excluded.contains(&game.game_id));
        if excluded.is_empty() || !has_alternative {
            return self.next_game();
        }

        let mut candidate: Game = self.next_game();
        for _ in 1..self.games.len() * 2 {
            if !excluded.contains(&candidate.game_id) {
                return candidate;
            }
            candidate = self.next_game();
        }
        if excluded.contains(&candidate.game_id) {
            tracing::debug!(game = %candidate.name, "Accepting a repeated game");
        }
        candidate
    }

    /// Counts an assignment made outside this assigner, such as one already
    /// stored on a match. Games outside the catalog are ignored.
    pub fn record_usage(&mut self, game_id: GameId) {
        if self.games.iter().any(|game| game.game_id == game_id) {
            *self.usage.entry(game_id).or_insert(0) += 1;
        }
    }

    /// Draws `count` games in sequence.
    pub fn draw(&mut self, count: usize) -> Vec<Game> {
        (0..count).map(|_| self.next_game()).collect()
    }

    /// Returns the next `count` games without consuming them.
    ///
    /// Works on a private copy of the pool and cursor, so the preview is
    /// exactly what the following `count` calls to [`next_game`](Self::next_game)
    /// return.
    #[must_use]
    pub fn preview(&self, count: usize) -> Vec<Game> {
        let mut shadow: Self = self.clone();
        shadow.draw(count)
    }

    /// Builds a usage report.
    #[must_use]
    pub fn report(&self) -> DistributionReport {
        let total_assigned: u32 = self.usage.values().sum();
        let usage: Vec<GameUsage> = self
            .games
            .iter()
            .map(|game| {
                let usage_count: u32 = self.usage.get(&game.game_id).copied().unwrap_or(0);
                let percentage: f64 = if total_assigned == 0 {
                    0.0
                } else {
                    f64::from(usage_count) * 100.0 / f64::from(total_assigned)
                };
                GameUsage {
                    game_id: game.game_id,
                    name: game.name.clone(),
                    usage_count,
                    percentage,
                }
            })
            .collect();
        let min_usage: u32 = usage.iter().map(|u| u.usage_count).min().unwrap_or(0);
        let max_usage: u32 = usage.iter().map(|u| u.usage_count).max().unwrap_or(0);
        let difference: u32 = max_usage - min_usage;
        let balance_score: f64 = if max_usage == 0 {
            100.0
        } else {
            let score: f64 = (1.0 - f64::from(difference) / f64::from(max_usage)) * 100.0;
            (score * 100.0).round() / 100.0
        };

        DistributionReport {
            total_assigned,
            unique_games: self.games.len(),
            cycles: self.cycles,
            cursor: self.cursor,
            pool_len: self.pool.len(),
            usage,
            min_usage,
            max_usage,
            difference,
            balance_score,
            is_balanced: difference <= 1,
        }
    }

    /// Forgets every assignment and starts a fresh cycle.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.cursor = 0;
        self.cycles = 0;
        self.usage.clear();
        self.start_cycle();
        tracing::debug!("Game distribution reset");
    }
}
