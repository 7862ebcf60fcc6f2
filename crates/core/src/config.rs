// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use tourney_domain::DropSchedule;

/// Number of previous assignments a new match avoids repeating.
pub const DEFAULT_RECENCY_WINDOW: usize = 2;

/// Engine tuning shared by every tournament a service manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many of the most recent game assignments a new match avoids.
    pub recency_window: usize,
    /// Losers round entered by each winners round.
    pub drop_schedule: DropSchedule,
    /// Seed for team shuffling and game pools. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recency_window: DEFAULT_RECENCY_WINDOW,
            drop_schedule: DropSchedule::Staggered,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Returns a copy with a fixed RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns a copy using `schedule` for losers-bracket drops.
    #[must_use]
    pub const fn with_drop_schedule(mut self, schedule: DropSchedule) -> Self {
        self.drop_schedule = schedule;
        self
    }
}
