// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bracket structure arithmetic.
//!
//! Everything here is a pure function of the team count. For `n` teams the
//! winners bracket is laid out over `k` slots, where `k` is the smallest power
//! of two that is at least `n`. The `k - n` teams without a round-1 opponent
//! receive a bye into round 2.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Smallest power of two that is at least `team_count` (never below 2).
#[must_use]
pub const fn bracket_size(team_count: u32) -> u32 {
    if team_count <= 2 {
        return 2;
    }
    team_count.next_power_of_two()
}

/// Number of teams that skip round 1.
#[must_use]
pub const fn bye_count(team_count: u32) -> u32 {
    bracket_size(team_count) - team_count
}

/// Number of matches actually played in winners round 1.
///
/// Equals `(team_count - byes) / 2`.
#[must_use]
pub const fn first_round_match_count(team_count: u32) -> u32 {
    (team_count - bye_count(team_count)) / 2
}

/// Number of winners-bracket rounds (`log2` of the bracket size).
#[must_use]
pub const fn winners_round_count(team_count: u32) -> u32 {
    bracket_size(team_count).trailing_zeros()
}

/// Number of winners-bracket matches in `round` (1-based).
///
/// Round 1 only holds the teams without a bye; every later round halves the
/// bracket size. Returns 0 for rounds outside the bracket.
#[must_use]
pub const fn winners_round_match_count(team_count: u32, round: u32) -> u32 {
    let rounds: u32 = winners_round_count(team_count);
    if round == 0 || round > rounds {
        return 0;
    }
    if round == 1 {
        return first_round_match_count(team_count);
    }
    bracket_size(team_count) >> round
}

/// Number of losers round-1 containers pre-created for the round-1 losers.
///
/// Two-team brackets create their single losers match lazily.
#[must_use]
pub const fn losers_first_round_match_count(team_count: u32) -> u32 {
    if team_count < 3 {
        return 0;
    }
    first_round_match_count(team_count).div_ceil(2)
}

/// Maps the winners round a team lost in to the losers round it drops into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DropSchedule {
    /// Round 1 drops to 1, round `w >= 2` drops to `2w - 2`.
    ///
    /// Matches the published double-elimination charts: every losers round
    /// after the first alternates between an internal round and a round that
    /// absorbs the next wave of winners-bracket losers.
    Standard,
    /// Round 1 drops to 1, round `w >= 2` drops to `2w - 1`.
    ///
    /// Leaves one extra internal round between waves. Count mismatches are
    /// absorbed by byes granted during reconciliation.
    #[default]
    Staggered,
}

impl DropSchedule {
    /// Returns the string representation of the schedule.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Staggered => "staggered",
        }
    }

    /// Losers round entered by a team that lost in `winners_round`.
    #[must_use]
    pub const fn drop_round(&self, winners_round: u32) -> u32 {
        if winners_round <= 1 {
            return 1;
        }
        match self {
            Self::Standard => 2 * winners_round - 2,
            Self::Staggered => 2 * winners_round - 1,
        }
    }

    /// Last losers round for a bracket of `team_count` teams.
    ///
    /// The winner of this round moves on to the grand final. It is the round
    /// the winners-bracket final's loser drops into.
    #[must_use]
    pub const fn max_losers_round(&self, team_count: u32) -> u32 {
        self.drop_round(winners_round_count(team_count))
    }
}

impl FromStr for DropSchedule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "staggered" => Ok(Self::Staggered),
            _ => Err(DomainError::InvalidDropSchedule(s.to_string())),
        }
    }
}

impl std::fmt::Display for DropSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
