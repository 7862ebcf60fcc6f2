// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Team bracket status and its transition rules.
//!
//! A team only ever moves forward: from the winners bracket into the losers
//! bracket, and from either into a terminal placement. Nothing moves back.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where a team currently stands in the bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BracketStatus {
    /// Undefeated so far.
    #[default]
    Winners,
    /// One loss in a double-elimination bracket.
    Losers,
    /// Out of the tournament.
    Eliminated,
    /// Won the tournament.
    Champion,
    /// Lost the deciding final.
    RunnerUp,
}

impl BracketStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Winners => "winners",
            Self::Losers => "losers",
            Self::Eliminated => "eliminated",
            Self::Champion => "champion",
            Self::RunnerUp => "runner_up",
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Eliminated | Self::Champion | Self::RunnerUp)
    }

    /// Returns true while the team can still play.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        matches!(self, Self::Winners | Self::Losers)
    }

    /// Checks whether moving to `target` keeps the status monotonic.
    ///
    /// Permitted moves:
    /// - Winners → Losers, Eliminated, Champion, `RunnerUp`
    /// - Losers → Eliminated, Champion, `RunnerUp`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Winners,
                Self::Losers | Self::Eliminated | Self::Champion | Self::RunnerUp
            ) | (Self::Losers, Self::Eliminated | Self::Champion | Self::RunnerUp)
        )
    }
}

impl FromStr for BracketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "winners" => Ok(Self::Winners),
            "losers" => Ok(Self::Losers),
            "eliminated" => Ok(Self::Eliminated),
            "champion" => Ok(Self::Champion),
            "runner_up" => Ok(Self::RunnerUp),
            _ => Err(DomainError::InvalidBracketStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BracketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
