// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Matches and the slots teams occupy in them.

use crate::error::DomainError;
use crate::types::{GameId, MatchId, TeamId, TournamentId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Which part of the bracket a match belongs to.
///
/// The declaration order is the display order used when sorting matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    /// Undefeated teams.
    Winners,
    /// Teams with one loss.
    Losers,
    /// Winners-bracket champion against losers-bracket champion.
    GrandFinal,
    /// Second final, played only after a bracket reset.
    FinalReset,
}

impl BracketType {
    /// Returns the string representation of the bracket type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Winners => "winners",
            Self::Losers => "losers",
            Self::GrandFinal => "grand_final",
            Self::FinalReset => "final_reset",
        }
    }

    /// Short prefix used in match labels.
    #[must_use]
    pub const fn short_code(&self) -> &'static str {
        match self {
            Self::Winners => "W",
            Self::Losers => "L",
            Self::GrandFinal => "GF",
            Self::FinalReset => "GF2",
        }
    }

    /// Returns true for the two final containers.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::GrandFinal | Self::FinalReset)
    }
}

impl FromStr for BracketType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "winners" => Ok(Self::Winners),
            "losers" => Ok(Self::Losers),
            "grand_final" => Ok(Self::GrandFinal),
            "final_reset" => Ok(Self::FinalReset),
            _ => Err(DomainError::InvalidBracketType(s.to_string())),
        }
    }
}

impl std::fmt::Display for BracketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Not started; may still be waiting for teams.
    #[default]
    Pending,
    /// Both teams present and playing.
    InProgress,
    /// Winner decided.
    Completed,
}

impl MatchStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidMatchStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One match in a bracket.
///
/// A slot holding `None` is waiting for a team to arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Canonical identifier. `None` until the match has been stored.
    pub match_id: Option<MatchId>,
    /// The tournament this match belongs to.
    pub tournament_id: TournamentId,
    /// Bracket section.
    pub bracket_type: BracketType,
    /// 1-based round within the bracket section.
    pub round_number: u32,
    /// 1-based position within the round.
    pub match_number: u32,
    /// First slot. Always filled before `team2`.
    pub team1: Option<TeamId>,
    /// Second slot.
    pub team2: Option<TeamId>,
    /// Set once the match completes.
    pub winner: Option<TeamId>,
    /// Progress.
    pub status: MatchStatus,
    /// Game the match is played in.
    pub game: Option<GameId>,
    /// True when the match completed without being played.
    pub is_bye: bool,
    /// When the match was stored.
    pub created_at: Option<OffsetDateTime>,
    /// When the match moved to `InProgress`.
    pub started_at: Option<OffsetDateTime>,
    /// When the winner was recorded.
    pub completed_at: Option<OffsetDateTime>,
}

impl Match {
    /// Creates an empty pending match.
    #[must_use]
    pub const fn new(
        tournament_id: TournamentId,
        bracket_type: BracketType,
        round_number: u32,
        match_number: u32,
    ) -> Self {
        Self {
            match_id: None,
            tournament_id,
            bracket_type,
            round_number,
            match_number,
            team1: None,
            team2: None,
            winner: None,
            status: MatchStatus::Pending,
            game: None,
            is_bye: false,
            created_at: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Places teams into the slots.
    #[must_use]
    pub const fn with_teams(mut self, team1: Option<TeamId>, team2: Option<TeamId>) -> Self {
        self.team1 = team1;
        self.team2 = team2;
        self
    }

    /// Assigns the game.
    #[must_use]
    pub const fn with_game(mut self, game: GameId) -> Self {
        self.game = Some(game);
        self
    }

    /// Ordering key: bracket section, round, match number.
    #[must_use]
    pub const fn position(&self) -> (BracketType, u32, u32) {
        (self.bracket_type, self.round_number, self.match_number)
    }

    /// Returns true once a winner has been recorded.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, MatchStatus::Completed)
    }

    /// Teams currently occupying the slots, `team1` first.
    #[must_use]
    pub fn present_teams(&self) -> Vec<TeamId> {
        self.team1.into_iter().chain(self.team2).collect()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn team_count(&self) -> usize {
        usize::from(self.team1.is_some()) + usize::from(self.team2.is_some())
    }

    /// Returns true if `team` occupies one of the slots.
    #[must_use]
    pub fn has_team(&self, team: TeamId) -> bool {
        self.team1 == Some(team) || self.team2 == Some(team)
    }

    /// The other team in the match, if both slots are filled and `team` is one of them.
    #[must_use]
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        match (self.team1, self.team2) {
            (Some(a), Some(b)) if a == team => Some(b),
            (Some(a), Some(b)) if b == team => Some(a),
            _ => None,
        }
    }

    /// Returns true if the match is unfinished and a slot is still free.
    #[must_use]
    pub const fn has_open_slot(&self) -> bool {
        !self.is_completed() && (self.team1.is_none() || self.team2.is_none())
    }

    /// Returns true if both teams are present and the match has not started.
    #[must_use]
    pub const fn is_ready_to_play(&self) -> bool {
        matches!(self.status, MatchStatus::Pending) && self.team1.is_some() && self.team2.is_some()
    }

    /// The single waiting team of an unfinished match with exactly one slot filled.
    #[must_use]
    pub const fn lone_team(&self) -> Option<TeamId> {
        if self.is_completed() {
            return None;
        }
        match (self.team1, self.team2) {
            (Some(team), None) | (None, Some(team)) => Some(team),
            _ => None,
        }
    }

    /// Puts `team` into the first free slot, `team1` before `team2`.
    ///
    /// Returns false if both slots were already taken.
    pub const fn fill_open_slot(&mut self, team: TeamId) -> bool {
        if self.team1.is_none() {
            self.team1 = Some(team);
            true
        } else if self.team2.is_none() {
            self.team2 = Some(team);
            true
        } else {
            false
        }
    }

    /// Records the winner and completes the match.
    pub fn complete(&mut self, winner: TeamId, is_bye: bool, now: OffsetDateTime) {
        self.winner = Some(winner);
        self.status = MatchStatus::Completed;
        self.is_bye = is_bye;
        self.completed_at = Some(now);
    }

    /// Short human-readable label such as `W R2 M1`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} R{} M{}",
            self.bracket_type.short_code(),
            self.round_number,
            self.match_number
        )
    }
}
