// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bracket_status::BracketStatus;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Generates an opaque numeric identifier newtype.
///
/// Identifiers are assigned by the storage collaborator and carry no meaning
/// beyond identity and creation order.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifies a tournament.
    TournamentId
);
numeric_id!(
    /// Identifies a registered team.
    TeamId
);
numeric_id!(
    /// Identifies a persisted match.
    MatchId
);
numeric_id!(
    /// Identifies a game in the catalog.
    GameId
);

/// Elimination format of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// One loss eliminates a team.
    #[default]
    Single,
    /// Two losses eliminate a team; losers drop into a second bracket.
    Double,
}

impl TournamentFormat {
    /// Converts this format to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

impl FromStr for TournamentFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            _ => Err(DomainError::InvalidFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Created but not yet accepting teams.
    #[default]
    Setup,
    /// Accepting team registrations.
    Registration,
    /// Bracket generated, matches being played.
    Active,
    /// Champion decided or finished manually.
    Completed,
}

impl TournamentStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Registration => "registration",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Setup → Registration
    /// - Registration → Active
    /// - Active → Completed
    /// - Active → Active (bracket regeneration)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Setup, Self::Registration)
                | (Self::Registration | Self::Active, Self::Active)
                | (Self::Active, Self::Completed)
        )
    }

    /// Returns whether teams may still register.
    #[must_use]
    pub const fn accepts_registrations(&self) -> bool {
        matches!(self, Self::Setup | Self::Registration)
    }
}

impl FromStr for TournamentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "setup" => Ok(Self::Setup),
            "registration" => Ok(Self::Registration),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidTournamentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Points awarded for match results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Points for a played victory.
    pub points_per_win: u32,
    /// Points for a played loss.
    pub points_per_participation: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            points_per_win: 3,
            points_per_participation: 1,
        }
    }
}

/// A tournament and its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    /// Canonical identifier.
    pub tournament_id: TournamentId,
    /// Display name.
    pub name: String,
    /// Elimination format.
    pub format: TournamentFormat,
    /// Lifecycle status.
    pub status: TournamentStatus,
    /// Maximum number of registered teams.
    pub max_teams: u32,
    /// Points awarded per result.
    pub scoring: ScoringRules,
    /// When the bracket was first generated.
    pub started_at: Option<OffsetDateTime>,
    /// When the tournament completed.
    pub finished_at: Option<OffsetDateTime>,
}

impl Tournament {
    /// Default capacity for newly created tournaments.
    pub const DEFAULT_MAX_TEAMS: u32 = 16;

    /// Creates a tournament in the `Setup` state with default capacity and scoring.
    #[must_use]
    pub fn new(tournament_id: TournamentId, name: &str, format: TournamentFormat) -> Self {
        Self {
            tournament_id,
            name: name.to_string(),
            format,
            status: TournamentStatus::Setup,
            max_teams: Self::DEFAULT_MAX_TEAMS,
            scoring: ScoringRules::default(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Moves the tournament to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLifecycleTransition` if the move is not permitted.
    pub fn transition_to(&mut self, target: TournamentStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidLifecycleTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    /// Returns whether the tournament has finished.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, TournamentStatus::Completed)
    }
}

/// A team registered in a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Canonical identifier.
    pub team_id: TeamId,
    /// The tournament this team plays in.
    pub tournament_id: TournamentId,
    /// Display name (unique per tournament).
    pub name: String,
    /// Played victories.
    pub wins: u32,
    /// Played losses.
    pub losses: u32,
    /// Accumulated points.
    pub points: u32,
    /// Position in the bracket.
    pub bracket_status: BracketStatus,
}

impl Team {
    /// Creates a team with no results yet.
    #[must_use]
    pub fn new(team_id: TeamId, tournament_id: TournamentId, name: &str) -> Self {
        Self {
            team_id,
            tournament_id,
            name: name.to_string(),
            wins: 0,
            losses: 0,
            points: 0,
            bracket_status: BracketStatus::Winners,
        }
    }

    /// Number of played matches (byes excluded).
    #[must_use]
    pub const fn matches_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Percentage of played matches won, 0 when nothing was played.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        let played: u32 = self.matches_played();
        if played == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(played) * 100.0
    }

    /// Records a played victory.
    pub const fn record_victory(&mut self, scoring: &ScoringRules) {
        self.wins += 1;
        self.points += scoring.points_per_win;
    }

    /// Records a played loss. Bracket status is moved separately.
    pub const fn record_loss(&mut self, scoring: &ScoringRules) {
        self.losses += 1;
        self.points += scoring.points_per_participation;
    }

    /// Moves the team to a new bracket status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the move would go backwards.
    pub fn advance_status(&mut self, target: BracketStatus) -> Result<(), DomainError> {
        if !self.bracket_status.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                team_id: self.team_id,
                from: self.bracket_status,
                to: target,
            });
        }
        self.bracket_status = target;
        Ok(())
    }

    /// Clears results and puts the team back at the top of the winners bracket.
    ///
    /// Used only when a bracket is regenerated from scratch.
    pub const fn reset_results(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.points = 0;
        self.bracket_status = BracketStatus::Winners;
    }
}

/// A game from the catalog that matches are played in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Game {
    /// Canonical identifier.
    pub game_id: GameId,
    /// Display name.
    pub name: String,
    /// Optional emoji shown next to the name.
    pub emoji: Option<String>,
    /// Only active games are assigned to matches.
    pub is_active: bool,
}

impl Game {
    /// Creates an active game.
    #[must_use]
    pub fn new(game_id: GameId, name: &str) -> Self {
        Self {
            game_id,
            name: name.to_string(),
            emoji: None,
            is_active: true,
        }
    }

    /// Sets the emoji.
    #[must_use]
    pub fn with_emoji(mut self, emoji: &str) -> Self {
        self.emoji = Some(emoji.to_string());
        self
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.emoji {
            Some(emoji) => write!(f, "{emoji} {}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
