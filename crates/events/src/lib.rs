// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Bracket events and the sinks that receive them.
//!
//! The engine reports every user-visible outcome (a match starting, a victory,
//! a bye, an elimination, a bracket reset, a champion) as a [`BracketEvent`].
//! Events are handed to a [`NotificationSink`] after the state change they
//! describe has been committed. The engine works with [`NoopSink`].

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use time::OffsetDateTime;
use tourney_domain::{MatchId, TeamId, TournamentId};

#[cfg(test)]
mod tests;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A match moved to in progress.
    MatchStarted,
    /// A played match was won.
    Victory,
    /// A lone team advanced without playing.
    ByeAdvanced,
    /// A team lost its last chance.
    Eliminated,
    /// The losers-bracket finalist won the grand final.
    BracketReset,
    /// The tournament has a champion.
    Champion,
}

impl EventKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MatchStarted => "match_started",
            Self::Victory => "victory",
            Self::ByeAdvanced => "bye_advanced",
            Self::Eliminated => "eliminated",
            Self::BracketReset => "bracket_reset",
            Self::Champion => "champion",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single bracket event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketEvent {
    /// What happened.
    pub kind: EventKind,
    /// The tournament it happened in.
    pub tournament_id: TournamentId,
    /// The match involved, if any.
    pub match_id: Option<MatchId>,
    /// The team the event is about.
    pub team_id: Option<TeamId>,
    /// The other team involved (the loser of a victory, the runner-up of a title).
    pub opponent_id: Option<TeamId>,
    /// Human-readable description.
    pub message: String,
    /// When the event was recorded.
    pub occurred_at: OffsetDateTime,
}

impl BracketEvent {
    /// Creates a new event stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `kind` - What happened
    /// * `tournament_id` - The tournament it happened in
    /// * `message` - Human-readable description
    #[must_use]
    pub fn new(kind: EventKind, tournament_id: TournamentId, message: impl Into<String>) -> Self {
        Self {
            kind,
            tournament_id,
            match_id: None,
            team_id: None,
            opponent_id: None,
            message: message.into(),
            occurred_at: OffsetDateTime::now_utc(),
        }
    }

    /// Attaches the match the event concerns.
    #[must_use]
    pub const fn for_match(mut self, match_id: Option<MatchId>) -> Self {
        self.match_id = match_id;
        self
    }

    /// Attaches the team the event is about.
    #[must_use]
    pub const fn for_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Attaches the opposing team.
    #[must_use]
    pub const fn against(mut self, opponent_id: TeamId) -> Self {
        self.opponent_id = Some(opponent_id);
        self
    }
}

/// Receives bracket events.
///
/// Implementations must not fail: a sink that cannot deliver a message drops
/// it. Bracket state never depends on what a sink does.
pub trait NotificationSink: Send + Sync {
    /// Delivers one event.
    fn notify(&self, event: &BracketEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _event: &BracketEvent) {}
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: &BracketEvent) {
        tracing::info!(
            kind = %event.kind,
            tournament_id = %event.tournament_id,
            match_id = ?event.match_id.map(|id| id.value()),
            team_id = ?event.team_id.map(|id| id.value()),
            "{}",
            event.message
        );
    }
}

/// Keeps every event in memory.
///
/// Used by tests and by the simulation to print a timeline.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<BracketEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event received so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<BracketEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the events of one kind.
    #[must_use]
    pub fn events_of(&self, kind: EventKind) -> Vec<BracketEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.kind == kind)
            .collect()
    }

    /// Removes and returns every stored event.
    pub fn drain(&self) -> Vec<BracketEvent> {
        std::mem::take(
            &mut *self
                .events
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, event: &BracketEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
