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

//! Bracket engine: game assignment, bracket construction, advancement and
//! reconciliation of single and double elimination tournaments.

mod advancement;
mod bracket;
mod builder;
mod command;
mod config;
mod error;
mod game_assigner;
mod repository;
mod service;
mod sweep;

#[cfg(test)]
mod tests;

pub use advancement::{TransitionResult, apply};
pub use bracket::{Bracket, ChangeSet, MatchRef, Outcome};
pub use builder::BracketBuilder;
pub use command::Command;
pub use config::{DEFAULT_RECENCY_WINDOW, EngineConfig};
pub use error::{AdvanceError, BuildError, StoreError};
pub use game_assigner::{DistributionReport, GameAssigner, GameUsage};
pub use repository::{
    GameCatalog, MatchFilter, MatchRepository, TeamRepository, TournamentLifecycle,
};
pub use service::{AdvanceSummary, BracketOverview, BracketService, DEFAULT_NEXT_MATCHES};
pub use sweep::{
    SweepReport, finalize_if_stalled, find_orphan, is_orphaned, resolve_next_orphan, sweep,
};
