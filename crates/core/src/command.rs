// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tourney_domain::{MatchId, TeamId};

/// A command represents operator intent as data only.
///
/// Commands are the only way to change a bracket after it has been built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Record the result of a match.
    ///
    /// On a match holding a single team this resolves a bye.
    DeclareWinner {
        /// The match.
        match_id: MatchId,
        /// The team that won.
        winner: TeamId,
    },
    /// Advance the single waiting team of a match without a game.
    ManualAdvance {
        /// The match.
        match_id: MatchId,
    },
    /// Mark a ready match as being played.
    StartMatch {
        /// The match.
        match_id: MatchId,
    },
}

impl Command {
    /// The match the command targets.
    #[must_use]
    pub const fn match_id(&self) -> MatchId {
        match self {
            Self::DeclareWinner { match_id, .. }
            | Self::ManualAdvance { match_id }
            | Self::StartMatch { match_id } => *match_id,
        }
    }
}
