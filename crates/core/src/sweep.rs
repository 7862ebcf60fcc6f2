// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reconciliation of stranded teams.
//!
//! Byes and lazily created losers matches can leave a team waiting for an
//! opponent that can no longer arrive. The sweep finds such orphaned matches,
//! resolves each one as a bye and repeats until nothing moves. If the bracket
//! is left with nothing playable and no champion, it closes the tournament
//! from the most advanced results.

use crate::advancement::{TransitionResult, finish, resolve};
use crate::bracket::{Bracket, MatchRef, Outcome};
use crate::error::AdvanceError;
use serde::{Deserialize, Serialize};
use tourney_domain::{BracketType, Match, TeamId};

/// What a sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Orphaned teams advanced by bye.
    pub advanced: usize,
    /// Set when the sweep had to close a stalled tournament.
    pub finalized: Option<Outcome>,
}

/// Returns true when the lone team of `m` can never receive an opponent.
///
/// A winners match is orphaned once every earlier winners round is done. A
/// losers match in round `r` is orphaned once no unfinished winners match
/// drops into round `r` or earlier and no earlier losers match still holds a
/// team.
#[must_use]
pub fn is_orphaned(bracket: &Bracket, m: &Match) -> bool {
    if m.lone_team().is_none() {
        return false;
    }
    let round: u32 = m.round_number;
    match m.bracket_type {
        BracketType::Winners => !bracket.matches().iter().any(|other| {
            other.bracket_type == BracketType::Winners
                && other.round_number < round
                && !other.is_completed()
        }),
        BracketType::Losers => {
            let winners_feed: bool = bracket.matches().iter().any(|other| {
                other.bracket_type == BracketType::Winners
                    && !other.is_completed()
                    && bracket.schedule().drop_round(other.round_number) <= round
            });
            let losers_feed: bool = bracket.matches().iter().any(|other| {
                other.bracket_type == BracketType::Losers
                    && other.round_number < round
                    && !other.is_completed()
                    && other.team_count() > 0
            });
            !winners_feed && !losers_feed
        }
        BracketType::GrandFinal | BracketType::FinalReset => false,
    }
}

/// The earliest orphaned match, by bracket section, round and match number.
#[must_use]
pub fn find_orphan(bracket: &Bracket) -> Option<MatchRef> {
    if bracket.is_finished() {
        return None;
    }
    bracket
        .match_refs()
        .filter(|r| is_orphaned(bracket, bracket.get(*r)))
        .min_by_key(|r| bracket.get(*r).position())
}

/// Resolves the earliest orphaned match as a bye.
///
/// Returns `None` when no match is orphaned.
///
/// # Errors
///
/// Returns an error if routing the advanced team fails.
pub fn resolve_next_orphan(
    bracket: &mut Bracket,
) -> Result<Option<TransitionResult>, AdvanceError> {
    let Some(orphan) = find_orphan(bracket) else {
        return Ok(None);
    };
    let Some(team) = bracket.get(orphan).lone_team() else {
        return Ok(None);
    };
    tracing::info!(
        tournament_id = %bracket.tournament_id(),
        label = %bracket.get(orphan).label(),
        team_id = %team,
        "Advancing orphaned team"
    );
    resolve(bracket, orphan, team, None).map(Some)
}

/// Closes a tournament that can make no further progress.
///
/// Nothing happens while any unfinished match holds two teams or once a
/// champion exists. Otherwise the winner of the most advanced completed
/// winners match becomes champion, and the runner-up is chosen by
/// [`Bracket::fallback_runner_up`].
///
/// # Errors
///
/// Returns an error if a team status cannot be updated.
pub fn finalize_if_stalled(bracket: &mut Bracket) -> Result<Option<Outcome>, AdvanceError> {
    if bracket.is_finished() || !bracket.playable_matches().is_empty() {
        return Ok(None);
    }
    let Some(champion) = bracket
        .last_completed(BracketType::Winners)
        .and_then(|r| bracket.get(r).winner)
    else {
        return Ok(None);
    };
    let runner_up: Option<TeamId> = bracket.fallback_runner_up(champion);
    let outcome: Outcome = Outcome {
        champion,
        runner_up,
    };
    tracing::warn!(
        tournament_id = %bracket.tournament_id(),
        champion = %champion,
        "Bracket stalled; closing from the most advanced results"
    );
    finish(bracket, outcome)?;
    Ok(Some(outcome))
}

/// Sweeps a bracket to a fixed point.
///
/// Running it again without an intervening result advances nobody.
///
/// # Errors
///
/// Returns an error if routing an advanced team fails. Teams advanced before
/// the failure stay advanced in the working set.
pub fn sweep(bracket: &mut Bracket) -> Result<SweepReport, AdvanceError> {
    let mut report: SweepReport = SweepReport::default();
    while resolve_next_orphan(bracket)?.is_some() {
        report.advanced += 1;
    }
    report.finalized = finalize_if_stalled(bracket)?;
    if report.advanced > 0 || report.finalized.is_some() {
        tracing::debug!(
            tournament_id = %bracket.tournament_id(),
            advanced = report.advanced,
            finalized = report.finalized.is_some(),
            "Sweep finished"
        );
    }
    Ok(report)
}
