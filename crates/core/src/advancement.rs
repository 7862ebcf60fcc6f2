// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The advancement state machine.
//!
//! [`apply`] validates a [`Command`] against the working set and only then
//! mutates it. Completing a match dispatches on its bracket section: winners
//! matches promote the winner and drop the loser into the losers bracket,
//! losers matches promote the winner and eliminate the loser, and the two
//! finals decide the champion or force a bracket reset.

use crate::bracket::{Bracket, MatchRef, Outcome};
use crate::command::Command;
use crate::error::AdvanceError;
use time::OffsetDateTime;
use tourney_domain::{
    BracketStatus, BracketType, Match, MatchId, MatchStatus, ScoringRules, TeamId,
    TournamentFormat, TournamentId,
};
use tourney_events::{BracketEvent, EventKind};

/// What a successful command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    /// The match the command targeted.
    pub match_ref: MatchRef,
    /// The recorded winner, if the match completed.
    pub winner: Option<TeamId>,
    /// The beaten team of a played match.
    pub loser: Option<TeamId>,
    /// True when the match completed without being played.
    pub bye: bool,
    /// Set when this command decided the tournament.
    pub outcome: Option<Outcome>,
}

/// Applies a command to a bracket.
///
/// Every check runs before the first mutation, so a rejected command leaves
/// the bracket exactly as it was.
///
/// # Arguments
///
/// * `bracket` - The working set of the match's tournament
/// * `command` - The command to apply
///
/// # Errors
///
/// Returns an error if:
/// - The tournament is already finished
/// - The match does not exist or is already completed
/// - The declared winner is not in the match
/// - A manual advance targets a match without exactly one team
/// - A start targets a match that is not pending with two teams
pub fn apply(bracket: &mut Bracket, command: &Command) -> Result<TransitionResult, AdvanceError> {
    if bracket.is_finished() {
        return Err(AdvanceError::TournamentCompleted(bracket.tournament_id()));
    }
    let match_id: MatchId = command.match_id();
    let match_ref: MatchRef = bracket
        .find_match(match_id)
        .ok_or(AdvanceError::MatchNotFound(match_id))?;

    match *command {
        Command::DeclareWinner { winner, .. } => {
            let loser: Option<TeamId> =
                validate_declaration(bracket, match_ref, match_id, winner)?;
            resolve(bracket, match_ref, winner, loser)
        }
        Command::ManualAdvance { .. } => {
            let m: &Match = bracket.get(match_ref);
            if m.is_completed() {
                return Err(AdvanceError::AlreadyCompleted(match_id));
            }
            let lone: TeamId = m.lone_team().ok_or(AdvanceError::NotAByeMatch {
                match_id,
                teams: m.team_count(),
            })?;
            bracket.status_of(lone)?;
            tracing::info!(match_id = %match_id, team_id = %lone, "Manual advance");
            resolve(bracket, match_ref, lone, None)
        }
        Command::StartMatch { .. } => start(bracket, match_ref, match_id),
    }
}

/// Checks a declaration and returns the loser, `None` for a bye.
fn validate_declaration(
    bracket: &Bracket,
    match_ref: MatchRef,
    match_id: MatchId,
    winner: TeamId,
) -> Result<Option<TeamId>, AdvanceError> {
    let m: &Match = bracket.get(match_ref);
    if m.is_completed() {
        return Err(AdvanceError::AlreadyCompleted(match_id));
    }
    if !m.has_team(winner) {
        return Err(AdvanceError::InvalidWinner {
            match_id,
            team_id: winner,
        });
    }
    bracket.status_of(winner)?;

    let loser: Option<TeamId> = m.opponent_of(winner);
    if let Some(loser) = loser {
        bracket.status_of(loser)?;
    }
    Ok(loser)
}

fn start(
    bracket: &mut Bracket,
    match_ref: MatchRef,
    match_id: MatchId,
) -> Result<TransitionResult, AdvanceError> {
    let m: &Match = bracket.get(match_ref);
    if m.is_completed() {
        return Err(AdvanceError::AlreadyCompleted(match_id));
    }
    if !m.is_ready_to_play() {
        return Err(AdvanceError::MatchNotReady(match_id));
    }

    let tournament_id: TournamentId = bracket.tournament_id();
    let started: &mut Match = bracket.match_mut(match_ref);
    started.status = MatchStatus::InProgress;
    started.started_at = Some(OffsetDateTime::now_utc());
    let message: String = format!("{} started", started.label());
    bracket.record(
        BracketEvent::new(EventKind::MatchStarted, tournament_id, message)
            .for_match(Some(match_id)),
    );

    Ok(TransitionResult {
        match_ref,
        winner: None,
        loser: None,
        bye: false,
        outcome: None,
    })
}

/// Completes a match and routes its teams.
///
/// `loser` is `None` for a bye: nothing is added to either team's record and
/// only the winner moves on.
pub(crate) fn resolve(
    bracket: &mut Bracket,
    match_ref: MatchRef,
    winner: TeamId,
    loser: Option<TeamId>,
) -> Result<TransitionResult, AdvanceError> {
    let tournament_id: TournamentId = bracket.tournament_id();
    let scoring: ScoringRules = bracket.tournament().scoring;

    let completed: &mut Match = bracket.match_mut(match_ref);
    completed.complete(winner, loser.is_none(), OffsetDateTime::now_utc());
    let finished: Match = completed.clone();

    // Record results of a played match only
    let event: BracketEvent = if let Some(loser) = loser {
        bracket.team_mut(winner)?.record_victory(&scoring);
        bracket.team_mut(loser)?.record_loss(&scoring);
        BracketEvent::new(
            EventKind::Victory,
            tournament_id,
            format!("{} won {}", team_name(bracket, winner), finished.label()),
        )
        .against(loser)
    } else {
        BracketEvent::new(
            EventKind::ByeAdvanced,
            tournament_id,
            format!(
                "{} advanced through {} by bye",
                team_name(bracket, winner),
                finished.label()
            ),
        )
    };
    bracket.record(event.for_match(finished.match_id).for_team(winner));

    tracing::info!(
        tournament_id = %tournament_id,
        label = %finished.label(),
        winner = %winner,
        loser = ?loser.map(|team| team.value()),
        bye = loser.is_none(),
        "Match completed"
    );

    let outcome: Option<Outcome> = match finished.bracket_type {
        BracketType::Winners => advance_from_winners(bracket, &finished, winner, loser)?,
        BracketType::Losers => advance_from_losers(bracket, &finished, winner, loser)?,
        BracketType::GrandFinal => settle_grand_final(bracket, winner, loser)?,
        BracketType::FinalReset => Some(Outcome {
            champion: winner,
            runner_up: loser.or_else(|| bracket.fallback_runner_up(winner)),
        }),
    };
    if let Some(outcome) = outcome {
        finish(bracket, outcome)?;
    }

    Ok(TransitionResult {
        match_ref,
        winner: Some(winner),
        loser,
        bye: loser.is_none(),
        outcome,
    })
}

fn advance_from_winners(
    bracket: &mut Bracket,
    finished: &Match,
    winner: TeamId,
    loser: Option<TeamId>,
) -> Result<Option<Outcome>, AdvanceError> {
    let round: u32 = finished.round_number;
    let is_last_round: bool = round >= bracket.winners_rounds();

    if bracket.format() == TournamentFormat::Single {
        if is_last_round {
            return Ok(Some(Outcome {
                champion: winner,
                runner_up: loser.or_else(|| bracket.fallback_runner_up(winner)),
            }));
        }
        bracket.place(BracketType::Winners, round + 1, winner)?;
        if let Some(loser) = loser {
            eliminate(bracket, loser, finished)?;
        }
        return Ok(None);
    }

    // Winner stays undefeated
    if is_last_round {
        seat_in_final(bracket, BracketType::GrandFinal, winner, true)?;
    } else {
        bracket.place(BracketType::Winners, round + 1, winner)?;
    }

    // Loser takes the first free seat at its drop round
    if let Some(loser) = loser {
        bracket.team_mut(loser)?.advance_status(BracketStatus::Losers)?;
        let target: u32 = bracket.schedule().drop_round(round);
        let seat: MatchRef = bracket.place(BracketType::Losers, target, loser)?;
        tracing::debug!(
            team_id = %loser,
            winners_round = round,
            losers_round = target,
            label = %bracket.get(seat).label(),
            "Dropped to losers bracket"
        );
    }
    Ok(None)
}

fn advance_from_losers(
    bracket: &mut Bracket,
    finished: &Match,
    winner: TeamId,
    loser: Option<TeamId>,
) -> Result<Option<Outcome>, AdvanceError> {
    let next_round: u32 = finished.round_number + 1;
    if next_round > bracket.max_losers_round() {
        seat_in_final(bracket, BracketType::GrandFinal, winner, false)?;
    } else {
        bracket.place(BracketType::Losers, next_round, winner)?;
    }

    if let Some(loser) = loser {
        eliminate(bracket, loser, finished)?;
    }
    Ok(None)
}

fn settle_grand_final(
    bracket: &mut Bracket,
    winner: TeamId,
    loser: Option<TeamId>,
) -> Result<Option<Outcome>, AdvanceError> {
    let Some(loser) = loser else {
        return Ok(Some(Outcome {
            champion: winner,
            runner_up: bracket.fallback_runner_up(winner),
        }));
    };

    // An undefeated winner takes the title outright
    if bracket.status_of(winner)? == BracketStatus::Winners {
        return Ok(Some(Outcome {
            champion: winner,
            runner_up: Some(loser),
        }));
    }

    // Otherwise both finalists have one loss and play again
    if bracket.status_of(loser)? == BracketStatus::Winners {
        bracket.team_mut(loser)?.advance_status(BracketStatus::Losers)?;
    }
    let reset: MatchRef = match bracket.final_match(BracketType::FinalReset) {
        Some(existing) => existing,
        None => bracket.create_match(BracketType::FinalReset, 1, None)?,
    };
    let rematch: &mut Match = bracket.match_mut(reset);
    rematch.team1 = Some(winner);
    rematch.team2 = Some(loser);
    let reset_id: Option<MatchId> = rematch.match_id;

    let tournament_id: TournamentId = bracket.tournament_id();
    let message: String = format!(
        "{} forced a bracket reset against {}",
        team_name(bracket, winner),
        team_name(bracket, loser)
    );
    bracket.record(
        BracketEvent::new(EventKind::BracketReset, tournament_id, message)
            .for_match(reset_id)
            .for_team(winner)
            .against(loser),
    );
    tracing::info!(tournament_id = %tournament_id, "Bracket reset");
    Ok(None)
}

/// Puts `team` into a final, preferring `team1` for the winners side.
fn seat_in_final(
    bracket: &mut Bracket,
    bracket_type: BracketType,
    team: TeamId,
    winners_side: bool,
) -> Result<MatchRef, AdvanceError> {
    let seat: MatchRef = match bracket.final_match(bracket_type) {
        Some(existing) => existing,
        None => bracket.create_match(bracket_type, 1, None)?,
    };
    let final_match: &mut Match = bracket.match_mut(seat);
    let preferred: &mut Option<TeamId> = if winners_side {
        &mut final_match.team1
    } else {
        &mut final_match.team2
    };
    if preferred.is_none() {
        *preferred = Some(team);
    } else if !final_match.fill_open_slot(team) {
        return Err(AdvanceError::SlotUnavailable {
            bracket_type,
            team_id: team,
        });
    }
    Ok(seat)
}

fn eliminate(bracket: &mut Bracket, team: TeamId, finished: &Match) -> Result<(), AdvanceError> {
    bracket.team_mut(team)?.advance_status(BracketStatus::Eliminated)?;
    let tournament_id: TournamentId = bracket.tournament_id();
    let message: String = format!(
        "{} was eliminated in {}",
        team_name(bracket, team),
        finished.label()
    );
    bracket.record(
        BracketEvent::new(EventKind::Eliminated, tournament_id, message)
            .for_match(finished.match_id)
            .for_team(team),
    );
    Ok(())
}

/// Closes the bracket: crowns the champion, marks the runner-up and
/// eliminates everyone else still alive.
pub(crate) fn finish(bracket: &mut Bracket, outcome: Outcome) -> Result<(), AdvanceError> {
    bracket
        .team_mut(outcome.champion)?
        .advance_status(BracketStatus::Champion)?;
    if let Some(runner_up) = outcome.runner_up {
        bracket
            .team_mut(runner_up)?
            .advance_status(BracketStatus::RunnerUp)?;
    }
    for team in bracket.alive_teams() {
        bracket
            .team_mut(team)?
            .advance_status(BracketStatus::Eliminated)?;
    }
    bracket.set_outcome(outcome);

    let tournament_id: TournamentId = bracket.tournament_id();
    let message: String = format!("{} won the tournament", team_name(bracket, outcome.champion));
    let mut event: BracketEvent =
        BracketEvent::new(EventKind::Champion, tournament_id, message).for_team(outcome.champion);
    if let Some(runner_up) = outcome.runner_up {
        event = event.against(runner_up);
    }
    bracket.record(event);

    tracing::info!(
        tournament_id = %tournament_id,
        champion = %outcome.champion,
        runner_up = ?outcome.runner_up.map(|team| team.value()),
        "Tournament decided"
    );
    Ok(())
}

fn team_name(bracket: &Bracket, team: TeamId) -> String {
    bracket
        .team(team)
        .map_or_else(|| format!("Team {team}"), |t| t.name.clone())
}
