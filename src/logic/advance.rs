//! Later knockout rounds: pair the previous round's matches in bracket order.

use crate::logic::allocator::AllocatorState;
use crate::logic::knockout::{KnockoutContext, RoundSummary};
use crate::models::{
    ByeAdvance, DivisionStage, GameMatch, KnockoutRound, MatchId, Player, RoundType, Schedule,
    ScheduleError, WinnerStatus,
};
use std::collections::BTreeSet;

/// Entry for the winner of `prev`. Carries the winner's identity when it is already known.
fn advancing_player(prev: &GameMatch) -> Player {
    let mut p = Player::winner_of(prev.match_id);
    if let Some(w) = prev.winner() {
        p.assume_identity(w);
    }
    p
}

/// A queued bye winner re-entering the bracket for its next match.
fn fresh_entry(advance: &ByeAdvance) -> Player {
    Player {
        is_winner: WinnerStatus::Pending,
        next_match_id: None,
        ..advance.player.clone()
    }
}

fn link(schedule: &mut Schedule, from: MatchId, to: MatchId) {
    if let Some(m) = schedule.get_mut(from) {
        m.link_next(to);
    }
}

/// Build round `target` from the round before it.
///
/// Matches of the previous round are paired by list position (1st with 2nd, 3rd with
/// 4th, ...), never re-sorted, and each pair's matches get their `next_match_id`
/// pointed at the new match. Before the final, queued bye winners whose walkover
/// was not part of that pairing are paired among themselves into the same round.
pub(crate) fn advance_round(
    schedule: &mut Schedule,
    stage: &mut DivisionStage,
    division: &str,
    target: KnockoutRound,
    ctx: &KnockoutContext<'_>,
    allocator: &mut AllocatorState,
) -> Result<RoundSummary, ScheduleError> {
    let previous = target.previous().ok_or(ScheduleError::NoPreviousRound {
        division: division.to_string(),
        round: target,
    })?;
    let previous_ids = schedule.round_match_ids(&ctx.round_names.label(division, previous), previous);
    if previous_ids.is_empty() {
        return Err(ScheduleError::NoPreviousRound {
            division: division.to_string(),
            round: previous,
        });
    }
    if previous_ids.len() % 2 != 0 {
        return Err(ScheduleError::OddMatchCount {
            division: division.to_string(),
            round: previous,
            count: previous_ids.len(),
        });
    }

    let label = ctx.round_names.label(division, target);
    let mut created = Vec::with_capacity(previous_ids.len() / 2);

    for pair in previous_ids.chunks_exact(2) {
        let (a, b) = (pair[0], pair[1]);
        let next_id = allocator.peek_id();
        let first = advancing_player(schedule.get(a).ok_or(ScheduleError::MatchNotFound(a))?);
        let second = advancing_player(schedule.get(b).ok_or(ScheduleError::MatchNotFound(b))?);
        link(schedule, a, next_id);
        link(schedule, b, next_id);

        let m = allocator.allocate(
            [first, second],
            target.size(),
            label.clone(),
            RoundType::Knockout(target),
            &ctx.config.match_type,
        );
        created.push(m.match_id);
        schedule.matches.push(m);
    }

    let paired: BTreeSet<MatchId> = previous_ids.into_iter().collect();
    let leftovers: Vec<ByeAdvance> = std::mem::take(&mut stage.bye_winners)
        .into_iter()
        .filter(|b| !paired.contains(&b.match_id))
        .collect();
    if target.next().is_some() {
        for chunk in leftovers.chunks(2) {
            let next_id = allocator.peek_id();
            let first = fresh_entry(&chunk[0]);
            let second = chunk
                .get(1)
                .map(fresh_entry)
                .unwrap_or_else(|| Player::winner_of(next_id));
            for b in chunk {
                link(schedule, b.match_id, next_id);
            }
            log::debug!("Pairing leftover bye winners into match {}", next_id);

            let m = allocator.allocate(
                [first, second],
                target.size(),
                label.clone(),
                RoundType::Knockout(target),
                &ctx.config.match_type,
            );
            created.push(m.match_id);
            schedule.matches.push(m);
        }
    }

    let walkovers = created
        .iter()
        .filter(|id| schedule.get(**id).is_some_and(GameMatch::is_walkover))
        .count();
    Ok(RoundSummary {
        division: division.to_string(),
        round: target,
        created,
        walkovers,
    })
}
