//! First knockout round: placements from group standings, per seed pattern.

use crate::logic::allocator::AllocatorState;
use crate::logic::knockout::{KnockoutContext, RoundSummary};
use crate::models::{
    ByeAdvance, DivisionStage, KnockoutRound, Player, RoundType, Schedule, ScheduleError, SeedSlot,
    WinnerStatus,
};
use std::collections::BTreeSet;

/// Placeholder for a pattern slot: the group placement, or BYE if the group does not exist.
fn resolve_slot(slot: &SeedSlot, groups: &BTreeSet<u32>) -> Player {
    match slot.group {
        Some(g) if groups.contains(&g) => Player::seeded(slot.rank, g),
        _ => Player::bye(),
    }
}

/// Build the division's first knockout round.
///
/// Bye count is the bracket size minus two qualifiers per group. Pairs are placed in
/// pattern order; a real placement facing a BYE wins immediately and is queued on
/// the stage as a bye winner.
pub(crate) fn seed_first_round(
    schedule: &mut Schedule,
    stage: &mut DivisionStage,
    division: &str,
    bracket: KnockoutRound,
    ctx: &KnockoutContext<'_>,
    allocator: &mut AllocatorState,
) -> Result<RoundSummary, ScheduleError> {
    if !schedule.has_group_play(division) {
        return Err(ScheduleError::RoundRobinMissing(division.to_string()));
    }

    let groups: BTreeSet<u32> = ctx
        .groups
        .iter()
        .filter(|g| g.division == division)
        .map(|g| g.group_id)
        .collect();
    let qualifiers = u32::try_from(groups.len() * 2).unwrap_or(u32::MAX);
    let byes = bracket.size().saturating_sub(qualifiers);
    let (pattern, fallback) = ctx.patterns.lookup(bracket, byes)?;
    if fallback {
        log::warn!(
            "No {} bracket pattern with {} byes for {}, using the no-bye pattern",
            bracket.size(),
            byes,
            division
        );
    }

    let label = ctx.round_names.label(division, bracket);
    let mut created = Vec::with_capacity(pattern.len());
    let mut walkovers = 0;
    let mut bye_winners = Vec::new();

    for [a, b] in pattern {
        let mut players = [resolve_slot(a, &groups), resolve_slot(b, &groups)];
        let advancing = match (players[0].is_bye(), players[1].is_bye()) {
            (true, false) => Some(1),
            (false, true) => Some(0),
            _ => None,
        };
        if let Some(i) = advancing {
            players[i].is_winner = WinnerStatus::Decided(true);
        }

        let m = allocator.allocate(
            players,
            bracket.size(),
            label.clone(),
            RoundType::Knockout(bracket),
            &ctx.config.match_type,
        );
        if m.is_walkover() {
            walkovers += 1;
        }
        if let Some(i) = advancing {
            bye_winners.push(ByeAdvance {
                match_id: m.match_id,
                player: m.players[i].clone(),
            });
        }
        created.push(m.match_id);
        schedule.matches.push(m);
    }

    stage.bye_winners = bye_winners;
    Ok(RoundSummary {
        division: division.to_string(),
        round: bracket,
        created,
        walkovers,
    })
}
