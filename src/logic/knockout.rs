//! Knockout stage entry point: seed the first round or advance to the next one.

use crate::config::ScheduleConfig;
use crate::logic::advance::advance_round;
use crate::logic::allocator::AllocatorState;
use crate::logic::seeding::seed_first_round;
use crate::models::{
    Group, KnockoutPatterns, KnockoutRound, MatchId, RoundNames, Schedule, ScheduleError, Tournament,
};
use serde::Serialize;

/// Fixed tournament data a knockout call reads but never changes.
#[derive(Clone, Copy, Debug)]
pub struct KnockoutContext<'a> {
    pub config: &'a ScheduleConfig,
    pub patterns: &'a KnockoutPatterns,
    pub round_names: &'a RoundNames,
    pub groups: &'a [Group],
}

/// What one knockout call added to the schedule.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundSummary {
    pub division: String,
    pub round: KnockoutRound,
    /// New matches, in schedule order.
    pub created: Vec<MatchId>,
    /// How many of them are walkovers without table and time.
    pub walkovers: usize,
}

/// Generate the next knockout round for `division`.
///
/// The first call after group play seeds the bracket from the seed patterns; every
/// later call pairs the previous round's matches in order until the final is
/// scheduled. On error the schedule is left as it was.
pub fn advance_knockout(
    schedule: &mut Schedule,
    division: &str,
    ctx: &KnockoutContext<'_>,
) -> Result<RoundSummary, ScheduleError> {
    if division.trim().is_empty() {
        return Err(ScheduleError::MissingDivision);
    }
    let mut stage = schedule
        .stages
        .get(division)
        .cloned()
        .ok_or_else(|| ScheduleError::UnknownDivision(division.to_string()))?;
    let current = stage
        .current_stage_size
        .ok_or_else(|| ScheduleError::KnockoutComplete(division.to_string()))?;

    let mut allocator = AllocatorState::resume(ctx.config, schedule);
    let summary = if stage.awaiting_seeding() {
        seed_first_round(schedule, &mut stage, division, current, ctx, &mut allocator)?
    } else {
        advance_round(schedule, &mut stage, division, current, ctx, &mut allocator)?
    };
    stage.current_stage_size = current.next();
    schedule.stages.insert(division.to_string(), stage);

    log::info!(
        "Generated {} {} matches for {} ({} walkovers)",
        summary.created.len(),
        ctx.round_names.name(summary.round),
        division,
        summary.walkovers
    );
    Ok(summary)
}

/// Generate the next knockout round of `division` in the tournament's schedule.
pub fn generate_knockout_round(
    tournament: &mut Tournament,
    division: &str,
) -> Result<RoundSummary, ScheduleError> {
    let ctx = KnockoutContext {
        config: &tournament.config,
        patterns: &tournament.patterns,
        round_names: &tournament.round_names,
        groups: &tournament.groups,
    };
    let schedule = tournament.schedule.as_mut().ok_or(ScheduleError::NoSchedule)?;
    advance_knockout(schedule, division, &ctx)
}
