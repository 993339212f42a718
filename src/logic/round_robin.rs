//! Group stage: round-robin fixtures interleaved across groups.

use crate::config::ScheduleConfig;
use crate::logic::allocator::AllocatorState;
use crate::models::{
    DivisionStage, Group, KnockoutRound, Player, PlayerId, RoundType, Schedule, ScheduleError,
    Tournament,
};
use std::collections::{BTreeMap, BTreeSet};

/// Fixture order for a group of three: every pair once.
const THREE_PLAYER_FIXTURES: [[usize; 2]; 3] = [[0, 2], [0, 1], [1, 2]];

/// Fixture order for a group of four: every pair once, two per round.
const FOUR_PLAYER_FIXTURES: [[usize; 2]; 6] = [[0, 2], [3, 1], [0, 1], [2, 3], [0, 3], [1, 2]];

/// Group play always spans three rounds.
const ROUNDS: usize = 3;

/// One group-play pairing waiting for a slot.
struct Fixture<'a> {
    players: [Player; 2],
    group: &'a Group,
}

/// Fixtures of one group, in play order.
fn group_fixtures<'a>(
    group: &'a Group,
    players: &BTreeMap<PlayerId, Player>,
) -> Result<Vec<Fixture<'a>>, ScheduleError> {
    let order: &[[usize; 2]] = match group.player_ids.len() {
        3 => &THREE_PLAYER_FIXTURES,
        4 => &FOUR_PLAYER_FIXTURES,
        size => {
            return Err(ScheduleError::UnsupportedGroupSize {
                group_id: group.group_id,
                size,
            })
        }
    };
    let roster = group
        .player_ids
        .iter()
        .map(|id| {
            players.get(id).cloned().ok_or_else(|| ScheduleError::UnknownPlayer {
                group_id: group.group_id,
                player_id: id.clone(),
            })
        })
        .collect::<Result<Vec<Player>, _>>()?;

    Ok(order
        .iter()
        .map(|&[a, b]| Fixture {
            players: [roster[a].clone(), roster[b].clone()],
            group,
        })
        .collect())
}

/// Generate the full group-play schedule.
///
/// Groups are taken in ascending `group_id`. Each group's fixtures are split over
/// three rounds (one match per round for three players, two for four), and the
/// schedule walks round by round so no group plays twice in a row. Also sets up
/// each division's knockout stage from its group count.
pub fn build_round_robin(
    groups: &[Group],
    players: &BTreeMap<PlayerId, Player>,
    config: &ScheduleConfig,
) -> Result<Schedule, ScheduleError> {
    if config.table_count == 0 {
        return Err(ScheduleError::InvalidTableCount);
    }

    let mut sorted: Vec<&Group> = groups.iter().collect();
    sorted.sort_by_key(|g| g.group_id);

    let mut seen = BTreeSet::new();
    for g in &sorted {
        if !seen.insert((g.division.as_str(), g.group_id)) {
            return Err(ScheduleError::DuplicateGroup {
                division: g.division.clone(),
                group_id: g.group_id,
            });
        }
    }

    let mut rounds: [Vec<Fixture<'_>>; ROUNDS] = Default::default();
    for &group in &sorted {
        let fixtures = group_fixtures(group, players)?;
        let per_round = fixtures.len() / ROUNDS;
        for (i, fixture) in fixtures.into_iter().enumerate() {
            rounds[i / per_round].push(fixture);
        }
    }

    let mut stages = BTreeMap::new();
    let mut group_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for g in &sorted {
        *group_counts.entry(g.division.as_str()).or_default() += 1;
    }
    for (division, count) in group_counts {
        let bracket = KnockoutRound::for_group_count(count)?;
        log::debug!("Division {} has {} groups, knockout starts at {}", division, count, bracket.size());
        stages.insert(division.to_string(), DivisionStage::new(bracket));
    }

    let mut allocator = AllocatorState::new(config);
    let matches: Vec<_> = rounds
        .into_iter()
        .flatten()
        .map(|f| {
            allocator.allocate(
                f.players,
                f.group.group_id,
                f.group.division.clone(),
                RoundType::GroupPlay,
                &config.match_type,
            )
        })
        .collect();

    log::info!(
        "Scheduled {} group matches for {} groups on {} tables",
        matches.len(),
        sorted.len(),
        config.table_count
    );

    Ok(Schedule {
        matches,
        stages,
        last_slot: allocator.last_slot,
    })
}

/// Generate group play for the tournament's roster, replacing any earlier schedule.
pub fn generate_schedule(tournament: &mut Tournament) -> Result<(), ScheduleError> {
    let schedule = build_round_robin(&tournament.groups, &tournament.players, &tournament.config)?;
    tournament.schedule = Some(schedule);
    Ok(())
}
