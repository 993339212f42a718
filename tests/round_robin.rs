//! Integration tests for group play: fixtures, interleaving, slots and stage sizes.

mod common;

use common::{at, config, roster};
use std::collections::{BTreeMap, HashMap};
use table_tennis_tournament_web::{
    build_round_robin, Group, KnockoutRound, MatchId, Player, RoundType, ScheduleConfig,
    ScheduleError,
};

fn ids(m: &table_tennis_tournament_web::GameMatch) -> (String, String) {
    (m.players[0].id.clone(), m.players[1].id.clone())
}

#[test]
fn three_player_group_plays_every_pair_once() {
    let (groups, players) = roster("U15", 1, 3);
    let schedule = build_round_robin(&groups, &players, &config(4)).unwrap();

    let pairs: Vec<_> = schedule.matches.iter().map(ids).collect();
    assert_eq!(
        pairs,
        vec![
            ("U15-1-0".to_string(), "U15-1-2".to_string()),
            ("U15-1-0".to_string(), "U15-1-1".to_string()),
            ("U15-1-1".to_string(), "U15-1-2".to_string()),
        ]
    );

    let mut appearances: HashMap<String, usize> = HashMap::new();
    for (a, b) in pairs {
        *appearances.entry(a).or_default() += 1;
        *appearances.entry(b).or_default() += 1;
    }
    assert!(appearances.values().all(|&n| n == 2));
}

#[test]
fn four_player_group_uses_fixed_order() {
    let (groups, players) = roster("U15", 1, 4);
    let schedule = build_round_robin(&groups, &players, &config(4)).unwrap();

    let order: Vec<(usize, usize)> = schedule
        .matches
        .iter()
        .map(|m| {
            let idx = |p: &Player| p.id.rsplit('-').next().unwrap().parse::<usize>().unwrap();
            (idx(&m.players[0]), idx(&m.players[1]))
        })
        .collect();
    assert_eq!(order, vec![(0, 2), (3, 1), (0, 1), (2, 3), (0, 3), (1, 2)]);

    let mut appearances: HashMap<String, usize> = HashMap::new();
    for m in &schedule.matches {
        for p in &m.players {
            *appearances.entry(p.id.clone()).or_default() += 1;
        }
    }
    assert_eq!(appearances.len(), 4);
    assert!(appearances.values().all(|&n| n == 3));
    assert!(schedule.matches.iter().all(|m| m.round == RoundType::GroupPlay));
    assert!(schedule.matches.iter().all(|m| m.match_type == "Best of 3"));
    assert!(schedule.matches.iter().all(|m| m.next_match_id.is_none()));
}

#[test]
fn groups_are_interleaved_round_by_round() {
    let (mut groups, mut players) = roster("U15", 2, 4);
    groups.reverse();
    let (three, three_players) = roster("U18", 1, 3);
    // Group ids are only unique per division; U18's group 1 sorts with U15's group 1.
    groups.extend(three);
    players.extend(three_players);

    let schedule = build_round_robin(&groups, &players, &config(20)).unwrap();
    let sequence: Vec<(String, u32)> = schedule
        .matches
        .iter()
        .map(|m| (m.division.clone(), m.group))
        .collect();
    let u15 = |g| ("U15".to_string(), g);
    let u18 = ("U18".to_string(), 1);
    assert_eq!(
        sequence,
        vec![
            u15(1), u15(1), u18.clone(), u15(2), u15(2),
            u15(1), u15(1), u18.clone(), u15(2), u15(2),
            u15(1), u15(1), u18, u15(2), u15(2),
        ]
    );
}

#[test]
fn match_ids_are_contiguous_from_0001() {
    let (mut groups, mut players) = roster("U15", 3, 4);
    let (more, more_players) = roster("U21", 2, 3);
    groups.extend(more);
    players.extend(more_players);

    let schedule = build_round_robin(&groups, &players, &config(6)).unwrap();
    assert_eq!(schedule.matches.len(), 3 * 6 + 2 * 3);
    for (i, m) in schedule.matches.iter().enumerate() {
        assert_eq!(m.match_id, MatchId(i as u32 + 1));
    }
    assert_eq!(schedule.matches[0].match_id.to_string(), "0001");
    assert_eq!(schedule.matches[23].match_id.to_string(), "0024");
}

#[test]
fn tables_cycle_and_time_advances_on_wrap() {
    let (groups, players) = roster("U15", 2, 4);
    let schedule = build_round_robin(&groups, &players, &config(4)).unwrap();

    let tables: Vec<u32> = schedule.matches.iter().map(|m| m.table.unwrap()).collect();
    assert_eq!(tables, vec![1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    let times: Vec<_> = schedule.matches.iter().map(|m| m.time.unwrap()).collect();
    assert!(times[0..4].iter().all(|t| *t == at(8, 30)));
    assert!(times[4..8].iter().all(|t| *t == at(8, 55)));
    assert!(times[8..12].iter().all(|t| *t == at(9, 20)));

    let last = schedule.last_slot.unwrap();
    assert_eq!(last.table, 4);
    assert_eq!(last.time, at(9, 20));
}

#[test]
fn knockout_stage_size_follows_group_count() {
    let cases = [
        (1, KnockoutRound::Quarterfinal),
        (4, KnockoutRound::Quarterfinal),
        (5, KnockoutRound::RoundOf16),
        (8, KnockoutRound::RoundOf16),
        (9, KnockoutRound::RoundOf32),
        (16, KnockoutRound::RoundOf32),
        (17, KnockoutRound::RoundOf64),
        (32, KnockoutRound::RoundOf64),
    ];
    for (count, expected) in cases {
        assert_eq!(KnockoutRound::for_group_count(count).unwrap(), expected, "{count} groups");

        let (groups, players) = roster("Open", count as u32, 3);
        let schedule = build_round_robin(&groups, &players, &config(12)).unwrap();
        let stage = &schedule.stages["Open"];
        assert_eq!(stage.initial_stage_size, expected);
        assert_eq!(stage.current_stage_size, Some(expected));
    }
    assert_eq!(
        KnockoutRound::for_group_count(33),
        Err(ScheduleError::TooManyGroups { groups: 33 })
    );
}

#[test]
fn same_input_gives_identical_schedule() {
    let (groups, players) = roster("U21", 5, 4);
    let first = build_round_robin(&groups, &players, &config(7)).unwrap();
    let second = build_round_robin(&groups, &players, &config(7)).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn rejects_bad_input() {
    let (groups, players) = roster("U15", 1, 5);
    assert_eq!(
        build_round_robin(&groups, &players, &config(4)),
        Err(ScheduleError::UnsupportedGroupSize { group_id: 1, size: 5 })
    );

    let (groups, _) = roster("U15", 1, 3);
    assert_eq!(
        build_round_robin(&groups, &BTreeMap::new(), &config(4)),
        Err(ScheduleError::UnknownPlayer {
            group_id: 1,
            player_id: "U15-1-0".to_string()
        })
    );

    let (mut groups, players) = roster("U15", 1, 3);
    groups.push(Group::new(1, "U15", groups[0].player_ids.clone()));
    assert_eq!(
        build_round_robin(&groups, &players, &config(4)),
        Err(ScheduleError::DuplicateGroup {
            division: "U15".to_string(),
            group_id: 1
        })
    );

    assert_eq!(
        ScheduleConfig::new(0, common::day()),
        Err(ScheduleError::InvalidTableCount)
    );
}
