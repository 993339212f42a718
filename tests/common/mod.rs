//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use table_tennis_tournament_web::{
    generate_schedule, Group, PatternTemplate, Player, PlayerId, ScheduleConfig, Tournament,
};

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).unwrap()
}

pub fn config(tables: u32) -> ScheduleConfig {
    ScheduleConfig::new(tables, day()).unwrap()
}

/// `groups` groups of `size` players in `division`, numbered from 1.
pub fn roster(division: &str, groups: u32, size: usize) -> (Vec<Group>, BTreeMap<PlayerId, Player>) {
    let mut out = Vec::new();
    let mut players = BTreeMap::new();
    for g in 1..=groups {
        let ids: Vec<PlayerId> = (0..size).map(|p| format!("{division}-{g}-{p}")).collect();
        for (i, id) in ids.iter().enumerate() {
            let player = Player::new(id.clone(), format!("P{i}"), format!("G{g}"), 100.0 - i as f64);
            players.insert(id.clone(), player);
        }
        out.push(Group::new(g, division, ids));
    }
    (out, players)
}

/// A tournament with group play already generated.
pub fn scheduled_tournament(division: &str, groups: u32, size: usize, tables: u32, seed: u64) -> Tournament {
    let patterns = PatternTemplate::standard().materialize_seeded(seed);
    let mut t = Tournament::new("Open", config(tables), patterns);
    let (groups, players) = roster(division, groups, size);
    t.set_roster(groups, players);
    generate_schedule(&mut t).unwrap();
    t
}
