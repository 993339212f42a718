//! Match-slot allocation: sequential ids, round-robin tables, time advancing on wrap.

use crate::config::ScheduleConfig;
use crate::models::{GameMatch, MatchId, Player, RoundType, Schedule, Slot};
use chrono::{Duration, NaiveDateTime};

/// Running state of one generation pass.
///
/// Every new match takes the next id. A played match takes the table after the
/// last played one; when that passes `table_count` it goes back to table 1 one
/// slot later. Walkovers get no table and no time and leave the slot untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllocatorState {
    pub table_count: u32,
    pub slot_length: Duration,
    /// Used when nothing has been played yet.
    pub first_time: NaiveDateTime,
    pub last_slot: Option<Slot>,
    pub next_id: MatchId,
}

impl AllocatorState {
    /// Fresh state for an empty schedule: first match gets id 0001, table 1, first slot.
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            table_count: config.table_count,
            slot_length: config.slot_length(),
            first_time: config.first_slot(),
            last_slot: None,
            next_id: MatchId(1),
        }
    }

    /// Continue after everything already in `schedule`.
    pub fn resume(config: &ScheduleConfig, schedule: &Schedule) -> Self {
        Self {
            last_slot: schedule.last_played_slot().or(schedule.last_slot),
            next_id: schedule.last_match_id().map_or(MatchId(1), MatchId::next),
            ..Self::new(config)
        }
    }

    /// Next physical slot after the last one used.
    fn next_slot(&self) -> Slot {
        match self.last_slot {
            None => Slot {
                time: self.first_time,
                table: 1,
            },
            Some(last) if last.table + 1 > self.table_count => Slot {
                time: last.time + self.slot_length,
                table: 1,
            },
            Some(last) => Slot {
                time: last.time,
                table: last.table + 1,
            },
        }
    }

    /// Build the next match. BYE pairings become walkovers without a slot.
    pub fn allocate(
        &mut self,
        players: [Player; 2],
        group: u32,
        division: String,
        round: RoundType,
        match_type: &str,
    ) -> GameMatch {
        let match_id = self.next_id;
        self.next_id = match_id.next();

        let slot = if players.iter().any(Player::is_bye) {
            None
        } else {
            let slot = self.next_slot();
            self.last_slot = Some(slot);
            Some(slot)
        };

        GameMatch {
            match_id,
            time: slot.map(|s| s.time),
            table: slot.map(|s| s.table),
            players,
            group,
            division,
            round,
            next_match_id: None,
            match_type: match_type.to_string(),
        }
    }

    /// Id the next allocated match will get.
    pub fn peek_id(&self) -> MatchId {
        self.next_id
    }
}
