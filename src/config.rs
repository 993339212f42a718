//! Scheduling configuration: tables, day start and slot cadence.

use crate::models::ScheduleError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Tables available when the tournament does not say otherwise.
pub const DEFAULT_TABLE_COUNT: u32 = 12;

/// Minutes between two consecutive time slots. Used for group play and knockout rounds alike.
pub const SLOT_MINUTES: u32 = 25;

/// Format every generated match is played in.
pub const DEFAULT_MATCH_TYPE: &str = "Best of 3";

/// First match of the day starts at 08:30.
pub fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 30, 0).unwrap_or(NaiveTime::MIN)
}

/// How matches are spread over tables and time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Number of physical tables; table numbers run 1..=table_count.
    pub table_count: u32,
    /// Tournament day the schedule is laid out on.
    pub day: NaiveDate,
    #[serde(default = "default_start_time")]
    pub start_time: NaiveTime,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default = "default_match_type")]
    pub match_type: String,
}

fn default_slot_minutes() -> u32 {
    SLOT_MINUTES
}

fn default_match_type() -> String {
    DEFAULT_MATCH_TYPE.to_string()
}

impl ScheduleConfig {
    /// Config with default start, cadence and match type. Rejects a zero table count.
    pub fn new(table_count: u32, day: NaiveDate) -> Result<Self, ScheduleError> {
        Self {
            table_count,
            day,
            start_time: default_start_time(),
            slot_minutes: SLOT_MINUTES,
            match_type: DEFAULT_MATCH_TYPE.to_string(),
        }
        .validated()
    }

    /// Check a config that came in from outside (e.g. deserialized from a request).
    pub fn validated(self) -> Result<Self, ScheduleError> {
        if self.table_count == 0 {
            return Err(ScheduleError::InvalidTableCount);
        }
        Ok(self)
    }

    pub fn with_slot_minutes(mut self, minutes: u32) -> Self {
        self.slot_minutes = minutes;
        self
    }

    /// Time of the very first slot of the day.
    pub fn first_slot(&self) -> NaiveDateTime {
        self.day.and_time(self.start_time)
    }

    pub fn slot_length(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_minutes))
    }
}
