//! Scheduled match, its id, slot and the phase it belongs to.

use crate::models::bracket::KnockoutRound;
use crate::models::player::Player;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sequential match number. Shown and stored zero-padded to 4 digits ("0007").
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MatchId(pub u32);

impl MatchId {
    pub fn next(self) -> Self {
        MatchId(self.0 + 1)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for MatchId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(MatchId)
    }
}

impl Serialize for MatchId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One side of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }
}

/// Phase of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    GroupPlay,
    Knockout(KnockoutRound),
}

/// A physical allocation: when and on which table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub time: NaiveDateTime,
    pub table: u32,
}

/// A single scheduled match between two player entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub match_id: MatchId,
    /// None for a walkover (no physical match is played).
    pub time: Option<NaiveDateTime>,
    /// None for a walkover.
    pub table: Option<u32>,
    pub players: [Player; 2],
    /// Originating group id in group play, bracket size in knockout rounds.
    pub group: u32,
    /// Division name, or "<division> <round name>" in knockout rounds.
    pub division: String,
    pub round: RoundType,
    /// Match the winner of this one feeds into, once that match exists.
    pub next_match_id: Option<MatchId>,
    pub match_type: String,
}

impl GameMatch {
    /// The slot this match occupies, if it is played at all.
    pub fn slot(&self) -> Option<Slot> {
        match (self.time, self.table) {
            (Some(time), Some(table)) => Some(Slot { time, table }),
            _ => None,
        }
    }

    pub fn is_walkover(&self) -> bool {
        self.players.iter().any(Player::is_bye)
    }

    /// The player already marked as winner, if any.
    pub fn winner(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_winner.is_winner())
    }

    /// Set the forward pointer on this match and on its decided winner.
    pub fn link_next(&mut self, next: MatchId) {
        self.next_match_id = Some(next);
        for p in self.players.iter_mut().filter(|p| p.is_winner.is_winner()) {
            p.next_match_id = Some(next);
        }
    }
}
