//! Knockout rounds by bracket size, and their display names.

use crate::models::tournament::ScheduleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single-elimination round, identified by the number of slots it has.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum KnockoutRound {
    RoundOf64,
    RoundOf32,
    RoundOf16,
    Quarterfinal,
    Semifinal,
    Final,
}

impl KnockoutRound {
    /// Every round, largest first.
    pub const ALL: [KnockoutRound; 6] = [
        KnockoutRound::RoundOf64,
        KnockoutRound::RoundOf32,
        KnockoutRound::RoundOf16,
        KnockoutRound::Quarterfinal,
        KnockoutRound::Semifinal,
        KnockoutRound::Final,
    ];

    pub fn size(self) -> u32 {
        match self {
            KnockoutRound::RoundOf64 => 64,
            KnockoutRound::RoundOf32 => 32,
            KnockoutRound::RoundOf16 => 16,
            KnockoutRound::Quarterfinal => 8,
            KnockoutRound::Semifinal => 4,
            KnockoutRound::Final => 2,
        }
    }

    /// The round played after this one; None after the final.
    pub fn next(self) -> Option<KnockoutRound> {
        let idx = Self::ALL.iter().position(|r| *r == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    /// The round played before this one; None for the largest bracket.
    pub fn previous(self) -> Option<KnockoutRound> {
        let idx = Self::ALL.iter().position(|r| *r == self)?;
        idx.checked_sub(1).map(|i| Self::ALL[i])
    }

    /// First knockout bracket for a division with `groups` groups.
    ///
    /// Up to 4 groups seed an 8-bracket, 5-8 a 16-bracket, 9-16 a 32-bracket
    /// and 17-32 a 64-bracket.
    pub fn for_group_count(groups: usize) -> Result<KnockoutRound, ScheduleError> {
        match groups {
            0..=4 => Ok(KnockoutRound::Quarterfinal),
            5..=8 => Ok(KnockoutRound::RoundOf16),
            9..=16 => Ok(KnockoutRound::RoundOf32),
            17..=32 => Ok(KnockoutRound::RoundOf64),
            _ => Err(ScheduleError::TooManyGroups { groups }),
        }
    }
}

impl TryFrom<u32> for KnockoutRound {
    type Error = ScheduleError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.size() == size)
            .ok_or(ScheduleError::UnknownRoundSize(size))
    }
}

impl From<KnockoutRound> for u32 {
    fn from(round: KnockoutRound) -> u32 {
        round.size()
    }
}

/// Display names for knockout rounds, injected from tournament configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<KnockoutRound, String>")]
pub struct RoundNames(BTreeMap<KnockoutRound, String>);

impl From<BTreeMap<KnockoutRound, String>> for RoundNames {
    fn from(overrides: BTreeMap<KnockoutRound, String>) -> Self {
        Self::with_overrides(overrides)
    }
}

impl Default for RoundNames {
    fn default() -> Self {
        let names = [
            (KnockoutRound::RoundOf64, "Round of 64"),
            (KnockoutRound::RoundOf32, "Round of 32"),
            (KnockoutRound::RoundOf16, "Round of 16"),
            (KnockoutRound::Quarterfinal, "Quarterfinal"),
            (KnockoutRound::Semifinal, "Semifinal"),
            (KnockoutRound::Final, "Final"),
        ];
        Self(names.into_iter().map(|(r, n)| (r, n.to_string())).collect())
    }
}

impl RoundNames {
    /// Defaults, overridden by whatever names are given.
    pub fn with_overrides(overrides: impl IntoIterator<Item = (KnockoutRound, String)>) -> Self {
        let mut names = Self::default();
        names.0.extend(overrides);
        names
    }

    pub fn name(&self, round: KnockoutRound) -> &str {
        self.0.get(&round).map(String::as_str).unwrap_or_default()
    }

    /// Division label carried by every match of `round`, e.g. "U21 Quarterfinal".
    pub fn label(&self, division: &str, round: KnockoutRound) -> String {
        format!("{} {}", division, self.name(round))
    }
}
