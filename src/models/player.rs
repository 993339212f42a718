//! Player entries as they appear inside scheduled matches.

use crate::models::game::MatchId;
use serde::{Deserialize, Serialize};

/// Identifier of a rostered player (document id from the store).
pub type PlayerId = String;

/// First name of the synthetic opponent that fills an empty bracket slot.
pub const BYE_NAME: &str = "BYE";

/// Outcome of the match a player is currently scheduled in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinnerStatus {
    /// Scheduled but not played yet.
    #[default]
    Pending,
    /// Played (or walked over); `true` for the winner.
    Decided(bool),
}

impl WinnerStatus {
    pub fn is_winner(self) -> bool {
        self == WinnerStatus::Decided(true)
    }
}

/// A player slot in a match: a rostered player, a bracket placeholder, or the BYE.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub id: PlayerId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Ranking points; higher is better.
    #[serde(default)]
    pub rank_score: f64,
    /// Group label, empty when the player is not tied to a group.
    #[serde(default)]
    pub group: String,
    /// 1-based finishing position within the group, 0 when unknown.
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub is_winner: WinnerStatus,
    #[serde(default)]
    pub next_match_id: Option<MatchId>,
}

impl Player {
    /// A rostered player.
    pub fn new(
        id: impl Into<PlayerId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        rank_score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            rank_score,
            group: String::new(),
            rank: 0,
            is_winner: WinnerStatus::Pending,
            next_match_id: None,
        }
    }

    /// Placeholder for whoever finishes `rank` in group `group`.
    pub fn seeded(rank: u32, group: u32) -> Self {
        Self {
            group: group.to_string(),
            rank,
            ..Self::new("", format!("Rank {rank} Group {group}"), "", 0.0)
        }
    }

    /// Placeholder for the winner of an earlier match.
    pub fn winner_of(match_id: MatchId) -> Self {
        Self::new("", format!("Winner of Match {match_id}"), "", 0.0)
    }

    /// The synthetic opponent of an empty bracket slot. Never wins.
    pub fn bye() -> Self {
        Self {
            is_winner: WinnerStatus::Decided(false),
            ..Self::new("", BYE_NAME, "", 0.0)
        }
    }

    /// Take over who `other` is while keeping this entry's label and status.
    pub fn assume_identity(&mut self, other: &Player) {
        self.id = other.id.clone();
        self.rank_score = other.rank_score;
        self.group = other.group.clone();
        self.rank = other.rank;
    }

    pub fn is_bye(&self) -> bool {
        self.first_name == BYE_NAME
    }

    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}
