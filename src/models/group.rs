//! Group-stage groups as drawn before scheduling.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// A round-robin group of 3 or 4 players within one division.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Unique within the division; seed patterns refer to groups by this number.
    pub group_id: u32,
    pub division: String,
    /// Draw order matters: it fixes who plays whom in which round.
    pub player_ids: Vec<PlayerId>,
}

impl Group {
    pub fn new(group_id: u32, division: impl Into<String>, player_ids: Vec<PlayerId>) -> Self {
        Self {
            group_id,
            division: division.into(),
            player_ids,
        }
    }
}
