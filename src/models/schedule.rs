//! The schedule being built: all matches so far plus per-division knockout progress.

use crate::models::bracket::KnockoutRound;
use crate::models::game::{GameMatch, MatchId, RoundType, Slot};
use crate::models::player::Player;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A player who advanced through a walkover, remembered until the next round is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ByeAdvance {
    /// The walkover match the player won.
    pub match_id: MatchId,
    pub player: Player,
}

/// Knockout progress of one division.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DivisionStage {
    /// Bracket size fixed at draw time.
    pub initial_stage_size: KnockoutRound,
    /// Next round to generate. None once the final has been scheduled.
    pub current_stage_size: Option<KnockoutRound>,
    #[serde(default)]
    pub bye_winners: Vec<ByeAdvance>,
}

impl DivisionStage {
    pub fn new(initial: KnockoutRound) -> Self {
        Self {
            initial_stage_size: initial,
            current_stage_size: Some(initial),
            bye_winners: Vec::new(),
        }
    }

    /// Current stage as a slot count; 1 means the final is already scheduled.
    pub fn current_size(&self) -> u32 {
        self.current_stage_size.map_or(1, KnockoutRound::size)
    }

    /// True until the first knockout round has been generated.
    pub fn awaiting_seeding(&self) -> bool {
        self.current_stage_size == Some(self.initial_stage_size)
    }
}

/// Full generation state handed from one generation call to the next.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub matches: Vec<GameMatch>,
    pub stages: BTreeMap<String, DivisionStage>,
    /// Last slot used by group play; knockout scheduling continues from here.
    pub last_slot: Option<Slot>,
}

impl Schedule {
    pub fn get(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.match_id == id)
    }

    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.match_id == id)
    }

    /// Highest match id handed out so far.
    pub fn last_match_id(&self) -> Option<MatchId> {
        self.matches.iter().map(|m| m.match_id).max()
    }

    /// Slot of the most recent match that is actually played.
    pub fn last_played_slot(&self) -> Option<Slot> {
        self.matches.iter().rev().find_map(GameMatch::slot)
    }

    pub fn has_group_play(&self, division: &str) -> bool {
        self.matches
            .iter()
            .any(|m| m.round == RoundType::GroupPlay && m.division == division)
    }

    /// Ids of the matches of one knockout round, in schedule order.
    pub fn round_match_ids(&self, label: &str, round: KnockoutRound) -> Vec<MatchId> {
        self.matches
            .iter()
            .filter(|m| m.round == RoundType::Knockout(round) && m.division == label)
            .map(|m| m.match_id)
            .collect()
    }
}
