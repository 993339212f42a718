//! Match results entered by the officials, and the payload handed to storage.

use crate::config::ScheduleConfig;
use crate::models::{
    GameMatch, MatchId, Player, Schedule, ScheduleError, Side, Tournament, WinnerStatus,
};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Record the winner of a played match.
///
/// Walkovers and matches that already have a result are rejected. If the next round
/// already exists, the winner's placeholder there takes on the winner's identity.
pub fn record_match_winner(
    schedule: &mut Schedule,
    match_id: MatchId,
    side: Side,
) -> Result<(), ScheduleError> {
    let m = schedule
        .get_mut(match_id)
        .ok_or(ScheduleError::MatchNotFound(match_id))?;
    if m.is_walkover() || m.players.iter().any(|p| p.is_winner != WinnerStatus::Pending) {
        return Err(ScheduleError::MatchAlreadyDecided(match_id));
    }

    for (i, p) in m.players.iter_mut().enumerate() {
        p.is_winner = WinnerStatus::Decided(i == side.index());
    }
    let winner = m.players[side.index()].clone();
    let next = m.next_match_id;
    if let Some(next) = next {
        for p in m.players.iter_mut().filter(|p| p.is_winner.is_winner()) {
            p.next_match_id = Some(next);
        }
    }
    log::info!("Match {} won by {}", match_id, winner.display_name());

    if let Some(next) = next.and_then(|id| schedule.get_mut(id)) {
        let label = Player::winner_of(match_id).first_name;
        if let Some(slot) = next.players.iter_mut().find(|p| p.first_name == label) {
            slot.assume_identity(&winner);
        }
    }
    Ok(())
}

/// Record a winner in the tournament's schedule.
pub fn set_match_winner(
    tournament: &mut Tournament,
    match_id: MatchId,
    side: Side,
) -> Result<(), ScheduleError> {
    record_match_winner(tournament.schedule_mut()?, match_id, side)
}

/// A player as stored with a submitted match: scoreboard starts at zero sets.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmittedPlayer {
    #[serde(flatten)]
    pub player: Player,
    pub sets: u32,
}

/// A match in the shape the storage layer persists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmittedMatch {
    pub match_id: MatchId,
    pub time: Option<NaiveDateTime>,
    pub table: Option<u32>,
    pub players: [SubmittedPlayer; 2],
    pub group: u32,
    pub division: String,
    pub next_match_id: Option<MatchId>,
    pub match_type: String,
}

impl SubmittedMatch {
    fn from_match(m: &GameMatch, config: &ScheduleConfig) -> Self {
        let [a, b] = m.players.clone();
        let match_type = if m.match_type.is_empty() {
            config.match_type.clone()
        } else {
            m.match_type.clone()
        };
        Self {
            match_id: m.match_id,
            time: m.time,
            table: m.table,
            players: [
                SubmittedPlayer { player: a, sets: 0 },
                SubmittedPlayer { player: b, sets: 0 },
            ],
            group: m.group,
            division: m.division.clone(),
            next_match_id: m.next_match_id,
            match_type,
        }
    }
}

/// The whole schedule, ready to be written out.
pub fn submission(schedule: &Schedule, config: &ScheduleConfig) -> Vec<SubmittedMatch> {
    schedule
        .matches
        .iter()
        .map(|m| SubmittedMatch::from_match(m, config))
        .collect()
}
