//! Tournament and ScheduleError.

use crate::config::ScheduleConfig;
use crate::models::bracket::{KnockoutRound, RoundNames};
use crate::models::game::MatchId;
use crate::models::group::Group;
use crate::models::pattern::KnockoutPatterns;
use crate::models::player::{Player, PlayerId};
use crate::models::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Errors that can occur while generating or updating a schedule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScheduleError {
    /// Table count must be at least 1.
    InvalidTableCount,
    /// No division was given for a knockout call.
    MissingDivision,
    /// Division has no groups or no knockout stage.
    UnknownDivision(String),
    /// A group lists a player that is not in the roster.
    UnknownPlayer { group_id: u32, player_id: PlayerId },
    /// Groups must have 3 or 4 players.
    UnsupportedGroupSize { group_id: u32, size: usize },
    /// Two groups of one division share an id.
    DuplicateGroup { division: String, group_id: u32 },
    /// More groups than the largest bracket can seed.
    TooManyGroups { groups: usize },
    /// Not a knockout round size.
    UnknownRoundSize(u32),
    /// No seed pattern for the bracket, not even a no-bye one.
    PatternNotFound { bracket: u32, byes: u32 },
    /// Previous round has an odd number of matches and cannot be paired.
    OddMatchCount { division: String, round: KnockoutRound, count: usize },
    /// Previous round has no matches to advance from.
    NoPreviousRound { division: String, round: KnockoutRound },
    /// Knockout requested before the division's group play was scheduled.
    RoundRobinMissing(String),
    /// Final already scheduled for this division.
    KnockoutComplete(String),
    MatchNotFound(MatchId),
    /// Walkover or already decided match.
    MatchAlreadyDecided(MatchId),
    /// Group play has not been generated yet.
    NoSchedule,
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::InvalidTableCount => write!(f, "Table count must be at least 1"),
            ScheduleError::MissingDivision => write!(f, "Division is required"),
            ScheduleError::UnknownDivision(d) => write!(f, "Unknown division {}", d),
            ScheduleError::UnknownPlayer { group_id, player_id } => {
                write!(f, "Group {} lists unknown player {}", group_id, player_id)
            }
            ScheduleError::UnsupportedGroupSize { group_id, size } => {
                write!(f, "Group {} has {} players, expected 3 or 4", group_id, size)
            }
            ScheduleError::DuplicateGroup { division, group_id } => {
                write!(f, "Group {} appears twice in division {}", group_id, division)
            }
            ScheduleError::TooManyGroups { groups } => {
                write!(f, "{} groups do not fit in a 64 player bracket", groups)
            }
            ScheduleError::UnknownRoundSize(size) => write!(f, "{} is not a knockout round size", size),
            ScheduleError::PatternNotFound { bracket, byes } => {
                write!(f, "No seed pattern for a {} bracket with {} byes", bracket, byes)
            }
            ScheduleError::OddMatchCount { division, round, count } => write!(
                f,
                "Round of {} in {} has {} matches, cannot pair an odd count",
                round.size(),
                division,
                count
            ),
            ScheduleError::NoPreviousRound { division, round } => {
                write!(f, "No round of {} matches in {}", round.size(), division)
            }
            ScheduleError::RoundRobinMissing(d) => write!(f, "Group play for {} is not scheduled", d),
            ScheduleError::KnockoutComplete(d) => write!(f, "Final for {} is already scheduled", d),
            ScheduleError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            ScheduleError::MatchAlreadyDecided(id) => write!(f, "Match {} already has a winner", id),
            ScheduleError::NoSchedule => write!(f, "Schedule has not been generated"),
        }
    }
}

impl std::error::Error for ScheduleError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A tournament: configuration, frozen seed patterns, roster, and the generated schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub config: ScheduleConfig,
    /// Drawn once at creation; knockout seeding always reads this copy.
    pub patterns: KnockoutPatterns,
    pub round_names: RoundNames,
    pub groups: Vec<Group>,
    pub players: BTreeMap<PlayerId, Player>,
    /// None until group play has been generated.
    pub schedule: Option<Schedule>,
}

impl Tournament {
    /// Create a tournament with no roster yet.
    pub fn new(name: impl Into<String>, config: ScheduleConfig, patterns: KnockoutPatterns) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            config,
            patterns,
            round_names: RoundNames::default(),
            groups: Vec::new(),
            players: BTreeMap::new(),
            schedule: None,
        }
    }

    /// Replace groups and players. Any generated schedule is discarded.
    pub fn set_roster(&mut self, groups: Vec<Group>, players: BTreeMap<PlayerId, Player>) {
        self.groups = groups;
        self.players = players
            .into_iter()
            .map(|(id, mut p)| {
                if p.id.is_empty() {
                    p.id = id.clone();
                }
                (id, p)
            })
            .collect();
        self.schedule = None;
    }

    pub fn schedule_mut(&mut self) -> Result<&mut Schedule, ScheduleError> {
        self.schedule.as_mut().ok_or(ScheduleError::NoSchedule)
    }
}
