//! Data structures for the table tennis tournament: players, groups, matches, brackets.

mod bracket;
mod game;
mod group;
mod pattern;
mod player;
mod schedule;
mod tournament;

pub use bracket::{KnockoutRound, RoundNames};
pub use game::{GameMatch, MatchId, RoundType, Side, Slot};
pub use group::Group;
pub use pattern::{GroupToken, KnockoutPatterns, PatternTemplate, SeedPair, SeedSlot, SlotTemplate};
pub use player::{Player, PlayerId, WinnerStatus, BYE_NAME};
pub use schedule::{ByeAdvance, DivisionStage, Schedule};
pub use tournament::{ScheduleError, Tournament, TournamentId};
