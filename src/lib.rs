//! Table tennis tournament web app: library with models and scheduling logic.

pub mod config;
pub mod logic;
pub mod models;

pub use config::ScheduleConfig;
pub use logic::{
    advance_knockout, build_round_robin, generate_knockout_round, generate_schedule,
    record_match_winner, set_match_winner, submission, AllocatorState, KnockoutContext,
    RoundSummary, SubmittedMatch, SubmittedPlayer,
};
pub use models::{
    ByeAdvance, DivisionStage, GameMatch, Group, GroupToken, KnockoutPatterns, KnockoutRound,
    MatchId, PatternTemplate, Player, PlayerId, RoundNames, RoundType, Schedule, ScheduleError,
    SeedPair, SeedSlot, Side, Slot, SlotTemplate, Tournament, TournamentId, WinnerStatus,
    BYE_NAME,
};
