//! Schedule generation: group play, knockout seeding and advancement, results.

mod advance;
mod allocator;
mod knockout;
mod results;
mod round_robin;
mod seeding;

pub use allocator::AllocatorState;
pub use knockout::{advance_knockout, generate_knockout_round, KnockoutContext, RoundSummary};
pub use results::{
    record_match_winner, set_match_winner, submission, SubmittedMatch, SubmittedPlayer,
};
pub use round_robin::{build_round_robin, generate_schedule};
