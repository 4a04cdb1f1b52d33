//! FSRS (Free Spaced Repetition Scheduler) core.
//!
//! Given a card and the review time, [`Scheduler::repeat`] computes the next
//! memory state for each possible [`Rating`]. Nothing here performs I/O or
//! reads a clock; the caller supplies `now` and decides which outcome to keep.
//!
//! ## Core formulas
//! - Retrievability: `R = (1 + t / (9 * S))^-1`
//! - Interval: `I = S * 9 * (1 / retention - 1)`

mod candidates;
mod formulas;
mod parameters;
mod scheduler;
mod types;

pub use candidates::SchedulingCards;
pub use formulas::{clamp_difficulty, retrievability, MAX_DIFFICULTY, MIN_DIFFICULTY, MIN_STABILITY};
pub use parameters::{
    Parameters, DEFAULT_MAXIMUM_INTERVAL, DEFAULT_REQUEST_RETENTION, DEFAULT_WEIGHTS, MAX_MAXIMUM_INTERVAL,
    WEIGHT_COUNT,
};
pub use scheduler::{elapsed_days, Scheduler};
pub use types::{Rating, ReviewLog, SchedulingInfo, State};
