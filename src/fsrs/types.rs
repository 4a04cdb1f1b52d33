//! Value types shared by the scheduler: ratings, lifecycle states and
//! the records a repeat produces.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Card;
use crate::error::{KarteiError, Result};

/// Recall quality reported by the user.
///
/// The discriminant is the rating's numeric value and enters the formulas
/// directly, e.g. as `(r - 3)` in the difficulty updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    /// All ratings in ascending order.
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Numeric value (1..=4) as used in the formulas.
    pub fn value(self) -> f64 {
        f64::from(self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = KarteiError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(KarteiError::InvalidRating(other.to_string())),
        }
    }
}

impl FromStr for Rating {
    type Err = KarteiError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(n) = s.parse::<u8>() {
            return Rating::try_from(n);
        }
        Rating::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KarteiError::InvalidRating(s.to_string()))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse phase of a card's review history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum State {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

impl State {
    pub fn name(self) -> &'static str {
        match self {
            State::New => "New",
            State::Learning => "Learning",
            State::Review => "Review",
            State::Relearning => "Relearning",
        }
    }

    /// Learning and Relearning both count as "in learning" for deck stats.
    pub fn is_learning(self) -> bool {
        matches!(self, State::Learning | State::Relearning)
    }
}

impl TryFrom<u8> for State {
    type Error = KarteiError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(State::New),
            1 => Ok(State::Learning),
            2 => Ok(State::Review),
            3 => Ok(State::Relearning),
            other => Err(KarteiError::InvalidState(other.to_string())),
        }
    }
}

impl FromStr for State {
    type Err = KarteiError;

    fn from_str(s: &str) -> Result<Self> {
        [State::New, State::Learning, State::Review, State::Relearning]
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KarteiError::InvalidState(s.to_string()))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Audit record of one (hypothetical) review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    pub rating: Rating,
    /// Scheduled days of the candidate this log belongs to
    pub scheduled_days: u32,
    /// Elapsed days of the card at review time
    pub elapsed_days: u32,
    pub review: DateTime<Utc>,
    /// State before the review
    pub state: State,
}

impl ReviewLog {
    pub fn new(rating: Rating, scheduled_days: u32, elapsed_days: u32, review: DateTime<Utc>, state: State) -> Self {
        Self {
            rating,
            scheduled_days,
            elapsed_days,
            review,
            state,
        }
    }
}

/// One candidate outcome of a repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingInfo {
    pub card: Card,
    pub review_log: ReviewLog,
}

impl SchedulingInfo {
    pub fn new(card: Card, review_log: ReviewLog) -> Self {
        Self { card, review_log }
    }
}
