//! Card record: content plus the memory state the scheduler reads and writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fsrs::State;
use crate::id::generate_id;

/// A question/answer card.
///
/// Cloning copies every field, which is how the scheduler isolates its
/// working copies from the caller's card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    //=== Identity ===
    #[serde(default = "generate_id")]
    pub id: String,

    //=== Content ===
    pub question: String,
    pub answer: String,

    //=== Memory state ===
    pub due_at: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    /// Days between the two most recent reviews
    pub elapsed_days: u32,
    pub scheduled_days: u32,
    /// Number of reviews
    pub reps: u32,
    /// Number of times a card in Review was forgotten
    pub lapses: u32,
    pub state: State,
    pub last_review_at: DateTime<Utc>,
}

impl Card {
    /// Create an unreviewed card, due immediately.
    pub fn new(question: impl Into<String>, answer: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            question: question.into(),
            answer: answer.into(),
            due_at: now,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
            state: State::New,
            last_review_at: now,
        }
    }

    /// Due on or before the calendar day of `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at.date_naive() <= now.date_naive()
    }
}
