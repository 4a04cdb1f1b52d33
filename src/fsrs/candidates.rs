//! Candidate next states, one per rating.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use super::formulas::{clamp_difficulty, MIN_STABILITY};
use super::types::{Rating, ReviewLog, SchedulingInfo, State};
use crate::domain::Card;

/// Minutes until a lapsed card (Again) is due again.
const AGAIN_DELAY_MINUTES: i64 = 5;
/// Minutes until a Hard card with a zero-day interval is due again.
const HARD_DELAY_MINUTES: i64 = 10;

/// Four working copies of one card snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingCards {
    pub again: Card,
    pub hard: Card,
    pub good: Card,
    pub easy: Card,
}

impl SchedulingCards {
    /// Copy the full snapshot once per rating.
    ///
    /// Every candidate starts with the card's stability, difficulty and
    /// counters. The Learning and Relearning branches never set a memory
    /// state of their own, so their candidates keep the card's; the branches
    /// that do overwrite it, and [`normalize`](Self::normalize) applies the
    /// stability floor and difficulty clamp to all four afterwards.
    pub fn new(card: &Card) -> Self {
        Self {
            again: card.clone(),
            hard: card.clone(),
            good: card.clone(),
            easy: card.clone(),
        }
    }

    pub fn get(&self, rating: Rating) -> &Card {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }

    pub fn get_mut(&mut self, rating: Rating) -> &mut Card {
        match rating {
            Rating::Again => &mut self.again,
            Rating::Hard => &mut self.hard,
            Rating::Good => &mut self.good,
            Rating::Easy => &mut self.easy,
        }
    }

    /// Apply the lifecycle transition for each rating.
    pub fn update_state(&mut self, state: State) {
        match state {
            State::New => {
                self.again.state = State::Learning;
                self.hard.state = State::Learning;
                self.good.state = State::Learning;
                self.easy.state = State::Review;
            }
            State::Learning | State::Relearning => {
                self.again.state = state;
                self.hard.state = state;
                self.good.state = State::Review;
                self.easy.state = State::Review;
            }
            State::Review => {
                self.again.state = State::Relearning;
                self.hard.state = State::Review;
                self.good.state = State::Review;
                self.easy.state = State::Review;
                self.again.lapses += 1;
            }
        }
    }

    /// Day-granularity scheduling shared by the Learning and Review branches.
    pub fn schedule(&mut self, now: DateTime<Utc>, hard_days: u32, good_days: u32, easy_days: u32) {
        self.again.scheduled_days = 0;
        self.hard.scheduled_days = hard_days;
        self.good.scheduled_days = good_days;
        self.easy.scheduled_days = easy_days;

        self.again.due_at = now + Duration::minutes(AGAIN_DELAY_MINUTES);
        self.hard.due_at = if hard_days > 0 {
            now + days(hard_days)
        } else {
            now + Duration::minutes(HARD_DELAY_MINUTES)
        };
        self.good.due_at = now + days(good_days);
        self.easy.due_at = now + days(easy_days);
    }

    /// Enforce the stability floor and difficulty range on every candidate.
    pub fn normalize(&mut self) {
        for rating in Rating::ALL {
            let card = self.get_mut(rating);
            card.stability = card.stability.max(MIN_STABILITY);
            card.difficulty = clamp_difficulty(card.difficulty);
        }
    }

    /// Pair each candidate with its review log.
    ///
    /// `card` is the reviewed snapshot; its elapsed days and state (before the
    /// review) go into every log.
    pub fn record_log(self, card: &Card, now: DateTime<Utc>) -> BTreeMap<Rating, SchedulingInfo> {
        let Self {
            again,
            hard,
            good,
            easy,
        } = self;

        [
            (Rating::Again, again),
            (Rating::Hard, hard),
            (Rating::Good, good),
            (Rating::Easy, easy),
        ]
        .into_iter()
        .map(|(rating, candidate)| {
            let log = ReviewLog::new(rating, candidate.scheduled_days, card.elapsed_days, now, card.state);
            (rating, SchedulingInfo::new(candidate, log))
        })
        .collect()
    }
}

pub(crate) fn days(n: u32) -> Duration {
    Duration::days(i64::from(n))
}
