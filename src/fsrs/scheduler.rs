//! The repeat operation: one review event, four candidate outcomes.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use log::debug;

use super::candidates::{days, SchedulingCards};
use super::formulas::{retrievability, MIN_STABILITY};
use super::parameters::Parameters;
use super::types::{Rating, SchedulingInfo, State};
use crate::domain::Card;

/// Learning steps for a card seen for the first time.
const NEW_AGAIN_MINUTES: i64 = 1;
const NEW_HARD_MINUTES: i64 = 5;
const NEW_GOOD_MINUTES: i64 = 10;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Computes candidate next states for a card.
///
/// Holds only immutable parameters, so one scheduler can serve any number
/// of threads.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    params: Parameters,
}

impl Scheduler {
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Compute the outcome of reviewing `card` at `now` for every rating.
    ///
    /// The caller's card is never modified. The returned map always holds
    /// Again, Hard, Good and Easy; the caller commits one of them.
    pub fn repeat(&self, card: &Card, now: DateTime<Utc>) -> BTreeMap<Rating, SchedulingInfo> {
        let mut card = card.clone();
        card.elapsed_days = match card.state {
            State::New => 0,
            _ => elapsed_days(card.last_review_at, now),
        };
        card.last_review_at = now;
        card.reps = card.reps.saturating_add(1);

        let mut s = SchedulingCards::new(&card);
        s.update_state(card.state);

        match card.state {
            State::New => self.schedule_new(&mut s, now),
            State::Learning | State::Relearning => self.schedule_learning(&mut s, now),
            State::Review => self.schedule_review(&mut s, &card, now),
        }
        s.normalize();

        debug!(
            "repeat card={} state={} elapsed_days={} intervals={:?}",
            card.id,
            card.state,
            card.elapsed_days,
            Rating::ALL.map(|r| s.get(r).scheduled_days)
        );

        s.record_log(&card, now)
    }

    /// First exposure: initial memory state and minute-scale learning steps.
    fn schedule_new(&self, s: &mut SchedulingCards, now: DateTime<Utc>) {
        for rating in Rating::ALL {
            let candidate = s.get_mut(rating);
            candidate.stability = self.params.init_stability(rating);
            candidate.difficulty = self.params.init_difficulty(rating);
        }

        s.again.due_at = now + Duration::minutes(NEW_AGAIN_MINUTES);
        s.hard.due_at = now + Duration::minutes(NEW_HARD_MINUTES);
        s.good.due_at = now + Duration::minutes(NEW_GOOD_MINUTES);
        let easy_days = self.params.next_interval(s.easy.stability);
        s.easy.scheduled_days = easy_days;
        s.easy.due_at = now + days(easy_days);
    }

    fn schedule_learning(&self, s: &mut SchedulingCards, now: DateTime<Utc>) {
        let hard_days = 0;
        let good_days = self.params.next_interval(s.good.stability);
        let easy_days = self
            .params
            .next_interval(s.easy.stability)
            .max(good_days.saturating_add(1));
        s.schedule(now, hard_days, good_days, easy_days);
    }

    fn schedule_review(&self, s: &mut SchedulingCards, card: &Card, now: DateTime<Utc>) {
        let interval = card.elapsed_days;
        let last_difficulty = card.difficulty;
        let last_stability = card.stability.max(MIN_STABILITY);
        let r = retrievability(interval, last_stability);

        for rating in Rating::ALL {
            let candidate = s.get_mut(rating);
            candidate.difficulty = self.params.next_difficulty(last_difficulty, rating);
            candidate.stability = match rating {
                Rating::Again => self.params.next_forget_stability(last_difficulty, last_stability, r),
                _ => self
                    .params
                    .next_recall_stability(last_difficulty, last_stability, r, rating),
            };
        }

        let mut hard_days = self.params.next_interval(s.hard.stability);
        let mut good_days = self.params.next_interval(s.good.stability);
        hard_days = hard_days.min(good_days);
        good_days = good_days.max(hard_days.saturating_add(1));
        let easy_days = self
            .params
            .next_interval(s.easy.stability)
            .max(good_days.saturating_add(1));
        s.schedule(now, hard_days, good_days, easy_days);
    }
}

/// Days from `last_review_at` to `now`, rounded to the nearest whole day
/// with ties to even. Zero if `now` is earlier.
pub fn elapsed_days(last_review_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - last_review_at).num_seconds() as f64 / SECONDS_PER_DAY;
    // Saturating cast: negative spans give 0, absurd spans give u32::MAX
    days.round_ties_even().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsrs::parameters::{DEFAULT_WEIGHTS, MAX_MAXIMUM_INTERVAL};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn new_card() -> Card {
        Card::new("der Apfel", "the apple", now() - Duration::days(2))
    }

    fn review_card(elapsed: i64, stability: f64, difficulty: f64) -> Card {
        let mut card = new_card();
        card.state = State::Review;
        card.stability = stability;
        card.difficulty = difficulty;
        card.reps = 3;
        card.last_review_at = now() - Duration::days(elapsed);
        card
    }

    #[test]
    fn test_repeat_returns_all_four_ratings() {
        let outcomes = Scheduler::default().repeat(&new_card(), now());
        assert_eq!(outcomes.keys().copied().collect::<Vec<_>>(), Rating::ALL.to_vec());
    }

    #[test]
    fn test_new_card_initial_stability() {
        let outcomes = Scheduler::default().repeat(&new_card(), now());
        assert_eq!(outcomes[&Rating::Again].card.stability, 0.4);
        assert_eq!(outcomes[&Rating::Hard].card.stability, 0.6);
        assert_eq!(outcomes[&Rating::Good].card.stability, 2.4);
        assert_eq!(outcomes[&Rating::Easy].card.stability, 5.8);
    }

    #[test]
    fn test_new_card_initial_difficulty() {
        let outcomes = Scheduler::default().repeat(&new_card(), now());
        assert!((outcomes[&Rating::Again].card.difficulty - 6.81).abs() < 1e-9);
        assert!((outcomes[&Rating::Easy].card.difficulty - 3.99).abs() < 1e-9);
    }

    #[test]
    fn test_new_card_learning_steps_ignore_stability() {
        let mut weights = DEFAULT_WEIGHTS;
        weights[..3].copy_from_slice(&[40.0, 60.0, 80.0]);
        let scheduler = Scheduler::new(Parameters::new(0.9, 36500, &weights).unwrap());

        for scheduler in [Scheduler::default(), scheduler] {
            let outcomes = scheduler.repeat(&new_card(), now());
            assert_eq!(outcomes[&Rating::Again].card.due_at, now() + Duration::minutes(1));
            assert_eq!(outcomes[&Rating::Hard].card.due_at, now() + Duration::minutes(5));
            assert_eq!(outcomes[&Rating::Good].card.due_at, now() + Duration::minutes(10));
        }
    }

    #[test]
    fn test_new_card_easy_goes_to_review() {
        let outcomes = Scheduler::default().repeat(&new_card(), now());
        let easy = &outcomes[&Rating::Easy].card;
        assert_eq!(easy.state, State::Review);
        assert_eq!(easy.scheduled_days, 6);
        assert_eq!(easy.due_at, now() + Duration::days(6));
        assert_eq!(outcomes[&Rating::Good].card.state, State::Learning);
        assert_eq!(outcomes[&Rating::Good].card.scheduled_days, 0);
    }

    #[test]
    fn test_new_card_bookkeeping() {
        let card = new_card();
        let outcomes = Scheduler::default().repeat(&card, now());
        for info in outcomes.values() {
            assert_eq!(info.card.elapsed_days, 0);
            assert_eq!(info.card.reps, 1);
            assert_eq!(info.card.last_review_at, now());
            assert_eq!(info.card.id, card.id);
            assert_eq!(info.card.question, card.question);
            assert_eq!(info.review_log.state, State::New);
        }
    }

    #[test]
    fn test_learning_branch() {
        let scheduler = Scheduler::default();
        let learning = scheduler.repeat(&new_card(), now())[&Rating::Good].card.clone();
        assert_eq!(learning.state, State::Learning);

        let later = now() + Duration::minutes(10);
        let outcomes = scheduler.repeat(&learning, later);

        let hard = &outcomes[&Rating::Hard].card;
        let good = &outcomes[&Rating::Good].card;
        let easy = &outcomes[&Rating::Easy].card;
        assert_eq!(hard.scheduled_days, 0);
        assert_eq!(hard.due_at, later + Duration::minutes(10));
        // stability 2.4 carried over, interval 2
        assert_eq!(good.scheduled_days, 2);
        assert_eq!(easy.scheduled_days, 3);
        assert_eq!(good.state, State::Review);
        assert_eq!(outcomes[&Rating::Again].card.state, State::Learning);
        assert_eq!(outcomes[&Rating::Again].card.due_at, later + Duration::minutes(5));
        assert_eq!(good.stability, 2.4);
        assert_eq!(good.reps, 2);
    }

    #[test]
    fn test_relearning_again_stays_relearning() {
        let mut card = review_card(1, 1.0, 7.0);
        card.state = State::Relearning;
        let outcomes = Scheduler::default().repeat(&card, now());
        assert_eq!(outcomes[&Rating::Again].card.state, State::Relearning);
        assert_eq!(outcomes[&Rating::Hard].card.state, State::Relearning);
        assert_eq!(outcomes[&Rating::Easy].card.state, State::Review);
        assert_eq!(outcomes[&Rating::Again].card.lapses, 0);
    }

    #[test]
    fn test_review_branch_five_days() {
        let card = review_card(5, 10.0, 5.0);
        let outcomes = Scheduler::default().repeat(&card, now());

        let again = &outcomes[&Rating::Again].card;
        assert!((again.stability - 2.7078).abs() < 1e-3);
        assert!((again.difficulty - 6.7021).abs() < 1e-9);
        assert_eq!(again.state, State::Relearning);
        assert_eq!(again.lapses, 1);
        assert_eq!(again.scheduled_days, 0);
        assert_eq!(again.due_at, now() + Duration::minutes(5));

        assert!((outcomes[&Rating::Hard].card.stability - 12.8367).abs() < 1e-3);
        assert!((outcomes[&Rating::Good].card.stability - 19.7816).abs() < 1e-3);
        assert!((outcomes[&Rating::Easy].card.stability - 35.5301).abs() < 1e-3);

        assert_eq!(outcomes[&Rating::Hard].card.scheduled_days, 13);
        assert_eq!(outcomes[&Rating::Good].card.scheduled_days, 20);
        assert_eq!(outcomes[&Rating::Easy].card.scheduled_days, 36);
        assert_eq!(outcomes[&Rating::Good].card.elapsed_days, 5);
        assert_eq!(outcomes[&Rating::Good].review_log.elapsed_days, 5);
    }

    #[test]
    fn test_review_intervals_are_ordered() {
        let scheduler = Scheduler::default();
        for (elapsed, stability, difficulty) in [(0, 0.1, 10.0), (1, 0.5, 9.0), (30, 3.0, 2.0), (400, 200.0, 1.0)] {
            let outcomes = scheduler.repeat(&review_card(elapsed, stability, difficulty), now());
            let hard = outcomes[&Rating::Hard].card.scheduled_days;
            let good = outcomes[&Rating::Good].card.scheduled_days;
            let easy = outcomes[&Rating::Easy].card.scheduled_days;
            assert!(hard <= good && good < easy, "{} {} {}", hard, good, easy);
        }
    }

    #[test]
    fn test_review_lapse_respects_stability_floor() {
        let outcomes = Scheduler::default().repeat(&review_card(0, 0.1, 10.0), now());
        assert_eq!(outcomes[&Rating::Again].card.stability, MIN_STABILITY);
    }

    #[test]
    fn test_interval_cap() {
        let scheduler = Scheduler::new(Parameters::new(0.9, 10, &DEFAULT_WEIGHTS).unwrap());
        let outcomes = scheduler.repeat(&review_card(30, 50.0, 3.0), now());
        // Good is pushed past Hard even when both hit the cap
        assert_eq!(outcomes[&Rating::Hard].card.scheduled_days, 10);
        assert_eq!(outcomes[&Rating::Good].card.scheduled_days, 11);
        assert_eq!(outcomes[&Rating::Easy].card.scheduled_days, 12);
    }

    #[test]
    fn test_repeat_does_not_mutate_input() {
        let card = review_card(5, 10.0, 5.0);
        let before = card.clone();
        let _ = Scheduler::default().repeat(&card, now());
        assert_eq!(card, before);
    }

    #[test]
    fn test_repeat_is_deterministic() {
        let scheduler = Scheduler::default();
        let card = review_card(12, 7.5, 4.2);
        assert_eq!(scheduler.repeat(&card, now()), scheduler.repeat(&card, now()));
    }

    #[test]
    fn test_log_matches_candidate_scheduled_days() {
        let outcomes = Scheduler::default().repeat(&review_card(9, 4.0, 6.0), now());
        for info in outcomes.values() {
            assert_eq!(info.review_log.scheduled_days, info.card.scheduled_days);
        }
    }

    #[test]
    fn test_elapsed_days_rounds_to_nearest() {
        let ago = |hours: i64| elapsed_days(now() - Duration::hours(hours), now());
        assert_eq!(ago(11), 0);
        assert_eq!(ago(13), 1);
        assert_eq!(ago(42), 2);
        assert_eq!(ago(47), 2);
        assert_eq!(ago(72), 3);
        // Half days go to the even neighbour
        assert_eq!(ago(12), 0);
        assert_eq!(ago(36), 2);
        assert_eq!(ago(60), 2);
        assert_eq!(elapsed_days(now() + Duration::days(1), now()), 0);
    }

    #[test]
    fn test_review_uses_rounded_elapsed_days() {
        let mut card = review_card(0, 10.0, 5.0);
        card.last_review_at = now() - Duration::hours(42);
        let outcomes = Scheduler::default().repeat(&card, now());
        assert_eq!(outcomes[&Rating::Good].review_log.elapsed_days, 2);
    }

    #[test]
    fn test_largest_cap_schedules_without_overflow() {
        let params = Parameters::new(0.9, MAX_MAXIMUM_INTERVAL, &DEFAULT_WEIGHTS).unwrap();
        let scheduler = Scheduler::new(params);
        let outcomes = scheduler.repeat(&review_card(400, 1e12, 1.0), now());

        let days = |r: Rating| outcomes[&r].card.scheduled_days;
        assert_eq!(days(Rating::Hard), MAX_MAXIMUM_INTERVAL);
        assert_eq!(days(Rating::Good), MAX_MAXIMUM_INTERVAL + 1);
        assert_eq!(days(Rating::Easy), MAX_MAXIMUM_INTERVAL + 2);
        let furthest = now() + Duration::days(i64::from(MAX_MAXIMUM_INTERVAL) + 2);
        assert_eq!(outcomes[&Rating::Easy].card.due_at, furthest);

        let mut learning = review_card(0, 1e12, 1.0);
        learning.state = State::Relearning;
        let outcomes = scheduler.repeat(&learning, now());
        assert_eq!(outcomes[&Rating::Easy].card.scheduled_days, MAX_MAXIMUM_INTERVAL + 1);
    }

    #[test]
    fn test_learning_candidates_keep_memory_state() {
        let mut card = review_card(0, 3.5, 6.2);
        card.state = State::Learning;
        let outcomes = Scheduler::default().repeat(&card, now());
        for info in outcomes.values() {
            assert_eq!(info.card.stability, 3.5);
            assert_eq!(info.card.difficulty, 6.2);
        }

        // An imported card with no memory state still gets the floor
        card.stability = 0.0;
        card.difficulty = 0.0;
        let outcomes = Scheduler::default().repeat(&card, now());
        for info in outcomes.values() {
            assert_eq!(info.card.stability, MIN_STABILITY);
            assert_eq!(info.card.difficulty, 1.0);
        }
    }

    #[test]
    fn test_reps_saturate() {
        let mut card = review_card(3, 5.0, 5.0);
        card.reps = u32::MAX;
        let outcomes = Scheduler::default().repeat(&card, now());
        assert_eq!(outcomes[&Rating::Good].card.reps, u32::MAX);
    }
}
