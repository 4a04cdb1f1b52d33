//! Property-based tests for scheduler invariants
#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use kartei::domain::Card;
use kartei::fsrs::{DEFAULT_MAXIMUM_INTERVAL, Parameters, Rating, Scheduler, State, DEFAULT_WEIGHTS};

// ============================================================================
// Test Strategies
// ============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
}

fn state_strategy() -> impl Strategy<Value = State> {
    prop_oneof![
        Just(State::New),
        Just(State::Learning),
        Just(State::Review),
        Just(State::Relearning),
    ]
}

/// Cards in any lifecycle state with a plausible memory state.
fn card_strategy() -> impl Strategy<Value = Card> {
    (
        state_strategy(),
        0.0f64..1000.0,
        1.0f64..=10.0,
        0i64..2000,
        0u32..100,
        0u32..20,
    )
        .prop_map(|(state, stability, difficulty, elapsed, reps, lapses)| {
            let last = now() - Duration::days(elapsed);
            let mut card = Card::new("Q", "A", last);
            card.state = state;
            card.reps = reps;
            card.lapses = lapses;
            if state != State::New {
                card.stability = stability;
                card.difficulty = difficulty;
            }
            card
        })
}

fn retention_strategy() -> impl Strategy<Value = f64> {
    0.7f64..0.97
}

// ============================================================================
// Scheduler Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every candidate respects the stability floor and difficulty range
    #[test]
    fn prop_candidates_normalized(card in card_strategy()) {
        let outcomes = Scheduler::default().repeat(&card, now());

        prop_assert_eq!(outcomes.len(), 4);
        for info in outcomes.values() {
            prop_assert!(info.card.stability >= 0.1);
            prop_assert!(info.card.difficulty >= 1.0 && info.card.difficulty <= 10.0);
            prop_assert!(info.card.due_at > now());
            prop_assert_eq!(info.card.last_review_at, now());
            prop_assert_eq!(info.card.reps, card.reps + 1);
        }
    }

    /// Outside of New, Hard < Good < Easy in scheduled days
    #[test]
    fn prop_interval_ordering(card in card_strategy(), retention in retention_strategy()) {
        prop_assume!(card.state != State::New);
        let params = Parameters::new(retention, DEFAULT_MAXIMUM_INTERVAL, &DEFAULT_WEIGHTS).unwrap();
        let outcomes = Scheduler::new(params).repeat(&card, now());

        let days = |r: Rating| outcomes[&r].card.scheduled_days;
        prop_assert_eq!(days(Rating::Again), 0);
        prop_assert!(days(Rating::Hard) < days(Rating::Good));
        prop_assert!(days(Rating::Good) < days(Rating::Easy));
    }

    /// The caller's card is untouched and the result is a pure function of its inputs
    #[test]
    fn prop_repeat_is_pure(card in card_strategy()) {
        let scheduler = Scheduler::default();
        let before = card.clone();

        let first = scheduler.repeat(&card, now());
        let second = scheduler.repeat(&card, now());

        prop_assert_eq!(&card, &before);
        prop_assert_eq!(first, second);
    }

    /// Each log describes its own candidate and the pre-review state
    #[test]
    fn prop_logs_match_candidates(card in card_strategy()) {
        let outcomes = Scheduler::default().repeat(&card, now());

        for (rating, info) in &outcomes {
            prop_assert_eq!(info.review_log.rating, *rating);
            prop_assert_eq!(info.review_log.state, card.state);
            prop_assert_eq!(info.review_log.scheduled_days, info.card.scheduled_days);
            prop_assert_eq!(info.review_log.elapsed_days, info.card.elapsed_days);
            prop_assert_eq!(info.review_log.review, now());
        }
    }

    /// Forgetting a Review card counts a lapse and relearns it
    #[test]
    fn prop_review_lapse(card in card_strategy()) {
        prop_assume!(card.state == State::Review);
        let outcomes = Scheduler::default().repeat(&card, now());

        let again = &outcomes[&Rating::Again].card;
        prop_assert_eq!(again.state, State::Relearning);
        prop_assert_eq!(again.lapses, card.lapses + 1);
        for rating in [Rating::Hard, Rating::Good, Rating::Easy] {
            prop_assert_eq!(outcomes[&rating].card.state, State::Review);
            prop_assert_eq!(outcomes[&rating].card.lapses, card.lapses);
        }
    }

    /// The interval cap bounds every Review outcome
    #[test]
    fn prop_maximum_interval_caps_good(card in card_strategy(), cap in 1u32..400) {
        prop_assume!(card.state == State::Review);
        let params = Parameters::new(0.9, cap, &DEFAULT_WEIGHTS).unwrap();
        let outcomes = Scheduler::new(params).repeat(&card, now());

        // Ordering may push Good and Easy one day past the cap each
        prop_assert!(outcomes[&Rating::Hard].card.scheduled_days <= cap);
        prop_assert!(outcomes[&Rating::Good].card.scheduled_days <= cap + 1);
        prop_assert!(outcomes[&Rating::Easy].card.scheduled_days <= cap + 2);
    }

    /// Answering Good on time, or a little late, keeps pushing the interval out
    #[test]
    fn prop_good_trajectory_grows(
        retention in retention_strategy(),
        delays in prop::collection::vec(0i64..3, 8),
    ) {
        let params = Parameters::new(retention, DEFAULT_MAXIMUM_INTERVAL, &DEFAULT_WEIGHTS).unwrap();
        let scheduler = Scheduler::new(params);
        let mut now = now();
        let mut card = Card::new("Q", "A", now);
        let mut intervals = Vec::new();
        let mut stabilities = Vec::new();

        for delay in delays {
            let next = scheduler.repeat(&card, now).remove(&Rating::Good).unwrap().card;
            now = next.due_at + Duration::days(delay);
            intervals.push(next.scheduled_days);
            stabilities.push(next.stability);
            card = next;
        }

        prop_assert_eq!(card.state, State::Review);
        // The first Good on a New card is a short learning step
        prop_assert_eq!(intervals[0], 0);
        for pair in intervals[1..].windows(2) {
            prop_assert!(pair[0] <= pair[1], "intervals shrank: {:?}", intervals);
        }
        prop_assert!(intervals[7] > intervals[1]);
        for pair in stabilities.windows(2) {
            prop_assert!(pair[0] <= pair[1], "stability shrank: {:?}", stabilities);
        }
    }
}
