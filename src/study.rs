//! Study sessions: pick the next due card, present its four outcomes, commit
//! the one the user chose.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::domain::{Card, Deck};
use crate::error::{KarteiError, Result};
use crate::fsrs::{Rating, Scheduler, SchedulingInfo};
use crate::storage::{DeckStore, HistoryEntry, ReviewHistory};

/// Index of the next card to study: due today, least recently reviewed
/// first, then earliest due.
pub fn next_due(deck: &Deck, now: DateTime<Utc>) -> Option<usize> {
    deck.cards
        .iter()
        .enumerate()
        .filter(|(_, card)| card.is_due(now))
        .min_by_key(|(_, card)| (card.last_review_at, card.due_at))
        .map(|(idx, _)| idx)
}

/// Number of cards due on the day of `now`.
pub fn due_count(deck: &Deck, now: DateTime<Utc>) -> usize {
    deck.cards.iter().filter(|card| card.is_due(now)).count()
}

/// A card on screen together with the outcomes computed when it was drawn.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub card: Card,
    pub outcomes: BTreeMap<Rating, SchedulingInfo>,
}

impl Prompt {
    /// Scheduled days each rating would give, for key hints.
    pub fn intervals(&self) -> [(Rating, u32); 4] {
        Rating::ALL.map(|r| (r, self.outcomes[&r].card.scheduled_days))
    }
}

pub struct StudySession<'a> {
    store: &'a DeckStore,
    history: Option<&'a ReviewHistory>,
    scheduler: &'a Scheduler,
    deck: Deck,
    current: Option<Prompt>,
    reviewed: usize,
}

impl<'a> StudySession<'a> {
    pub fn new(store: &'a DeckStore, scheduler: &'a Scheduler, deck: Deck) -> Self {
        Self {
            store,
            history: None,
            scheduler,
            deck,
            current: None,
            reviewed: 0,
        }
    }

    /// Record every committed review in `history`.
    pub fn with_history(mut self, history: &'a ReviewHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn current(&self) -> Option<&Prompt> {
        self.current.as_ref()
    }

    /// Present the next due card, if any.
    ///
    /// Outcomes are computed once, with this `now`, and reused by
    /// [`answer`](Self::answer) however long the user takes.
    pub fn next(&mut self, now: DateTime<Utc>) -> Option<&Prompt> {
        if self.current.is_none() {
            self.current = next_due(&self.deck, now).map(|idx| {
                let card = self.deck.cards[idx].clone();
                let outcomes = self.scheduler.repeat(&card, now);
                Prompt { card, outcomes }
            });
        }
        self.current.as_ref()
    }

    /// Commit the outcome for `rating` and persist the deck.
    ///
    /// Nothing changes unless the deck is saved: on error the session deck
    /// and the review history are as they were, and the next call to
    /// [`next`](Self::next) draws the card again. A history entry is only
    /// written for a saved review.
    pub fn answer(&mut self, rating: Rating) -> Result<SchedulingInfo> {
        let mut prompt = self
            .current
            .take()
            .ok_or_else(|| KarteiError::CardNotFound("no card is being studied".to_string()))?;
        let chosen = prompt
            .outcomes
            .remove(&rating)
            .ok_or_else(|| KarteiError::InvalidRating(rating.to_string()))?;

        let mut deck = self.deck.clone();
        deck.replace_card(chosen.card.clone())?;
        self.store.update(&deck)?;
        self.deck = deck;
        self.reviewed += 1;

        if let Some(history) = self.history {
            let entry = HistoryEntry {
                card_id: chosen.card.id.clone(),
                log: chosen.review_log.clone(),
            };
            if let Err(e) = history.append(&self.deck.id, &entry) {
                warn!("Review of card {} saved but not logged: {}", chosen.card.id, e);
            }
        }

        info!(
            "Reviewed card {} in deck {}: {} -> {} ({} days)",
            chosen.card.id, self.deck.id, rating, chosen.card.state, chosen.card.scheduled_days
        );
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 20, 14, 0, 0).unwrap()
    }

    fn card(question: &str, last_review: i64, due: i64) -> Card {
        let mut card = Card::new(question, "-", now());
        card.last_review_at = now() - Duration::days(last_review);
        card.due_at = now() + Duration::days(due);
        card
    }

    #[test]
    fn test_next_due_prefers_least_recently_reviewed() {
        let mut deck = Deck::new("d", now());
        deck.add_card(card("recent", 1, -1));
        deck.add_card(card("old", 10, 0));
        deck.add_card(card("future", 30, 2));
        assert_eq!(next_due(&deck, now()), Some(1));
    }

    #[test]
    fn test_next_due_breaks_ties_by_due_date() {
        let mut deck = Deck::new("d", now());
        deck.add_card(card("later", 5, 0));
        deck.add_card(card("earlier", 5, -3));
        assert_eq!(next_due(&deck, now()), Some(1));
    }

    #[test]
    fn test_next_due_none_when_nothing_due() {
        let mut deck = Deck::new("d", now());
        deck.add_card(card("future", 5, 1));
        assert_eq!(next_due(&deck, now()), None);
        assert_eq!(due_count(&deck, now()), 0);
    }

    #[test]
    fn test_due_count() {
        let mut deck = Deck::new("d", now());
        deck.add_card(card("a", 5, 0));
        deck.add_card(card("b", 5, -2));
        deck.add_card(card("c", 5, 3));
        assert_eq!(due_count(&deck, now()), 2);
    }

    #[test]
    fn test_failed_save_leaves_session_untouched() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = DeckStore::open(temp.path()).unwrap();
        let history = ReviewHistory::new(store.history_dir()).unwrap();
        let scheduler = Scheduler::default();
        let mut deck = Deck::new("d", now());
        deck.add_card(card("unsaved", 1, 0));
        let before = deck.clone();

        // The deck was never added, so saving it fails
        let mut session = StudySession::new(&store, &scheduler, deck).with_history(&history);
        session.next(now()).unwrap();
        let err = session.answer(Rating::Good).unwrap_err();

        assert!(matches!(err, KarteiError::DeckNotFound(_)));
        assert_eq!(session.deck(), &before);
        assert_eq!(session.reviewed(), 0);
        assert!(history.load(&before.id).unwrap().is_empty());

        // The same card comes back for another attempt
        let again = session.next(now()).unwrap();
        assert_eq!(again.card, before.cards[0]);
    }
}
