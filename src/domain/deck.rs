//! Deck record: a named collection of cards, persisted as one document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::error::{KarteiError, Result};
use crate::fsrs::State;
use crate::id::{generate_id, matches_id};
use crate::storage::HasId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Card counts per lifecycle bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeckStats {
    pub total: usize,
    pub new: usize,
    /// Learning and Relearning
    pub learning: usize,
    pub review: usize,
}

impl Deck {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            created_at: now,
            cards: Vec::new(),
        }
    }

    pub fn stats(&self) -> DeckStats {
        self.cards.iter().fold(
            DeckStats {
                total: self.cards.len(),
                ..DeckStats::default()
            },
            |mut stats, card| {
                match card.state {
                    State::New => stats.new += 1,
                    State::Learning | State::Relearning => stats.learning += 1,
                    State::Review => stats.review += 1,
                }
                stats
            },
        )
    }

    /// Locate a card by exact id or unique id prefix.
    pub fn card_index(&self, key: &str) -> Result<usize> {
        if let Some(idx) = self.cards.iter().position(|c| c.id == key) {
            return Ok(idx);
        }

        let mut matches = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| matches_id(&c.id, key))
            .map(|(idx, _)| idx);
        match (matches.next(), matches.next()) {
            (Some(idx), None) => Ok(idx),
            (Some(_), Some(_)) => Err(KarteiError::CardNotFound(format!("{} is ambiguous", key))),
            (None, _) => Err(KarteiError::CardNotFound(key.to_string())),
        }
    }

    pub fn card(&self, key: &str) -> Result<&Card> {
        let idx = self.card_index(key)?;
        Ok(&self.cards[idx])
    }

    pub fn card_mut(&mut self, key: &str) -> Result<&mut Card> {
        let idx = self.card_index(key)?;
        Ok(&mut self.cards[idx])
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Replace the card with the same id, e.g. with a committed scheduling candidate.
    pub fn replace_card(&mut self, card: Card) -> Result<()> {
        let slot = self
            .cards
            .iter_mut()
            .find(|c| c.id == card.id)
            .ok_or_else(|| KarteiError::CardNotFound(card.id.clone()))?;
        *slot = card;
        Ok(())
    }

    pub fn remove_card(&mut self, key: &str) -> Result<Card> {
        let idx = self.card_index(key)?;
        Ok(self.cards.remove(idx))
    }
}

impl HasId for Deck {
    fn id(&self) -> &str {
        &self.id
    }
}
