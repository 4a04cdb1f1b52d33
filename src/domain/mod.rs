//! Domain records: decks and their cards.

mod card;
mod deck;

pub use card::Card;
pub use deck::{Deck, DeckStats};
