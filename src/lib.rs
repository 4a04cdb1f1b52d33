//! Kartei - terminal flashcards with FSRS scheduling
//!
//! Decks of question/answer cards are stored as JSON files in a data
//! directory that can be synchronized with git. The [`fsrs`] module holds
//! the scheduler; everything else is storage and session plumbing around it.

pub mod domain;
pub mod error;
pub mod fsrs;
pub mod git;
pub mod id;
pub mod storage;
pub mod study;

pub use error::{KarteiError, Result};
