//! Storage layer for Kartei - JSON documents on disk.
//!
//! Decks are stored one file each so that the data directory can be
//! versioned and merged with git. Committed reviews go to an append-only
//! JSONL history beside them.

mod deck_store;
mod history;
mod json;
mod traits;

pub use deck_store::{DEFAULT_COMMIT_MESSAGE, DeckStore};
pub use history::{HistoryEntry, ReviewHistory};
pub use json::JsonFileStorage;
pub use traits::{HasId, Storage};

use std::path::PathBuf;

/// Default data directory: `{data_local_dir}/kartei`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kartei")
}
