//! ID generation utilities for Kartei
//!
//! Decks and cards are keyed by uuid v4 strings; the CLI shows a short prefix.

use uuid::Uuid;

/// Number of characters shown when an id is abbreviated.
pub const SHORT_ID_LEN: usize = 8;

/// Generate a unique record ID
///
/// Example: `3f2b8c1e-9a4d-4e57-8b1f-0c6d2e9a7b44`
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Abbreviate an id for display.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Check whether `key` identifies `id`, either exactly or as a prefix.
pub fn matches_id(id: &str, key: &str) -> bool {
    !key.is_empty() && id.starts_with(key)
}
