//! Error types for Kartei
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Kartei
#[derive(Debug, Error)]
pub enum KarteiError {
    /// Scheduler parameters rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Lifecycle state outside New/Learning/Review/Relearning
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Rating outside 1..=4
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    /// Deck not found in storage
    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    /// Card not found in a deck
    #[error("Card not found: {0}")]
    CardNotFound(String),

    /// A deck with this id already exists
    #[error("Deck already exists: {0}")]
    DeckExists(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Git invocation error
    #[error("Git error: {0}")]
    Git(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Kartei operations
pub type Result<T> = std::result::Result<T, KarteiError>;
