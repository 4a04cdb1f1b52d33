//! CLI command definitions using clap.
//!
//! - decks: list decks with card counts (default)
//! - deck / card: manage decks and their cards
//! - study: review due cards in the terminal UI
//! - preview: show the four scheduling outcomes for a card
//! - sync / clone: move the data directory between machines with git

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kartei - terminal flashcards with FSRS scheduling
#[derive(Parser, Debug)]
#[command(name = "kartei")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List decks with card and due counts
    Decks,

    /// Deck management
    Deck {
        #[command(subcommand)]
        command: DeckCommands,
    },

    /// Card management
    Card {
        #[command(subcommand)]
        command: CardCommands,
    },

    /// Review the due cards of a deck
    Study {
        /// Deck id, id prefix, or name
        deck: String,
    },

    /// Show what each rating would do to a card, without saving
    Preview {
        /// Deck id, id prefix, or name
        deck: String,

        /// Card id or id prefix
        card: String,
    },

    /// Show the review history of a deck
    History {
        /// Deck id, id prefix, or name
        deck: String,
    },

    /// Pull then push the data directory
    Sync,

    /// Replace the data directory with a clone of a remote repository
    Clone {
        /// Repository URL
        url: String,
    },
}

/// Deck management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DeckCommands {
    /// Create a new deck
    Add {
        /// Deck name
        name: String,
    },

    /// Rename a deck
    Rename {
        /// Deck id, id prefix, or name
        deck: String,

        /// New name
        name: String,
    },

    /// Delete a deck and its history
    Remove {
        /// Deck id, id prefix, or name
        deck: String,
    },

    /// Show a deck's cards
    Show {
        /// Deck id, id prefix, or name
        deck: String,
    },
}

/// Card management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CardCommands {
    /// Add a card to a deck
    Add {
        /// Deck id, id prefix, or name
        deck: String,

        /// Question side
        #[arg(short, long)]
        question: String,

        /// Answer side
        #[arg(short, long)]
        answer: String,
    },

    /// List the cards of a deck
    List {
        /// Deck id, id prefix, or name
        deck: String,
    },

    /// Edit a card's text; scheduling state is kept
    Edit {
        /// Deck id, id prefix, or name
        deck: String,

        /// Card id or id prefix
        card: String,

        /// New question
        #[arg(short, long)]
        question: Option<String>,

        /// New answer
        #[arg(short, long)]
        answer: Option<String>,
    },

    /// Remove a card from a deck
    Remove {
        /// Deck id, id prefix, or name
        deck: String,

        /// Card id or id prefix
        card: String,
    },
}
