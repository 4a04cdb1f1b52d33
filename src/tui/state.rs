//! Application state for the study TUI.
//!
//! - `StudyState`: everything the views render
//! - `Phase`: which side of the card is showing

use kartei::fsrs::Rating;
use kartei::study::Prompt;

/// Which part of the review cycle is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Question shown, answer hidden
    #[default]
    Question,
    /// Answer revealed, waiting for a rating
    Answer,
    /// Nothing left to review today
    Done,
}

/// The card currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub state: String,
    /// Scheduled days per rating, in rating order
    pub intervals: [(Rating, u32); 4],
}

impl From<&Prompt> for CardView {
    fn from(prompt: &Prompt) -> Self {
        Self {
            id: prompt.card.id.clone(),
            question: prompt.card.question.clone(),
            answer: prompt.card.answer.clone(),
            state: prompt.card.state.to_string(),
            intervals: prompt.intervals(),
        }
    }
}

/// All mutable state of a study session's UI.
#[derive(Debug, Default)]
pub struct StudyState {
    pub deck_name: String,
    pub phase: Phase,
    pub card: Option<CardView>,
    /// Cards rated so far
    pub reviewed: usize,
    /// Cards due today, including the one on screen
    pub remaining: usize,
    /// Last error, shown in the footer
    pub status_message: Option<String>,

    // Pending actions (processed by runner)
    /// Rating chosen for the card on screen
    pub pending_rating: Option<Rating>,

    /// Whether the application should quit
    pub should_quit: bool,
}

impl StudyState {
    pub fn new(deck_name: impl Into<String>) -> Self {
        Self {
            deck_name: deck_name.into(),
            ..Self::default()
        }
    }

    /// Show the next card, or the finished screen when there is none.
    pub fn show(&mut self, card: Option<CardView>, remaining: usize) {
        self.phase = if card.is_some() { Phase::Question } else { Phase::Done };
        self.card = card;
        self.remaining = remaining;
    }

    /// Format the progress string for the header.
    pub fn progress_string(&self) -> String {
        format!("{} reviewed │ {} due", self.reviewed, self.remaining)
    }
}

/// Human form of an interval: `<1d`, `4d`, `3mo`, `1.2y`.
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "<1d".to_string(),
        1..=30 => format!("{}d", days),
        31..=364 => format!("{}mo", (days as f64 / 30.0).round() as u32),
        _ => format!("{:.1}y", days as f64 / 365.0),
    }
}
