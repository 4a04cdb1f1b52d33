//! TUI Application
//!
//! Owns the study state and turns key presses into state changes. Anything
//! that touches storage is left as a pending action for the runner.

use super::events::Event;
use super::state::{Phase, StudyState};

/// Main TUI application
#[derive(Debug, Default)]
pub struct App {
    state: StudyState,
}

impl App {
    pub fn new(deck_name: impl Into<String>) -> Self {
        Self {
            state: StudyState::new(deck_name),
        }
    }

    pub fn state(&self) -> &StudyState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StudyState {
        &mut self.state
    }

    /// Handle one input event. Returns `true` when the app should quit.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match (self.state.phase, event) {
            (_, Event::Tick) => {}
            (_, Event::Quit) | (Phase::Done, _) => self.state.should_quit = true,
            (Phase::Question, _) => self.state.phase = Phase::Answer,
            (Phase::Answer, Event::Rate(rating)) => self.state.pending_rating = Some(rating),
            (Phase::Answer, Event::Key(_)) => {}
        }
        self.state.should_quit
    }
}
