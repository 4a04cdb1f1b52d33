//! Input for the study screen.
//!
//! Raw crossterm input is translated into the handful of things a study
//! session reacts to: quitting, rating the card, any other key, and ticks.
//! Resizes come through as ticks since every loop pass redraws anyway.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use eyre::Result;
use kartei::fsrs::Rating;
use std::time::Duration;

/// What the study screen can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `q`, Esc or Ctrl-C
    Quit,
    /// Number keys `1` to `4`
    Rate(Rating),
    /// Any other key press
    Key(KeyCode),
    /// Nothing to react to; redraw
    Tick,
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Event::Quit;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Event::Quit,
            KeyCode::Char(c @ '1'..='4') => Rating::try_from(c as u8 - b'0')
                .map(Event::Rate)
                .unwrap_or(Event::Key(key.code)),
            code => Event::Key(code),
        }
    }
}

/// Map one crossterm event; releases, repeats and mouse input become ticks.
pub fn translate(event: CrosstermEvent) -> Event {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::from(key),
        _ => Event::Tick,
    }
}

/// Waits for input without blocking the async runtime.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Wait up to one tick for the next event.
    pub async fn next(&self) -> Result<Event> {
        let tick_rate = self.tick_rate;

        let event = tokio::task::spawn_blocking(move || -> Result<Event> {
            if event::poll(tick_rate)? {
                Ok(translate(event::read()?))
            } else {
                Ok(Event::Tick)
            }
        })
        .await??;

        Ok(event)
    }
}
