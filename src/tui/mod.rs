//! Terminal User Interface for study sessions.
//!
//! Shows one card at a time: the question, then the answer on any key,
//! then the four ratings with the interval each would schedule.
//!
//! The TUI runs as part of the main process using tokio for input polling.

mod app;
mod events;
mod runner;
mod state;
mod views;

pub use runner::StudyRunner;

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use ratatui::prelude::*;
use std::io::{Stdout, stdout};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode.
///
/// Enables raw mode and switches to the alternate screen.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
///
/// Disables raw mode and leaves the alternate screen.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Rating and chrome colors.
pub mod colors {
    use ratatui::style::Color;

    pub const AGAIN: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const HARD: Color = Color::Rgb(255, 215, 0); // Gold
    pub const GOOD: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const EASY: Color = Color::Rgb(0, 191, 255); // Deep sky blue
    pub const DONE: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const DIM: Color = Color::DarkGray;
}
