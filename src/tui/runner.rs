//! Study runner - main event loop.
//!
//! The `StudyRunner` owns the terminal, app, event handler and the study
//! session. It runs the main loop: render → handle events → commit ratings
//! → repeat.

use chrono::{DateTime, Utc};
use eyre::Result;
use kartei::study::{StudySession, due_count};
use log::{info, warn};

use super::Tui;
use super::app::App;
use super::events::EventHandler;
use super::state::CardView;
use super::views::render;

/// Main TUI runner that owns the event loop.
pub struct StudyRunner<'a> {
    terminal: Tui,
    app: App,
    event_handler: EventHandler,
    session: StudySession<'a>,
}

impl<'a> StudyRunner<'a> {
    pub fn new(terminal: Tui, session: StudySession<'a>, tick_rate_ms: u64) -> Self {
        Self {
            terminal,
            app: App::new(session.deck().name.clone()),
            event_handler: EventHandler::new(tick_rate_ms),
            session,
        }
    }

    /// Run until the user quits. Returns the number of cards reviewed.
    pub async fn run(mut self) -> Result<usize> {
        info!("Starting study loop for deck {}", self.session.deck().id);
        present(&mut self.app, &mut self.session, Utc::now());

        loop {
            self.terminal.draw(|f| render(self.app.state(), f))?;

            let event = self.event_handler.next().await?;
            if self.app.handle_event(event) {
                break;
            }

            process_pending(&mut self.app, &mut self.session, Utc::now());
        }

        info!("Study loop ended after {} reviews", self.session.reviewed());
        Ok(self.session.reviewed())
    }
}

/// Load the next due card into the app, or the finished screen.
fn present(app: &mut App, session: &mut StudySession<'_>, now: DateTime<Utc>) {
    let remaining = due_count(session.deck(), now);
    let card = session.next(now).map(CardView::from);
    let state = app.state_mut();
    state.reviewed = session.reviewed();
    state.show(card, remaining);
}

/// Commit a pending rating and move on.
///
/// A failed commit is shown in the footer and the card is drawn again with
/// fresh outcomes.
fn process_pending(app: &mut App, session: &mut StudySession<'_>, now: DateTime<Utc>) {
    let Some(rating) = app.state_mut().pending_rating.take() else {
        return;
    };

    match session.answer(rating) {
        Ok(_) => app.state_mut().status_message = None,
        Err(e) => {
            warn!("Failed to record review: {}", e);
            app.state_mut().status_message = Some(e.to_string());
        }
    }
    present(app, session, now);
}
