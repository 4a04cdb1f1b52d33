//! TUI Views
//!
//! Layout: header with deck and progress, the card, and a keybind bar
//! that shows the interval each rating would schedule.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::colors;
use super::state::{CardView, Phase, StudyState, format_interval};
use kartei::fsrs::Rating;

/// Render the whole screen.
pub fn render(state: &StudyState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5), Constraint::Length(1)])
        .split(frame.area());

    render_header(state, frame, chunks[0]);
    match (&state.card, state.phase) {
        (Some(card), Phase::Question | Phase::Answer) => render_card(card, state.phase, frame, chunks[1]),
        _ => render_done(state, frame, chunks[1]),
    }
    render_footer(state, frame, chunks[2]);
}

fn render_header(state: &StudyState, frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" kartei ", Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(state.deck_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::styled(state.progress_string(), Style::default().fg(colors::DIM)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_card(card: &CardView, phase: Phase, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let question = Paragraph::new(card.question.as_str())
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Question ({}) ", card.state)),
        );
    frame.render_widget(question, chunks[0]);

    let (text, style) = match phase {
        Phase::Answer => (card.answer.as_str(), Style::default()),
        _ => ("press any key to reveal", Style::default().fg(colors::DIM)),
    };
    let answer = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Answer "));
    frame.render_widget(answer, chunks[1]);
}

fn render_done(state: &StudyState, frame: &mut Frame, area: Rect) {
    let text = format!(
        "No cards due in {}.\n\n{} reviewed this session.",
        state.deck_name, state.reviewed
    );
    let done = Paragraph::new(text)
        .style(Style::default().fg(colors::DONE))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Done "));
    frame.render_widget(done, area);
}

fn render_footer(state: &StudyState, frame: &mut Frame, area: Rect) {
    let line = match &state.status_message {
        Some(message) => Line::from(Span::styled(message.clone(), Style::default().fg(colors::AGAIN))),
        None => Line::from(keybind_spans(state)),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Key hints for the current phase.
pub fn keybind_spans(state: &StudyState) -> Vec<Span<'static>> {
    let key = |k: &str| Span::styled(format!("<{}>", k), Style::default().fg(colors::KEYBIND));

    match (&state.card, state.phase) {
        (Some(card), Phase::Answer) => {
            let mut spans = Vec::new();
            for (rating, days) in card.intervals {
                spans.push(key(&(rating as u8).to_string()));
                spans.push(Span::styled(
                    format!(" {} {}  ", rating.name(), format_interval(days)),
                    Style::default().fg(rating_color(rating)),
                ));
            }
            spans.push(key("q"));
            spans.push(Span::raw(" quit"));
            spans
        }
        (Some(_), _) => vec![key("any"), Span::raw(" reveal  "), key("q"), Span::raw(" quit")],
        (None, _) => vec![key("any"), Span::raw(" quit")],
    }
}

fn rating_color(rating: Rating) -> ratatui::style::Color {
    match rating {
        Rating::Again => colors::AGAIN,
        Rating::Hard => colors::HARD,
        Rating::Good => colors::GOOD,
        Rating::Easy => colors::EASY,
    }
}
