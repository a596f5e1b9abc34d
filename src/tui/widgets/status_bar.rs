// Status bar: fetch health, pick counters, and last refresh time.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::FetchStatus;
use crate::tui::ViewState;

/// Render the status bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (status_text, status_style) = status_span(state);

    let refreshed = match &state.last_refresh {
        Some(ts) => ts.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    };

    let mut spans = vec![
        Span::styled(
            " Sleeper Draft Board ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "| Picks: {} | Drafted on board: {} | Updated: {refreshed} | ",
            state.pick_count, state.drafted_count
        )),
        Span::styled(status_text, status_style),
    ];

    if let Some(warning) = state.warnings.first() {
        spans.push(Span::styled(
            format!("  {warning}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Text and style for the fetch-status indicator.
fn status_span(state: &ViewState) -> (String, Style) {
    match state.fetch_status {
        FetchStatus::Live => (
            "LIVE".to_string(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        FetchStatus::Degraded => (
            "DEGRADED".to_string(),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
