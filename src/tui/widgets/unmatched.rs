// Unmatched panel: rows that failed linkage, for manual review, plus the
// duplicates dropped from the display set.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::matching::LinkedPlayer;
use crate::rankings::RankedPlayer;
use crate::tui::ViewState;

/// Render the unmatched panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = build_lines(&state.unmatched, &state.dropped);
    let title = format!("Unmatched ({})", state.unmatched.len());

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

/// Build the panel content: one line per unmatched row, then a dim section
/// for dropped duplicates when there are any.
pub fn build_lines(unmatched: &[RankedPlayer], dropped: &[LinkedPlayer]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if unmatched.is_empty() {
        lines.push(Line::styled(
            "all ranked players matched",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for row in unmatched {
        lines.push(Line::styled(
            format_row(row),
            Style::default().fg(Color::Yellow),
        ));
    }

    if !dropped.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            format!("duplicates dropped ({})", dropped.len()),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ));
        for dup in dropped {
            lines.push(Line::styled(
                format_row(&dup.ranked),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ));
        }
    }

    lines
}

fn format_row(row: &RankedPlayer) -> String {
    let rank = row
        .rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "--".to_string());
    let pos = row.position.map(|p| p.display_str()).unwrap_or("--");
    let team = row.team.as_deref().unwrap_or("--");
    format!("{rank:>4}  {}  {pos}/{team}  [{}]", row.display_name, row.source_list)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
