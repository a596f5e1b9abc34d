// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the draft board:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------------+------------------+
// | Board Table                   | Unmatched (30%)  |
// |                               | (optional)       |
// +-------------------------------+------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct BoardLayout {
    /// Top row: fetch status, pick counter, last refresh time, warnings.
    pub status_bar: Rect,
    /// Main area: the ranked-player board table.
    pub board: Rect,
    /// Right panel: unmatched rows for review. `None` when toggled off.
    pub unmatched: Option<Rect>,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect, show_unmatched: bool) -> BoardLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    if !show_unmatched {
        return BoardLayout {
            status_bar,
            board: middle,
            unmatched: None,
            help_bar,
        };
    }

    // Horizontal: board (70%) | unmatched panel (30%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(middle);

    BoardLayout {
        status_bar,
        board: horizontal[0],
        unmatched: Some(horizontal[1]),
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
