// Board widget: the color-coded ranked-player table.
//
// Rows are colored by position; drafted players are dimmed and crossed
// out (or hidden entirely via the 'd' toggle). Filtered by the position
// and text filters from ViewState.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::matching::LinkedPlayer;
use crate::player::Position;
use crate::tui::ViewState;

/// Render the board table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let filtered = filter_rows(
        &state.players,
        state.position_filter,
        &state.filter_text,
        state.hide_drafted,
    );

    let header = Row::new(vec![
        Cell::from("Rank"),
        Cell::from("Player"),
        Cell::from("Pos"),
        Cell::from("Team"),
        Cell::from("List"),
        Cell::from("Status"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = filtered
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(format_rank(p.ranked.rank)),
                Cell::from(p.ranked.display_name.clone()),
                Cell::from(
                    p.ranked
                        .position
                        .map(|pos| pos.display_str())
                        .unwrap_or("--"),
                ),
                Cell::from(p.ranked.team.clone().unwrap_or_else(|| "--".to_string())),
                Cell::from(p.ranked.source_list.clone()),
                Cell::from(if p.drafted { "DRAFTED" } else { "" }),
            ])
            .style(row_style(p))
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Min(8),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(state, filtered.len())),
        );

    frame.render_widget(table, area);
}

/// Filter board rows by position, name text, and the drafted toggle.
pub fn filter_rows<'a>(
    players: &'a [LinkedPlayer],
    position_filter: Option<Position>,
    filter_text: &str,
    hide_drafted: bool,
) -> Vec<&'a LinkedPlayer> {
    let text_lower = filter_text.to_lowercase();

    players
        .iter()
        .filter(|p| {
            if hide_drafted && p.drafted {
                return false;
            }
            if let Some(pos) = position_filter {
                if p.ranked.position != Some(pos) {
                    return false;
                }
            }
            if !text_lower.is_empty()
                && !p.ranked.display_name.to_lowercase().contains(&text_lower)
            {
                return false;
            }
            true
        })
        .collect()
}

/// Row styling: drafted rows are dimmed and crossed out, everything else
/// gets its position color.
fn row_style(player: &LinkedPlayer) -> Style {
    if player.drafted {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(position_color(player.ranked.position))
    }
}

/// The board's position color scheme.
pub fn position_color(position: Option<Position>) -> Color {
    match position {
        Some(Position::Quarterback) => Color::Red,
        Some(Position::RunningBack) => Color::Green,
        Some(Position::WideReceiver) => Color::Blue,
        Some(Position::TightEnd) => Color::Yellow,
        Some(Position::Kicker) => Color::Magenta,
        Some(Position::Defense) => Color::Cyan,
        None => Color::Gray,
    }
}

fn format_rank(rank: Option<u32>) -> String {
    match rank {
        Some(r) => r.to_string(),
        None => "--".to_string(),
    }
}

/// Build the title with filter info and the visible row count.
fn build_title(state: &ViewState, filtered_count: usize) -> Line<'static> {
    let mut title = String::from("Draft Board");
    if let Some(pos) = state.position_filter {
        title.push_str(&format!(" [{}]", pos.display_str()));
    }
    if !state.filter_text.is_empty() || state.filter_mode {
        title.push_str(&format!(" /{}", state.filter_text));
        if state.filter_mode {
            title.push('_');
        }
    }
    if state.hide_drafted {
        title.push_str(" [drafted hidden]");
    }
    title.push_str(&format!(" ({filtered_count})"));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rankings::RankedPlayer;

    fn linked(rank: u32, name: &str, pos: &str, drafted: bool) -> LinkedPlayer {
        LinkedPlayer {
            ranked: RankedPlayer {
                rank: Some(rank),
                display_name: name.to_string(),
                position: Position::from_str_pos(pos),
                team: Some("MIN".to_string()),
                source_list: "overall".to_string(),
            },
            canonical_id: Some(format!("id-{rank}")),
            drafted,
        }
    }

    #[test]
    fn filter_no_filters_keeps_everything() {
        let players = vec![
            linked(1, "Justin Jefferson", "WR", false),
            linked(2, "Josh Allen", "QB", true),
        ];
        let result = filter_rows(&players, None, "", false);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn filter_by_position() {
        let players = vec![
            linked(1, "Justin Jefferson", "WR", false),
            linked(2, "Josh Allen", "QB", false),
            linked(3, "Tyreek Hill", "WR", false),
        ];
        let result = filter_rows(&players, Some(Position::WideReceiver), "", false);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].ranked.display_name, "Justin Jefferson");
        assert_eq!(result[1].ranked.display_name, "Tyreek Hill");
    }

    #[test]
    fn filter_by_text_is_case_insensitive() {
        let players = vec![
            linked(1, "Justin Jefferson", "WR", false),
            linked(2, "Justin Fields", "QB", false),
            linked(3, "Tyreek Hill", "WR", false),
        ];
        let result = filter_rows(&players, None, "JUSTIN", false);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn filter_hides_drafted_when_toggled() {
        let players = vec![
            linked(1, "Justin Jefferson", "WR", true),
            linked(2, "Tyreek Hill", "WR", false),
        ];
        let result = filter_rows(&players, None, "", true);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].ranked.display_name, "Tyreek Hill");
    }

    #[test]
    fn filters_compose() {
        let players = vec![
            linked(1, "Justin Jefferson", "WR", true),
            linked(2, "Justin Fields", "QB", false),
            linked(3, "Justin Watson", "WR", false),
        ];
        let result = filter_rows(&players, Some(Position::WideReceiver), "justin", true);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].ranked.display_name, "Justin Watson");
    }

    #[test]
    fn position_colors_are_distinct() {
        let mut colors: Vec<Color> = Position::all()
            .iter()
            .map(|&p| position_color(Some(p)))
            .collect();
        colors.dedup();
        assert_eq!(colors.len(), 6);
    }

    #[test]
    fn drafted_rows_are_dimmed() {
        let style = row_style(&linked(1, "Justin Jefferson", "WR", true));
        assert!(style.add_modifier.contains(Modifier::CROSSED_OUT));
        assert!(style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_players() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.players = vec![
            linked(1, "Justin Jefferson", "WR", false),
            linked(2, "Josh Allen", "QB", true),
        ];
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
