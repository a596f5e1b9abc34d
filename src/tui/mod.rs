// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the latest board snapshot plus
// display-only toggles (position filter, text filter, panel visibility).
// The orchestrator pushes `UiUpdate` messages over an mpsc channel; the
// TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream, KeyCode, KeyModifiers};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::matching::LinkedPlayer;
use crate::player::Position;
use crate::protocol::{BoardSnapshot, FetchStatus, UiUpdate, UserCommand};
use crate::rankings::RankedPlayer;

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the latest snapshot for rendering.
pub struct ViewState {
    /// Linked board rows from the latest snapshot.
    pub players: Vec<LinkedPlayer>,
    /// Deduplicated unmatched rows from the latest snapshot.
    pub unmatched: Vec<RankedPlayer>,
    /// Duplicate rows dropped from the display set (debug view).
    pub dropped: Vec<LinkedPlayer>,
    pub pick_count: usize,
    pub drafted_count: usize,
    pub fetch_status: FetchStatus,
    pub warnings: Vec<String>,
    /// When the last snapshot arrived. `None` before the first cycle.
    pub last_refresh: Option<DateTime<Local>>,
    /// Position filter for the board table.
    pub position_filter: Option<Position>,
    /// Current name search text.
    pub filter_text: String,
    /// Whether the filter input is capturing keystrokes.
    pub filter_mode: bool,
    /// Whether the unmatched panel is visible.
    pub show_unmatched: bool,
    /// Whether drafted players are hidden from the board.
    pub hide_drafted: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            players: Vec::new(),
            unmatched: Vec::new(),
            dropped: Vec::new(),
            pick_count: 0,
            drafted_count: 0,
            fetch_status: FetchStatus::Live,
            warnings: Vec::new(),
            last_refresh: None,
            position_filter: None,
            filter_text: String::new(),
            filter_mode: false,
            show_unmatched: false,
            hide_drafted: false,
        }
    }
}

impl ViewState {
    /// Replace the mirrored snapshot fields wholesale. Display toggles
    /// (filters, panel visibility) are left unchanged.
    pub fn apply_snapshot(&mut self, snapshot: BoardSnapshot) {
        self.players = snapshot.players;
        self.unmatched = snapshot.unmatched;
        self.dropped = snapshot.dropped;
        self.pick_count = snapshot.pick_count;
        self.drafted_count = snapshot.drafted_count;
        self.fetch_status = snapshot.fetch_status;
        self.warnings = snapshot.warnings;
        self.last_refresh = Some(snapshot.last_refresh);
    }
}

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.show_unmatched);

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::board::render(frame, layout.board, state);
    if let Some(area) = layout.unmatched {
        widgets::unmatched::render(frame, area, state);
    }
    widgets::help_bar::render(frame, layout.help_bar, state);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Restore the terminal on crash; chain the original hook after ours.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Snapshots from the orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: orchestrator is shutting down.
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(KeyModifiers::CONTROL)
                        {
                            let _ = cmd_tx.send(UserCommand::Quit).await;
                            break;
                        }
                        if key_event.code == KeyCode::Char('q') && !view_state.filter_mode {
                            let _ = cmd_tx.send(UserCommand::Quit).await;
                            break;
                        }
                        input::handle_key(key_event, &mut view_state, &cmd_tx).await;
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- ignore.
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
