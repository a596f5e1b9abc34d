// Keyboard input handling.
//
// Quit keys (q, Ctrl+C) are handled by the main loop before delegation;
// everything else lands here. Display toggles mutate `ViewState`
// directly; only actions the orchestrator owns become `UserCommand`s.

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::player::Position;
use crate::protocol::UserCommand;
use crate::tui::ViewState;

/// Handle a single key event.
pub async fn handle_key(
    key: KeyEvent,
    state: &mut ViewState,
    cmd_tx: &mpsc::Sender<UserCommand>,
) {
    if state.filter_mode {
        handle_filter_mode_key(key, state);
        return;
    }

    match key.code {
        KeyCode::Char('r') => {
            let _ = cmd_tx.send(UserCommand::RefreshNow).await;
        }
        KeyCode::Char('u') => {
            state.show_unmatched = !state.show_unmatched;
        }
        KeyCode::Char('d') => {
            state.hide_drafted = !state.hide_drafted;
        }
        KeyCode::Char('/') => {
            state.filter_mode = true;
        }
        KeyCode::Char('0') => {
            state.position_filter = None;
        }
        KeyCode::Char(c @ '1'..='6') => {
            let idx = (c as u8 - b'1') as usize;
            state.position_filter = Some(Position::all()[idx]);
        }
        KeyCode::Esc => {
            state.filter_text.clear();
            state.position_filter = None;
        }
        _ => {}
    }
}

/// Keys while the filter input is capturing text.
fn handle_filter_mode_key(key: KeyEvent, state: &mut ViewState) {
    match key.code {
        KeyCode::Enter => {
            state.filter_mode = false;
        }
        KeyCode::Esc => {
            state.filter_mode = false;
            state.filter_text.clear();
        }
        KeyCode::Backspace => {
            state.filter_text.pop();
        }
        KeyCode::Char(c) => {
            state.filter_text.push(c);
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
