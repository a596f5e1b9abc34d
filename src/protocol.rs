// Message types exchanged between the refresh orchestrator and the TUI.

use chrono::{DateTime, Local};

use crate::matching::LinkedPlayer;
use crate::rankings::RankedPlayer;

/// Whether the last cycle fetched everything it needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// All collaborators answered.
    Live,
    /// At least one collaborator failed; the board shows what it could get.
    Degraded,
}

/// The complete result of one refresh cycle, recomputed from scratch and
/// handed to the TUI for rendering. A new snapshot supersedes the previous
/// one wholesale; nothing is merged across cycles.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    /// Display set: linked rows, order-preserving, deduplicated.
    pub players: Vec<LinkedPlayer>,
    /// Rows that failed linkage, deduplicated by name for review.
    pub unmatched: Vec<RankedPlayer>,
    /// Rows removed from the display set by deduplication (debug view).
    pub dropped: Vec<LinkedPlayer>,
    /// Number of picks the upstream draft reported this cycle.
    pub pick_count: usize,
    /// Number of board rows marked as drafted.
    pub drafted_count: usize,
    pub fetch_status: FetchStatus,
    /// Human-readable collaborator failures, shown in the status bar.
    pub warnings: Vec<String>,
    pub last_refresh: DateTime<Local>,
}

/// Updates pushed from the orchestrator to the TUI render loop.
#[derive(Debug)]
pub enum UiUpdate {
    Snapshot(Box<BoardSnapshot>),
}

/// Commands sent from the TUI back to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Quit,
    RefreshNow,
}
