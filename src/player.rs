// Player positions and the canonical player directory record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fantasy-relevant NFL positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles the abbreviations used by Sleeper and by common ranking
    /// exports:
    /// - "QB"/"RB"/"WR"/"TE" map directly
    /// - "K" and "PK" -> Kicker
    /// - "DEF", "DST", "D/ST" -> Defense
    /// - Trailing positional-rank digits are ignored ("WR12" -> WideReceiver)
    pub fn from_str_pos(s: &str) -> Option<Self> {
        let trimmed = s.trim().trim_end_matches(|c: char| c.is_ascii_digit());
        match trimmed.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
        }
    }

    /// Deterministic ordering index for grouped display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Kicker => 4,
            Position::Defense => 5,
        }
    }

    /// All positions in display order, for filter cycling.
    pub fn all() -> [Position; 6] {
        [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Kicker,
            Position::Defense,
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// An entry in the upstream authoritative player directory.
///
/// Sourced wholesale from Sleeper's `/players/{sport}` endpoint and
/// refreshed periodically. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPlayer {
    /// Stable opaque identifier assigned by the directory.
    pub id: String,
    /// Display name as reported by the directory.
    pub display_name: String,
    /// Primary position, if the directory reports one.
    pub position: Option<Position>,
    /// Uppercased team abbreviation, if currently rostered.
    pub team: Option<String>,
}
