// Ranking table loading and column normalization.
//
// Reads delimited ranking exports whose column headers vary by source
// ("Player" vs "Name", "Pos" vs "Position"). Headers are resolved by
// case-insensitive synonym lookup; only the player-name column is
// required. Malformed rows are skipped with a warning, a missing name
// column is a configuration error.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::warn;

use crate::config::RankingSource;
use crate::player::Position;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One row of an externally supplied ranking table.
#[derive(Debug, Clone)]
pub struct RankedPlayer {
    /// 1-based overall rank. Assigned sequentially within the file when
    /// the source has no usable rank column.
    pub rank: Option<u32>,
    /// Free-text player name as spelled by the ranking source.
    pub display_name: String,
    pub position: Option<Position>,
    /// Uppercased team abbreviation, when the source provides one.
    pub team: Option<String>,
    /// Which ranking section this row came from.
    pub source_list: String,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RankingsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("no player-name column in {path} (looked for: player, name, player name, full name)")]
    MissingNameColumn { path: String },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

const NAME_HEADERS: &[&str] = &["player", "name", "player name", "full name"];
const RANK_HEADERS: &[&str] = &["rank", "rk", "overall", "overall rank", "#", "no", "num"];
const POSITION_HEADERS: &[&str] = &["pos", "position"];
const TEAM_HEADERS: &[&str] = &["team", "tm", "nfl team", "club"];

/// Resolved column indices for one ranking file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    name: usize,
    rank: Option<usize>,
    position: Option<usize>,
    team: Option<usize>,
}

/// Match headers against the synonym lists, case-insensitively. The first
/// header matching a synonym wins for each column.
fn resolve_columns(headers: &StringRecord) -> Option<ColumnMap> {
    let find = |synonyms: &[&str]| {
        headers
            .iter()
            .position(|h| synonyms.contains(&h.trim().to_lowercase().as_str()))
    };

    Some(ColumnMap {
        name: find(NAME_HEADERS)?,
        rank: find(RANK_HEADERS),
        position: find(POSITION_HEADERS),
        team: find(TEAM_HEADERS),
    })
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_from_reader<R: Read>(
    rdr: R,
    source_list: &str,
    path: &str,
) -> Result<Vec<RankedPlayer>, RankingsError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);

    let headers = reader.headers().map_err(|e| RankingsError::Csv {
        path: path.to_string(),
        source: e,
    })?;
    let columns = resolve_columns(headers).ok_or_else(|| RankingsError::MissingNameColumn {
        path: path.to_string(),
    })?;

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping malformed ranking row in {path}: {e}");
                continue;
            }
        };

        let name = record.get(columns.name).unwrap_or("").trim();
        if name.is_empty() {
            warn!("skipping ranking row {} in {path}: empty player name", line + 2);
            continue;
        }

        let rank = columns
            .rank
            .and_then(|i| record.get(i))
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&r| r >= 1);

        let position = columns
            .position
            .and_then(|i| record.get(i))
            .and_then(Position::from_str_pos);

        let team = columns
            .team
            .and_then(|i| record.get(i))
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty());

        rows.push(RankedPlayer {
            rank,
            display_name: name.to_string(),
            position,
            team,
            source_list: source_list.to_string(),
        });
    }

    // Rows without a usable rank get sequential values after the highest
    // explicit rank, preserving file order.
    let mut next = rows.iter().filter_map(|r| r.rank).max().unwrap_or(0);
    for row in rows.iter_mut().filter(|r| r.rank.is_none()) {
        next += 1;
        row.rank = Some(next);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load one ranking file, tagging every row with `source_list`.
pub fn load_ranking_file(path: &Path, source_list: &str) -> Result<Vec<RankedPlayer>, RankingsError> {
    let file = std::fs::File::open(path).map_err(|e| RankingsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_from_reader(file, source_list, &path.display().to_string())
}

/// Load every configured ranking section and concatenate the rows in
/// configuration order.
pub fn load_all(sources: &[RankingSource]) -> Result<Vec<RankedPlayer>, RankingsError> {
    let mut all = Vec::new();
    for source in sources {
        let rows = load_ranking_file(Path::new(&source.path), &source.name)?;
        if rows.is_empty() {
            warn!("ranking section '{}' produced zero valid rows", source.name);
        }
        all.extend(rows);
    }

    if all.is_empty() {
        return Err(RankingsError::Validation(
            "ranking files produced zero valid rows".into(),
        ));
    }

    Ok(all)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
