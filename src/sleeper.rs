// Sleeper API client.
//
// Read-only consumer of the public Sleeper HTTP API: player directory,
// draft picks, and league -> draft resolution. Responses are decoded into
// structs whose fields are all optional; absent fields degrade to unset
// rather than failing the cycle.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::player::{CanonicalPlayer, Position};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SLEEPER_API_BASE: &str = "https://api.sleeper.app/v1";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SleeperError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("unexpected JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{id}' is not a known Sleeper league or draft ID")]
    UnknownId { id: String },
}

// ---------------------------------------------------------------------------
// Public pick type
// ---------------------------------------------------------------------------

/// One pick from the upstream draft, reduced to the fields the board needs.
#[derive(Debug, Clone, Default)]
pub struct DraftPick {
    /// Sequential pick number, when the upstream reports one.
    pub pick_no: Option<u32>,
    /// Canonical player id of the selected player.
    pub player_id: Option<String>,
    /// Display name assembled from pick metadata, for the log line.
    pub player_name: Option<String>,
    pub position: Option<Position>,
    pub team: Option<String>,
}

/// Collect the set of canonical ids already selected in the draft.
/// Picks that carry no player id are ignored.
pub fn drafted_ids(picks: &[DraftPick]) -> HashSet<String> {
    picks
        .iter()
        .filter_map(|p| p.player_id.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Raw wire structs (private)
// ---------------------------------------------------------------------------

/// One entry of the `/players/{sport}` directory map. Team defenses carry
/// no `full_name`; their name is assembled from first/last (city/nickname).
#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(default)]
    player_id: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    team: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPick {
    #[serde(default)]
    pick_no: Option<u32>,
    #[serde(default)]
    player_id: Option<String>,
    #[serde(default)]
    metadata: Option<RawPickMetadata>,
}

#[derive(Debug, Deserialize)]
struct RawPickMetadata {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    team: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLeague {
    #[serde(default)]
    league_id: Option<String>,
    #[serde(default)]
    draft_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDraft {
    #[serde(default)]
    draft_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire -> domain conversion (private, unit-test targets)
// ---------------------------------------------------------------------------

/// Assemble a display name from the optional name fields.
fn display_name(full: Option<&str>, first: Option<&str>, last: Option<&str>) -> Option<String> {
    if let Some(name) = full {
        let name = name.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    let joined = [first, last]
        .iter()
        .filter_map(|part| part.map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn directory_from_map(map: HashMap<String, RawPlayer>) -> Vec<CanonicalPlayer> {
    let mut players = Vec::with_capacity(map.len());
    for (key, raw) in map {
        let Some(name) = display_name(
            raw.full_name.as_deref(),
            raw.first_name.as_deref(),
            raw.last_name.as_deref(),
        ) else {
            debug!("directory entry '{key}' has no usable name, skipping");
            continue;
        };
        players.push(CanonicalPlayer {
            id: raw.player_id.unwrap_or(key),
            display_name: name,
            position: raw.position.as_deref().and_then(Position::from_str_pos),
            team: raw
                .team
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty()),
        });
    }
    players
}

fn picks_from_raw(raw: Vec<RawPick>) -> Vec<DraftPick> {
    raw.into_iter()
        .map(|pick| {
            let meta = pick.metadata;
            let (name, position, team) = match meta {
                Some(m) => (
                    display_name(None, m.first_name.as_deref(), m.last_name.as_deref()),
                    m.position.as_deref().and_then(Position::from_str_pos),
                    m.team
                        .map(|t| t.trim().to_uppercase())
                        .filter(|t| !t.is_empty()),
                ),
                None => (None, None, None),
            };
            DraftPick {
                pick_no: pick.pick_no,
                player_id: pick.player_id,
                player_name: name,
                position,
                team,
            }
        })
        .collect()
}

fn parse_directory(body: &str) -> Result<Vec<CanonicalPlayer>, serde_json::Error> {
    let map: HashMap<String, RawPlayer> = serde_json::from_str(body)?;
    Ok(directory_from_map(map))
}

fn parse_picks(body: &str) -> Result<Vec<DraftPick>, serde_json::Error> {
    let raw: Vec<RawPick> = serde_json::from_str(body)?;
    Ok(picks_from_raw(raw))
}

// ---------------------------------------------------------------------------
// DraftSource trait
// ---------------------------------------------------------------------------

/// Seam over the upstream API so the refresh cycle can run against
/// in-memory fixtures in tests.
#[async_trait]
pub trait DraftSource: Send + Sync {
    /// Resolve the configured id (league or draft) to a draft id.
    async fn resolve_draft_id(&self, id: &str) -> Result<String, SleeperError>;

    /// Fetch the canonical player directory for a sport.
    async fn player_directory(&self, sport: &str) -> Result<Vec<CanonicalPlayer>, SleeperError>;

    /// Fetch the ordered pick list for a draft.
    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<DraftPick>, SleeperError>;
}

// ---------------------------------------------------------------------------
// SleeperClient
// ---------------------------------------------------------------------------

/// HTTP implementation of [`DraftSource`] against the public Sleeper API.
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl SleeperClient {
    /// Create a client with the given fixed request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(SleeperClient {
            http,
            base_url: SLEEPER_API_BASE.to_string(),
        })
    }

    /// Point the client at a different base URL (local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// GET `{base}/{path}` and return the body text.
    ///
    /// When `probe` is set, HTTP 404 yields `Ok(None)` instead of an error;
    /// that is how Sleeper answers probes for ids that do not exist.
    async fn get_text(&self, path: &str, probe: bool) -> Result<Option<String>, SleeperError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SleeperError::Transport {
                endpoint: path.to_string(),
                source: e,
            })?;

        let status = response.status();
        if probe && status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SleeperError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SleeperError::Transport {
            endpoint: path.to_string(),
            source: e,
        })?;
        Ok(Some(body))
    }

    /// GET and decode a probe endpoint; a `null` body also yields `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, SleeperError> {
        let Some(body) = self.get_text(path, true).await? else {
            return Ok(None);
        };
        serde_json::from_str::<Option<T>>(&body).map_err(|e| SleeperError::Decode {
            endpoint: path.to_string(),
            source: e,
        })
    }

    /// Probe the id as a league: use the league's draft_id when present,
    /// else the most recent entry from the league's draft list.
    async fn try_league(&self, id: &str) -> Result<Option<String>, SleeperError> {
        let league = match self.get_json::<RawLeague>(&format!("league/{id}")).await? {
            Some(league) if league.league_id.is_some() => league,
            _ => return Ok(None),
        };

        if let Some(draft_id) = league.draft_id {
            return Ok(Some(draft_id));
        }

        // Older leagues omit draft_id on the league object; the drafts
        // list is sorted most recent first.
        let drafts = self
            .get_json::<Vec<RawDraft>>(&format!("league/{id}/drafts"))
            .await?
            .unwrap_or_default();
        Ok(drafts.into_iter().find_map(|d| d.draft_id))
    }

    /// Probe the id as a draft directly.
    async fn try_draft(&self, id: &str) -> Result<Option<String>, SleeperError> {
        let draft = self.get_json::<RawDraft>(&format!("draft/{id}")).await?;
        Ok(draft.and_then(|d| d.draft_id))
    }
}

#[async_trait]
impl DraftSource for SleeperClient {
    async fn resolve_draft_id(&self, id: &str) -> Result<String, SleeperError> {
        if let Some(draft_id) = self.try_league(id).await? {
            info!("detected league id {id}, following draft {draft_id}");
            return Ok(draft_id);
        }
        if let Some(draft_id) = self.try_draft(id).await? {
            info!("detected draft id {draft_id}");
            return Ok(draft_id);
        }
        Err(SleeperError::UnknownId { id: id.to_string() })
    }

    async fn player_directory(&self, sport: &str) -> Result<Vec<CanonicalPlayer>, SleeperError> {
        let path = format!("players/{sport}");
        let body = self
            .get_text(&path, false)
            .await?
            .unwrap_or_default();
        parse_directory(&body).map_err(|e| SleeperError::Decode {
            endpoint: path,
            source: e,
        })
    }

    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<DraftPick>, SleeperError> {
        let path = format!("draft/{draft_id}/picks");
        let body = self
            .get_text(&path, false)
            .await?
            .unwrap_or_default();
        parse_picks(&body).map_err(|e| SleeperError::Decode {
            endpoint: path,
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
