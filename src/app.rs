// Refresh-cycle orchestration.
//
// The central loop that re-runs the whole pipeline (fetch -> normalize ->
// link -> mark drafted) on a timer or on user request and pushes the
// resulting snapshot to the TUI. Each cycle owns its tables end-to-end;
// a new cycle supersedes the previous one. Collaborator failures are
// caught here and converted to empty data plus a visible warning -- the
// loop itself never dies to a failed fetch.

use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::matching::{self, AliasTable};
use crate::player::CanonicalPlayer;
use crate::protocol::{BoardSnapshot, FetchStatus, UiUpdate, UserCommand};
use crate::rankings::{self, RankedPlayer};
use crate::sleeper::{drafted_ids, DraftPick, DraftSource};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Everything the orchestrator owns between cycles.
pub struct AppState<S> {
    pub config: Config,
    pub aliases: AliasTable,
    pub source: S,
    /// Resolved draft id. `None` until the configured id has been probed
    /// successfully; resolution is retried every cycle while it fails.
    pub draft_id: Option<String>,
    directory_cache: TtlCache<Vec<CanonicalPlayer>>,
    rankings_cache: TtlCache<Vec<RankedPlayer>>,
}

impl<S: DraftSource> AppState<S> {
    pub fn new(config: Config, aliases: AliasTable, source: S) -> Self {
        let directory_cache =
            TtlCache::new(Duration::from_secs(config.refresh.directory_ttl_secs));
        let rankings_cache = TtlCache::new(Duration::from_secs(config.refresh.rankings_ttl_secs));
        AppState {
            config,
            aliases,
            source,
            draft_id: None,
            directory_cache,
            rankings_cache,
        }
    }

    /// Run one refresh cycle end to end and produce the board snapshot.
    ///
    /// Never fails: every collaborator error degrades to empty data for
    /// this cycle and a warning carried in the snapshot.
    pub async fn run_cycle(&mut self) -> BoardSnapshot {
        let mut warnings = Vec::new();

        if self.draft_id.is_none() {
            match self.source.resolve_draft_id(&self.config.draft.id).await {
                Ok(id) => {
                    info!("following draft {id}");
                    self.draft_id = Some(id);
                }
                Err(e) => {
                    warn!("draft id resolution failed: {e}");
                    warnings.push(format!("draft lookup failed: {e}"));
                }
            }
        }

        let directory: Vec<CanonicalPlayer> = match self.directory_cache.get() {
            Some(players) => players.clone(),
            None => match self.source.player_directory(&self.config.draft.sport).await {
                Ok(players) => {
                    info!("fetched player directory: {} players", players.len());
                    self.directory_cache.put(players.clone());
                    players
                }
                Err(e) => {
                    warn!("player directory fetch failed: {e}");
                    warnings.push(format!("player directory unavailable: {e}"));
                    Vec::new()
                }
            },
        };

        let ranked: Vec<RankedPlayer> = match self.rankings_cache.get() {
            Some(rows) => rows.clone(),
            None => match rankings::load_all(&self.config.rankings) {
                Ok(rows) => {
                    info!("loaded {} ranking rows", rows.len());
                    self.rankings_cache.put(rows.clone());
                    rows
                }
                Err(e) => {
                    warn!("rankings load failed: {e}");
                    warnings.push(format!("rankings unavailable: {e}"));
                    Vec::new()
                }
            },
        };

        let picks: Vec<DraftPick> = match &self.draft_id {
            Some(id) => match self.source.draft_picks(id).await {
                Ok(picks) => picks,
                Err(e) => {
                    warn!("pick list fetch failed: {e}");
                    warnings.push(format!("pick list unavailable: {e}"));
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        build_snapshot(&ranked, &directory, &self.aliases, &picks, warnings)
    }
}

// ---------------------------------------------------------------------------
// Snapshot assembly (pure)
// ---------------------------------------------------------------------------

/// Join the in-memory tables and assemble the snapshot for rendering.
pub fn build_snapshot(
    ranked: &[RankedPlayer],
    canonical: &[CanonicalPlayer],
    aliases: &AliasTable,
    picks: &[DraftPick],
    warnings: Vec<String>,
) -> BoardSnapshot {
    let mut outcome = matching::link(ranked, canonical, aliases);
    let drafted = drafted_ids(picks);
    let drafted_count = matching::mark_drafted(&mut outcome.linked, &drafted);
    let unmatched = matching::report(&outcome.unmatched, aliases);

    let fetch_status = if warnings.is_empty() {
        FetchStatus::Live
    } else {
        FetchStatus::Degraded
    };

    BoardSnapshot {
        players: outcome.linked,
        unmatched,
        dropped: outcome.dropped,
        pick_count: picks.len(),
        drafted_count,
        fetch_status,
        warnings,
        last_refresh: Local::now(),
    }
}

// ---------------------------------------------------------------------------
// Orchestrator loop
// ---------------------------------------------------------------------------

/// Run refresh cycles until the TUI quits.
///
/// The interval fires immediately on startup, so the first board appears
/// without waiting a full period. `RefreshNow` forces a cycle between
/// ticks; the next scheduled tick is unaffected.
pub async fn run<S: DraftSource>(
    mut state: AppState<S>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
) -> anyhow::Result<()> {
    let mut refresh =
        tokio::time::interval(Duration::from_secs(state.config.refresh.interval_secs));
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                let snapshot = state.run_cycle().await;
                if ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await.is_err() {
                    break;
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::RefreshNow) => {
                        let snapshot = state.run_cycle().await;
                        if ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await.is_err() {
                            break;
                        }
                    }
                    Some(UserCommand::Quit) | None => break,
                }
            }
        }
    }

    info!("orchestrator loop finished");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
