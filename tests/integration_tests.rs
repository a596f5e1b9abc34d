// Integration tests for the draft board.
//
// These tests exercise the full refresh pipeline end-to-end using the
// library crate's public API: rankings ingestion, normalization and
// linkage against a canonical directory, drafted-pick marking, and the
// orchestrator loop, all driven through an in-memory DraftSource stub.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use draft_board::app::{self, AppState};
use draft_board::config::{Config, DraftConfig, RefreshConfig, RankingSource};
use draft_board::matching::AliasTable;
use draft_board::player::{CanonicalPlayer, Position};
use draft_board::protocol::{FetchStatus, UiUpdate, UserCommand};
use draft_board::sleeper::{DraftPick, DraftSource, SleeperError};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd
/// for `cargo test`).
const FIXTURES: &str = "tests/fixtures";

/// Build a test Config pointing at the given ranking file.
fn inline_config(rankings_path: &str) -> Config {
    Config {
        draft: DraftConfig {
            id: "league-1".to_string(),
            sport: "nfl".to_string(),
        },
        refresh: RefreshConfig {
            interval_secs: 30,
            http_timeout_secs: 10,
            directory_ttl_secs: 3600,
            rankings_ttl_secs: 300,
        },
        rankings: vec![RankingSource {
            name: "overall".to_string(),
            path: rankings_path.to_string(),
        }],
        aliases: HashMap::new(),
    }
}

/// The alias table the fixture rankings need.
fn fixture_aliases() -> AliasTable {
    AliasTable::from_pairs([("d k metcalf", "dk metcalf")])
}

fn canonical(id: &str, name: &str, pos: &str, team: Option<&str>) -> CanonicalPlayer {
    CanonicalPlayer {
        id: id.to_string(),
        display_name: name.to_string(),
        position: Position::from_str_pos(pos),
        team: team.map(|t| t.to_string()),
    }
}

/// The directory the fixture rankings link against. Bob Smith has changed
/// teams (NYJ -> NYG) and the directory spells Jose Ramirez without
/// diacritics.
fn fixture_directory() -> Vec<CanonicalPlayer> {
    vec![
        canonical("4034", "Justin Jefferson", "WR", Some("MIN")),
        canonical("7564", "Ja'Marr Chase", "WR", Some("CIN")),
        canonical("5846", "DK Metcalf", "WR", Some("SEA")),
        canonical("100", "Bob Smith", "RB", Some("NYG")),
        canonical("200", "Jose Ramirez", "TE", Some("CLE")),
    ]
}

fn pick(player_id: &str) -> DraftPick {
    DraftPick {
        player_id: Some(player_id.to_string()),
        ..Default::default()
    }
}

/// In-memory DraftSource with switchable failure modes.
struct StubSource {
    directory: Vec<CanonicalPlayer>,
    picks: Vec<DraftPick>,
    resolve_fails: bool,
    directory_fails: bool,
    picks_fail: bool,
}

impl StubSource {
    fn new(directory: Vec<CanonicalPlayer>, picks: Vec<DraftPick>) -> Self {
        StubSource {
            directory,
            picks,
            resolve_fails: false,
            directory_fails: false,
            picks_fail: false,
        }
    }
}

#[async_trait]
impl DraftSource for StubSource {
    async fn resolve_draft_id(&self, id: &str) -> Result<String, SleeperError> {
        if self.resolve_fails {
            return Err(SleeperError::UnknownId { id: id.to_string() });
        }
        Ok(format!("draft-for-{id}"))
    }

    async fn player_directory(&self, _sport: &str) -> Result<Vec<CanonicalPlayer>, SleeperError> {
        if self.directory_fails {
            return Err(SleeperError::Status {
                endpoint: "players/nfl".to_string(),
                status: 503,
            });
        }
        Ok(self.directory.clone())
    }

    async fn draft_picks(&self, _draft_id: &str) -> Result<Vec<DraftPick>, SleeperError> {
        if self.picks_fail {
            return Err(SleeperError::Status {
                endpoint: "draft/x/picks".to_string(),
                status: 500,
            });
        }
        Ok(self.picks.clone())
    }
}

fn fixture_state(picks: Vec<DraftPick>) -> AppState<StubSource> {
    let config = inline_config(&format!("{FIXTURES}/rankings.csv"));
    let source = StubSource::new(fixture_directory(), picks);
    AppState::new(config, fixture_aliases(), source)
}

// ===========================================================================
// Full-cycle linkage
// ===========================================================================

#[tokio::test]
async fn full_cycle_links_every_fixture_row() {
    let mut state = fixture_state(Vec::new());
    let snapshot = state.run_cycle().await;

    // All five fixture rows link: exact, punctuation-stripped, aliased,
    // team-changed (relaxed pass), and diacritic-stripped.
    assert_eq!(snapshot.fetch_status, FetchStatus::Live);
    assert_eq!(snapshot.players.len(), 5);
    assert!(snapshot.unmatched.is_empty());

    let ids: Vec<&str> = snapshot
        .players
        .iter()
        .map(|p| p.canonical_id.as_deref().unwrap())
        .collect();
    assert_eq!(ids, vec!["4034", "7564", "5846", "100", "200"]);
}

#[tokio::test]
async fn full_cycle_preserves_ranking_order() {
    let mut state = fixture_state(Vec::new());
    let snapshot = state.run_cycle().await;

    let ranks: Vec<u32> = snapshot
        .players
        .iter()
        .map(|p| p.ranked.rank.unwrap())
        .collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn drafted_players_marked_from_picks() {
    let mut state = fixture_state(vec![pick("4034"), pick("5846")]);
    let snapshot = state.run_cycle().await;

    assert_eq!(snapshot.pick_count, 2);
    assert_eq!(snapshot.drafted_count, 2);
    let drafted: Vec<&str> = snapshot
        .players
        .iter()
        .filter(|p| p.drafted)
        .map(|p| p.ranked.display_name.as_str())
        .collect();
    assert_eq!(drafted, vec!["Justin Jefferson", "D. K. Metcalf"]);
}

#[tokio::test]
async fn picks_without_player_ids_do_not_mark_anyone() {
    let mut state = fixture_state(vec![DraftPick::default(), DraftPick::default()]);
    let snapshot = state.run_cycle().await;

    assert_eq!(snapshot.pick_count, 2);
    assert_eq!(snapshot.drafted_count, 0);
}

// ===========================================================================
// Matching scenarios
// ===========================================================================

#[tokio::test]
async fn alias_bridges_punctuated_name() {
    // Scenario A: "D. K. Metcalf" (WR, SEA) matches "DK Metcalf" (WR, SEA)
    // on the strict pass through the alias table.
    let mut state = fixture_state(Vec::new());
    let snapshot = state.run_cycle().await;

    let metcalf = snapshot
        .players
        .iter()
        .find(|p| p.ranked.display_name == "D. K. Metcalf")
        .expect("Metcalf row should link");
    assert_eq!(metcalf.canonical_id.as_deref(), Some("5846"));
}

#[tokio::test]
async fn team_change_recovered_by_relaxed_pass() {
    // Scenario B: ranking says NYJ, directory says NYG.
    let mut state = fixture_state(Vec::new());
    let snapshot = state.run_cycle().await;

    let smith = snapshot
        .players
        .iter()
        .find(|p| p.ranked.display_name == "Bob Smith")
        .expect("Smith row should link");
    assert_eq!(smith.canonical_id.as_deref(), Some("100"));
}

#[tokio::test]
async fn empty_directory_reports_deduplicated_unmatched() {
    // Scenario C: directory fetch fails, ten ranked rows (with one
    // duplicate identity) end up as nine deduplicated unmatched entries.
    let tmp = std::env::temp_dir().join("draftboard_it_scenario_c.csv");
    let mut csv = String::from("Rank,Player,Pos,Team\n");
    for i in 1..=9 {
        csv.push_str(&format!("{i},Player {i},RB,DAL\n"));
    }
    csv.push_str("10,Player 9,RB,DAL\n");
    std::fs::write(&tmp, csv).unwrap();

    let config = inline_config(&tmp.display().to_string());
    let mut source = StubSource::new(Vec::new(), Vec::new());
    source.directory_fails = true;
    let mut state = AppState::new(config, AliasTable::default(), source);

    let snapshot = state.run_cycle().await;
    assert_eq!(snapshot.fetch_status, FetchStatus::Degraded);
    assert!(snapshot.players.is_empty());
    assert_eq!(snapshot.unmatched.len(), 9);
    assert!(snapshot
        .warnings
        .iter()
        .any(|w| w.contains("player directory unavailable")));
}

#[tokio::test]
async fn duplicate_ranked_rows_keep_lower_rank() {
    // Scenario D: two rows for the same identity; the display set keeps
    // the lower rank and the duplicate lands in the debug view.
    let tmp = std::env::temp_dir().join("draftboard_it_scenario_d.csv");
    std::fs::write(
        &tmp,
        "Rank,Player,Pos,Team\n5,John Doe,RB,DAL\n30,JOHN  DOE,RB,DAL\n",
    )
    .unwrap();

    let config = inline_config(&tmp.display().to_string());
    let source = StubSource::new(
        vec![canonical("100", "John Doe", "RB", Some("DAL"))],
        Vec::new(),
    );
    let mut state = AppState::new(config, AliasTable::default(), source);

    let snapshot = state.run_cycle().await;
    assert_eq!(snapshot.players.len(), 1);
    assert_eq!(snapshot.players[0].ranked.rank, Some(5));
    assert_eq!(snapshot.dropped.len(), 1);
    assert_eq!(snapshot.dropped[0].ranked.rank, Some(30));
    assert!(snapshot.unmatched.is_empty());
}

#[tokio::test]
async fn failed_pick_fetch_degrades_without_crashing() {
    // Scenario E: the picks endpoint answers HTTP 500; the cycle reports
    // zero drafted players plus a visible warning.
    let config = inline_config(&format!("{FIXTURES}/rankings.csv"));
    let mut source = StubSource::new(fixture_directory(), vec![pick("4034")]);
    source.picks_fail = true;
    let mut state = AppState::new(config, fixture_aliases(), source);

    let snapshot = state.run_cycle().await;
    assert_eq!(snapshot.fetch_status, FetchStatus::Degraded);
    assert_eq!(snapshot.drafted_count, 0);
    assert_eq!(snapshot.pick_count, 0);
    assert!(snapshot
        .warnings
        .iter()
        .any(|w| w.contains("pick list unavailable")));
    // The board still shows the full linked table.
    assert_eq!(snapshot.players.len(), 5);
}

#[tokio::test]
async fn unknown_id_degrades_and_is_retried_next_cycle() {
    let config = inline_config(&format!("{FIXTURES}/rankings.csv"));
    let mut source = StubSource::new(fixture_directory(), Vec::new());
    source.resolve_fails = true;
    let mut state = AppState::new(config, fixture_aliases(), source);

    let snapshot = state.run_cycle().await;
    assert_eq!(snapshot.fetch_status, FetchStatus::Degraded);
    assert!(snapshot
        .warnings
        .iter()
        .any(|w| w.contains("draft lookup failed")));

    // Resolution succeeds once the upstream recovers.
    state.source.resolve_fails = false;
    let snapshot = state.run_cycle().await;
    assert_eq!(snapshot.fetch_status, FetchStatus::Live);
    assert_eq!(state.draft_id.as_deref(), Some("draft-for-league-1"));
}

// ===========================================================================
// Orchestrator loop
// ===========================================================================

#[tokio::test]
async fn orchestrator_pushes_snapshot_and_quits() {
    let state = fixture_state(vec![pick("4034")]);
    let (ui_tx, mut ui_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);

    let handle = tokio::spawn(app::run(state, cmd_rx, ui_tx));

    // The interval fires immediately, so the first snapshot arrives fast.
    let update = tokio::time::timeout(Duration::from_secs(5), ui_rx.recv())
        .await
        .expect("snapshot should arrive before the timeout")
        .expect("channel should be open");

    let UiUpdate::Snapshot(snapshot) = update;
    assert_eq!(snapshot.players.len(), 5);
    assert_eq!(snapshot.drafted_count, 1);

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop should exit after Quit")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn refresh_now_forces_an_extra_cycle() {
    let mut state = fixture_state(Vec::new());
    // A long interval so only the startup tick and RefreshNow produce
    // snapshots during the test window.
    state.config.refresh.interval_secs = 3600;

    let (ui_tx, mut ui_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let handle = tokio::spawn(app::run(state, cmd_rx, ui_tx));

    // Startup snapshot.
    tokio::time::timeout(Duration::from_secs(5), ui_rx.recv())
        .await
        .expect("startup snapshot")
        .expect("channel open");

    cmd_tx.send(UserCommand::RefreshNow).await.unwrap();
    let update = tokio::time::timeout(Duration::from_secs(5), ui_rx.recv())
        .await
        .expect("forced snapshot should arrive")
        .expect("channel open");
    let UiUpdate::Snapshot(snapshot) = update;
    assert_eq!(snapshot.players.len(), 5);

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
}

#[tokio::test]
async fn dropping_the_ui_receiver_stops_the_loop() {
    let state = fixture_state(Vec::new());
    let (ui_tx, ui_rx) = mpsc::channel(16);
    let (_cmd_tx, cmd_rx) = mpsc::channel::<UserCommand>(16);

    drop(ui_rx);
    let handle = tokio::spawn(app::run(state, cmd_rx, ui_tx));
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop should exit when the TUI side is gone")
        .unwrap()
        .unwrap();
}
