// Draft board entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config and alias table
// 3. Build the Sleeper API client
// 4. Create mpsc channels
// 5. Spawn the refresh orchestrator task
// 6. Run the TUI event loop (blocking until the user quits)
// 7. Cleanup on exit

use draft_board::app;
use draft_board::config;
use draft_board::matching::AliasTable;
use draft_board::sleeper::SleeperClient;
use draft_board::tui;

use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Draft board starting up");

    // 2. Load config and alias table
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: id={}, sport={}, {} ranking section(s), refresh every {}s",
        config.draft.id,
        config.draft.sport,
        config.rankings.len(),
        config.refresh.interval_secs
    );

    let aliases = AliasTable::from_pairs(config.aliases.clone());
    info!("Alias table loaded: {} entries", aliases.len());

    // 3. Build the Sleeper API client
    let client = SleeperClient::new(Duration::from_secs(config.refresh.http_timeout_secs))
        .context("failed to build HTTP client")?;

    // 4. Create mpsc channels
    let (ui_tx, ui_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);

    // 5. Spawn the refresh orchestrator task
    let state = app::AppState::new(config, aliases, client);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(state, cmd_rx, ui_tx).await {
            error!("Orchestrator loop error: {e}");
        }
    });

    // 6. Run the TUI event loop (blocking until the user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {e}");
    }

    // 7. Cleanup: wait for the orchestrator to wind down (with timeout)
    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Draft board shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by
/// the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draft-board.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draft_board=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
