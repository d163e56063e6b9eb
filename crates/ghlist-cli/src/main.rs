//! ghlist - browse GitHub users from the terminal, online or off.
//!
//! Syncs the public user list with profiles and avatars into a local cache,
//! then serves every command from that cache when GitHub is unreachable.

mod app;
mod cli;
mod render;
mod utils;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ghlist_core::Config;

use app::App;
use cli::{Cli, Command, TokenAction};

/// Log file prefix inside `<cache>/logs`
const LOG_FILE_NAME: &str = "ghlist.log";

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g. RUST_LOG=ghlist_core=debug).
/// When a log directory is given, events are also written to a daily file.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let log_dir = config.cache_dir().ok().map(|dir| dir.join("logs"));
    let _guard = init_tracing(log_dir.as_deref());
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    info!("ghlist starting");

    if let Command::Token { action } = &cli.command {
        return match action {
            TokenAction::Set => app::set_token(),
            TokenAction::Clear => app::clear_token(),
        };
    }

    let app = App::new(config)?;
    match cli.command {
        Command::Sync { offline } => app.run_sync(offline).await,
        Command::Show { login } => app.show(&login).await,
        Command::Refresh { login } => app.refresh(&login).await,
        Command::Avatar { id, out } => app.write_avatar(id, &out),
        Command::Status => app.status().await,
        Command::Net { interval } => app.watch_network(Duration::from_secs(interval.max(1))).await,
        Command::Token { .. } => unreachable!("handled above"),
    }
}
