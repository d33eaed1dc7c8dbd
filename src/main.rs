// Tavares School Admin - terminal client for the school REST API
//
// Manages courses, students and the enrollments linking them.
//
// Architecture:
// - API client (reqwest): one method per backend endpoint, typed records
// - Admin state: tabs, listings, forms and prompts; emits Commands and
//   applies their Outcomes, never awaits itself
// - TUI (ratatui): runs Commands on spawned tasks, feeds Outcomes back over
//   an mpsc channel
// - CLI (clap): one-shot commands running the same forms and Commands inline

mod admin;
mod api;
mod cli;
mod config;
mod logging;
mod model;
mod tui;
mod validation;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use api::ApiClient;
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, LogRotation};
use logging::{LogBuffer, TuiLogLayer};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management needs no logging or client
    if let Some(Commands::Config {
        show,
        reset,
        edit,
        path,
    }) = cli.command
    {
        cli::handle_config(show, reset, edit, path);
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }

    let interactive = cli.command.is_none();
    let log_buffer = LogBuffer::new();

    // Keep the guard alive so buffered file logs flush on exit
    let _file_guard = init_tracing(&config, interactive, &log_buffer);

    let client = ApiClient::new(config.api_url.clone(), &config.client_options())
        .context("Failed to create API client")?;

    match cli.command {
        None => {
            tracing::info!("Starting TUI against {}", client.base_url());
            tui::run_tui(config, client, log_buffer).await
        }
        Some(command) => cli::run_entity(command, &client, cli.yes).await,
    }
}

/// Install the global subscriber
///
/// In TUI mode events go to the in-memory buffer (stderr would garble the
/// alternate screen); otherwise to stderr. Optionally also to JSON log files.
/// Precedence: RUST_LOG env var > config file > default "info".
fn init_tracing(config: &Config, interactive: bool, log_buffer: &LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!(
        "tavares={},reqwest=warn,hyper=warn",
        config.logging.level
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let tui_layer = interactive.then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer =
        (!interactive).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let (file_layer, guard) = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let dir = &config.logging.file_dir;
                let prefix = &config.logging.file_prefix;
                let file_appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
                    LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
                    LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
                };
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
