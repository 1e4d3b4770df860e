use anyhow::{Context, Result};
use curator_console::api::rest::CuratorRest;
use curator_console::api::Backend;
use curator_console::app::App;
use curator_console::config::Config;
use curator_console::tui;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Saved settings from .env first so they can feed the config overrides.
    Config::load_env_file();
    let config = Config::load_or_default(&config_path())?;

    let log_file = std::fs::File::create(&config.log.file)
        .with_context(|| format!("Failed to create log file: {}", config.log.file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    tracing::info!(base_url = %config.api.base_url, "starting curator console");

    let rest = CuratorRest::new(&config.api.base_url, Duration::from_millis(config.api.timeout_ms))?;
    let backend: Arc<dyn Backend> = Arc::new(rest);
    let app = App::new(&config, Instant::now());

    tui::run_tui(app, backend, config.ui.tick()).await?;

    tracing::debug!("shutting down");
    Ok(())
}

/// `--config <path>` or `--config=<path>`, else `config.toml`.
fn config_path() -> PathBuf {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return PathBuf::from(path);
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return PathBuf::from(path);
        }
    }
    PathBuf::from("config.toml")
}
