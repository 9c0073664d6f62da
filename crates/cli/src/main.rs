mod app;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io,
    sync::Mutex,
};

use bookshelf_core::{
    config::{self, AppConfig},
    store::CatalogStore,
};
use tracing::warn;
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> Result<()> {
    let bootstrap = config::ensure_default_config();
    let config = AppConfig::load()?;
    init_logging(&config)?;
    if let Err(err) = bootstrap {
        warn!("could not write default configuration: {err:#}");
    }

    let store = CatalogStore::new(&config.catalog_path);
    let stdin = io::stdin();
    let stdout = io::stdout();
    app::run_session(&store, stdin.lock(), stdout.lock())
}

fn init_logging(config: &AppConfig) -> Result<()> {
    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("failed to create {}", config.log_dir.display()))?;
    let log_path = config.log_dir.join("bookshelf.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    // stdout belongs to the menu, so events only go to the log file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
