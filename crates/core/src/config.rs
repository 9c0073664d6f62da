//! Application configuration.
//!
//! Values come from built-in defaults, then an optional
//! `~/.config/bookshelf/config.toml`, then `BOOKSHELF_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ::config::{Config, Environment, File};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::store::DEFAULT_CATALOG_FILE;

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "bookshelf";
/// Name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `BOOKSHELF_CATALOG_PATH`.
pub const ENV_PREFIX: &str = "BOOKSHELF";

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILTER: &str = "info";

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Bookshelf configuration.
# Relative paths are resolved against the working directory.

# Flat file holding the catalog.
catalog_path = "librarybooks.txt"

# Directory receiving bookshelf.log.
log_dir = "logs"

# Tracing filter used when RUST_LOG is unset.
log_filter = "info"
"#;

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Backing file for the catalog.
    pub catalog_path: PathBuf,
    /// Directory for the log file.
    pub log_dir: PathBuf,
    /// Default `EnvFilter` directive.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_FILE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file location and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load using `path` as the (optional) config file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .set_default("catalog_path", DEFAULT_CATALOG_FILE)?
            .set_default("log_dir", DEFAULT_LOG_DIR)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }
}

/// Location of the user config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the default config file if it does not exist yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_default_config_at(config_path()).map(|_| ())
}

/// Write the default config to `path` unless present. Returns whether a file
/// was created.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(true)
}
