//! Configuration loading and default locations
//!
//! Server settings resolve in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment values are merged by the binary's argument
//! parser and arrive here as [`ConfigOverrides`].

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default listen address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

const APP_DIR: &str = "songbook";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub allowed_origins: Option<Vec<String>>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub allowed_origins: Option<Vec<String>>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    /// Origins allowed to make cross-origin requests; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Merge overrides, config file and compiled defaults
    pub fn resolve(overrides: ConfigOverrides, file: Option<TomlConfig>) -> Self {
        let file = file.unwrap_or_default();

        Self {
            host: overrides
                .host
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            database: overrides
                .database
                .or(file.database)
                .unwrap_or_else(default_database_path),
            allowed_origins: overrides
                .allowed_origins
                .filter(|origins| !origins.is_empty())
                .or(file.allowed_origins)
                .unwrap_or_default(),
        }
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the TOML config file
///
/// An explicitly named file must exist and parse. Without one, the platform
/// default location is tried and a missing file there yields `Ok(None)`.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<Option<TomlConfig>> {
    if let Some(path) = explicit {
        return read_toml_config(path).map(Some);
    }

    match default_config_path() {
        Some(path) if path.exists() => read_toml_config(&path).map(Some),
        Some(path) => {
            debug!("No config file at {}, using defaults", path.display());
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Platform config file location, e.g. `~/.config/songbook/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Platform database location, e.g. `~/.local/share/songbook/songbook.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR).join("songbook.db"))
        .unwrap_or_else(|| PathBuf::from("./songbook_data/songbook.db"))
}
