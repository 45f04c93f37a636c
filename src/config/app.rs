//! Application configuration loading from config.toml and the environment.
//!
//! Every key is optional. Values are resolved in order: built-in defaults,
//! then the TOML file, then environment variables (`BIND_ADDR`, `DATA_PATH`,
//! `STATIC_DIR`, `EXPORT_PREFIX`).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file used when `CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server and storage settings
    pub server: ServerConfig,
    /// CSV export settings
    pub export: ExportConfig,
}

/// HTTP server and storage settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,
    /// Path of the JSON record document
    pub data_path: PathBuf,
    /// Directory holding the HTML pages and browser assets
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3099".to_string(),
            data_path: PathBuf::from("data/updated_data.json"),
            static_dir: PathBuf::from("public"),
        }
    }
}

/// CSV export settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Prefix for exported file names (`<prefix>_all_data_...csv`)
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: "Galle".to_string(),
        }
    }
}

impl ExportConfig {
    /// File name prefix for a full export.
    #[must_use]
    pub fn all_data_prefix(&self) -> String {
        format!("{}_all_data", self.file_prefix)
    }

    /// File name prefix for a filtered export.
    #[must_use]
    pub fn filtered_data_prefix(&self) -> String {
        format!("{}_filtered_data", self.file_prefix)
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup("BIND_ADDR") {
        config.server.bind_addr = addr;
    }
    if let Some(path) = lookup("DATA_PATH") {
        config.server.data_path = PathBuf::from(path);
    }
    if let Some(dir) = lookup("STATIC_DIR") {
        config.server.static_dir = PathBuf::from(dir);
    }
    if let Some(prefix) = lookup("EXPORT_PREFIX") {
        config.export.file_prefix = prefix;
    }
}

/// Resolves the configuration the service runs with.
///
/// An explicitly named `CONFIG_PATH` must exist; a missing default
/// `config.toml` falls back to built-in defaults.
pub fn resolve_config<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup("CONFIG_PATH") {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH)?,
        None => {
            info!("No {DEFAULT_CONFIG_PATH} found, using built-in defaults");
            AppConfig::default()
        }
    };
    apply_env_overrides(&mut config, lookup);
    Ok(config)
}

/// Resolves configuration from the process environment.
pub fn load_app_configuration() -> Result<AppConfig> {
    resolve_config(|key| std::env::var(key).ok())
}
