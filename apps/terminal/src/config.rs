//! # Application Configuration
//!
//! Configuration is resolved in precedence order:
//!
//! ```text
//! 1. Command-line flags (--db, --api-url)          highest
//! 2. Environment variables (VEND_DB_PATH, VEND_API_URL)
//! 3. TOML config file (platform config dir)
//! 4. Built-in defaults                              lowest
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # vend.toml
//! [database]
//! path = "/var/lib/vend/vend.db"
//!
//! [cloud]
//! base_url = "https://catalog.example"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// Environment override for the database file path.
pub const ENV_DB_PATH: &str = "VEND_DB_PATH";
/// Environment override for the cloud API base URL.
pub const ENV_API_URL: &str = "VEND_API_URL";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub cloud: CloudSection,
}

/// `[database]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Database file path. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

/// `[cloud]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSection {
    /// Base URL of the catalog/auth API. Absent means offline mode:
    /// the scan chain skips straight from local miss to the create prompt.
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Loads configuration from the default file location plus environment
    /// overrides. A missing file yields defaults; a malformed file is an
    /// error (a silently ignored typo would hide a misconfigured terminal).
    pub fn load() -> AppResult<Self> {
        let path = default_config_path();
        let mut config = match path.as_deref() {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => AppConfig::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Loads configuration from a specific TOML file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        debug!(path = %path.display(), "Loading configuration file");

        let data = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;

        let config = toml::from_str(&data)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Applies environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(ENV_DB_PATH) {
            self.database.path = Some(PathBuf::from(path));
        }
        if let Ok(url) = std::env::var(ENV_API_URL) {
            self.cloud.base_url = Some(url);
        }
    }

    /// Resolves the database file path, creating the data directory when
    /// the default location is used.
    pub fn database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let data_dir = data_dir()?;
        fs::create_dir_all(&data_dir)
            .map_err(|e| AppError::Config(format!("cannot create data dir: {}", e)))?;
        Ok(data_dir.join("vend.db"))
    }

    /// Resolves the credential file path next to the database.
    pub fn credentials_path(&self) -> AppResult<PathBuf> {
        let data_dir = data_dir()?;
        fs::create_dir_all(&data_dir)
            .map_err(|e| AppError::Config(format!("cannot create data dir: {}", e)))?;
        Ok(data_dir.join("auth_data.json"))
    }
}

/// Platform data directory (`~/.local/share/vend-pos` on Linux).
fn data_dir() -> AppResult<PathBuf> {
    let dirs = ProjectDirs::from("io", "vend", "vend-pos")
        .ok_or_else(|| AppError::Config("could not determine app data directory".to_string()))?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Default config file path (`~/.config/vend-pos/vend.toml` on Linux).
fn default_config_path() -> Option<PathBuf> {
    match ProjectDirs::from("io", "vend", "vend-pos") {
        Some(dirs) => Some(dirs.config_dir().join("vend.toml")),
        None => {
            warn!("Could not determine config directory, using defaults");
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
