// CAF-Gen Configuration
// TOML configuration with serde defaults and environment overrides

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reference::{ColumnLayout, CsvReferenceSource, ReferenceSource, SnapshotSource};
use crate::types::{ExpansionLimits, ReferenceError};

/// Environment variable overriding `reference.path`
pub const ENV_TABLE: &str = "CAF_GEN_TABLE";

/// Environment variable overriding `server.bind`
pub const ENV_BIND: &str = "CAF_GEN_BIND";

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub limits: ExpansionLimits,
    pub reference: ReferenceConfig,
    pub server: ServerConfig,
}

/// Where the reference table lives and how it is read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// CSV export of the reference table
    pub path: PathBuf,
    /// Column positions, zero-based
    pub columns: ColumnLayout,
    /// Load the table once at startup instead of on every request
    pub cache: bool,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dados/gabarito.csv"),
            columns: ColumnLayout::default(),
            cache: false,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl AppConfig {
    /// Load configuration from `path`, then apply environment overrides
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply overrides read through `lookup` (normally the process environment)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(table) = lookup(ENV_TABLE).filter(|v| !v.is_empty()) {
            self.reference.path = PathBuf::from(table);
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
    }

    /// Build the reference source this configuration describes
    pub fn reference_source(&self) -> Result<Box<dyn ReferenceSource>, ReferenceError> {
        let csv = CsvReferenceSource::new(self.reference.path.clone())
            .with_columns(self.reference.columns);
        if self.reference.cache {
            Ok(Box::new(SnapshotSource::capture(&csv)?))
        } else {
            Ok(Box::new(csv))
        }
    }
}
