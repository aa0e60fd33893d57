//! # Configuration
//!
//! Layered settings: built-in defaults, then an optional TOML file, then
//! CLI flags (applied by the caller).
//!
//! ```toml
//! [store]
//! path = "mikra.redb"
//!
//! [transform]
//! strip_cantillation = true
//! gematria = false
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! default_edition = "wlc"
//! ```

use mikra_core::{MikraError, TransformOptions, validate_edition};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "mikra.toml";

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,
    pub transform: TransformOptions,
    pub server: ServerConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the redb verse database.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("mikra.redb"),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Edition used by CLI lookups when `-e` is omitted.
    pub default_edition: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            default_edition: "wlc".to_string(),
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, MikraError> {
        let config: Self = toml::from_str(text).map_err(|e| MikraError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `mikra.toml` in the
    /// working directory is used if present, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, MikraError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, MikraError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            MikraError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(MikraError::Config(format!(
                "'{}' exceeds maximum size of {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            MikraError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
            .map_err(|e| MikraError::Config(format!("{}: {}", path.display(), e)))
    }

    fn validate(&self) -> Result<(), MikraError> {
        validate_edition(&self.server.default_edition).map_err(|_| {
            MikraError::Config(format!(
                "server.default_edition '{}' is not a valid edition name",
                self.server.default_edition
            ))
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
