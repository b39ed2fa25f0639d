//! Node configuration
//!
//! Stored as JSON in ~/.config/blockpin/config.json unless a path is given.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default chunk size (256 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 262_144;

/// Default maximum number of links per object node
pub const DEFAULT_MAX_LINKS: usize = 174;

/// Tunables for chunking, graph layout and block storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size of each leaf chunk in bytes
    pub chunk_size: usize,
    /// Maximum children per object node
    pub max_links: usize,
    /// zstd level for stored blocks; `None` stores them uncompressed
    pub compression_level: Option<i32>,
    /// Re-hash blocks on every read
    pub verify_on_read: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_links: DEFAULT_MAX_LINKS,
            compression_level: None,
            verify_on_read: true,
        }
    }
}

impl Config {
    /// Default config file location (~/.config/blockpin/config.json)
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(dir.join("blockpin").join("config.json"))
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;
        Ok(())
    }

    /// Reject settings the chunker or builder cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidInput("chunk_size must be positive".into()));
        }
        if self.max_links < 2 {
            return Err(Error::InvalidInput(format!(
                "max_links must be at least 2, got {}",
                self.max_links
            )));
        }
        if let Some(level) = self.compression_level {
            if !(1..=22).contains(&level) {
                return Err(Error::InvalidInput(format!(
                    "compression_level must be in 1..=22, got {}",
                    level
                )));
            }
        }
        Ok(())
    }
}
