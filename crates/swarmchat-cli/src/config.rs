//! CLI configuration
//!
//! Layered loading: built-in defaults, then an optional `swarmchat.toml`
//! (explicit path or the platform config directory), then command-line
//! overrides on top.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use swarmchat_core::SwarmConfig;

use crate::cli::Cli;
use crate::error::{CliError, Result};

// ----------------------------------------------------------------------------
// Configuration Sections
// ----------------------------------------------------------------------------

/// Complete configuration for the swarmchat CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Core coordinator configuration
    pub core: SwarmConfig,

    /// Local identity settings
    pub identity: IdentityConfig,

    /// Profile storage settings
    pub storage: StorageConfig,

    /// Terminal rendering settings
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Username to claim as the local identity. Unset means anonymous mode
    /// under a random display name.
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the profile database. Defaults to the platform
    /// data directory.
    pub data_dir: Option<PathBuf>,

    /// Keep the profile in memory only
    pub ephemeral: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How many trailing messages of the active channel are painted
    pub max_messages: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { max_messages: 50 }
    }
}

// ----------------------------------------------------------------------------
// Loading
// ----------------------------------------------------------------------------

impl AppConfig {
    /// Load configuration: defaults, then the config file (explicit path or
    /// the default location), then CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::load_from_file(&path)?,
                _ => Self::default(),
            },
        };

        if cli.username.is_some() {
            config.identity.username = cli.username.clone();
        }
        if cli.data_dir.is_some() {
            config.storage.data_dir = cli.data_dir.clone();
        }
        if cli.ephemeral {
            config.storage.ephemeral = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Default config file location (platform config dir)
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("swarmchat").join("swarmchat.toml"))
    }

    /// Resolve the directory for the profile database, creating it if needed
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        let dir = match &self.storage.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|dir| dir.join("swarmchat"))
                .ok_or_else(|| {
                    CliError::Config("no data directory available on this platform".to_string())
                })?,
        };
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn validate(&self) -> Result<()> {
        self.core.validate()?;
        if self.ui.max_messages == 0 {
            return Err(CliError::Config(
                "ui.max_messages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
