//! Application configuration for worldcontext.
//!
//! User config lives at `~/.worldcontext/worldcontext.toml`.
//! An explicit `--config` path overrides it; missing values fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldContextError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "worldcontext.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".worldcontext";

// ---------------------------------------------------------------------------
// Config structs (matching worldcontext.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Summary limits.
    #[serde(default)]
    pub context: ContextConfig,
}

/// `[context]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Distinct domains listed before the "...and K more" trailer.
    #[serde(default = "default_max_domains")]
    pub max_domains: usize,

    /// Entries shown under Recent Additions.
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,

    /// Characters of a description kept before it is cut with `...`.
    #[serde(default = "default_description_max_chars")]
    pub description_max_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_domains: default_max_domains(),
            max_recent: default_max_recent(),
            description_max_chars: default_description_max_chars(),
        }
    }
}

fn default_max_domains() -> usize {
    15
}
fn default_max_recent() -> usize {
    5
}
fn default_description_max_chars() -> usize {
    100
}

// ---------------------------------------------------------------------------
// Context limits (runtime, derived from config)
// ---------------------------------------------------------------------------

/// Runtime limits handed to the context builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    pub max_domains: usize,
    pub max_recent: usize,
    pub description_max_chars: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ContextLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_domains: config.context.max_domains,
            max_recent: config.context.max_recent,
            description_max_chars: config.context.description_max_chars,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.worldcontext/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WorldContextError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.worldcontext/worldcontext.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from the default location.
/// Returns defaults if there is no home directory or no file.
pub fn load_config() -> Result<AppConfig> {
    let Ok(path) = config_file_path() else {
        tracing::debug!("no home directory, using default config");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WorldContextError::config(format!("config file not found: {}", path.display()))
        } else {
            WorldContextError::io(path, e)
        }
    })?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        WorldContextError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(?path, ?config, "loaded config");

    Ok(config)
}
