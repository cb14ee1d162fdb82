//! Runlens configuration (stored in ~/.config/runlens/config.toml)
//!
//! Only caller-owned concerns are configurable: the payload title and the
//! history window. Scoring constants are fixed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RunlensError};
use crate::history::DEFAULT_MAX_ENTRIES;

const CONFIG_DIR: &str = "runlens";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "RUNLENS_CONFIG_DIR";

/// Default payload title
pub const DEFAULT_TITLE: &str = "Test Run Report";

/// Smallest history window that still allows a run-over-run comparison
pub const MIN_HISTORY_ENTRIES: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunlensConfig {
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// History file used when the command line names none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_entries: default_max_entries(),
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl RunlensConfig {
    fn config_path() -> Result<PathBuf> {
        // Environment override keeps tests away from the real config dir
        let config_dir = if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(env_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| {
                    RunlensError::Other("unable to determine config directory".to_string())
                })?
                .join(CONFIG_DIR)
        };

        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Resolve configuration: an explicit file must exist, the default
    /// location is optional
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(RunlensError::not_found("config file", path.display()));
            }
            return Self::load_from(path);
        }

        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                debug!(error = %e, "no config directory, using defaults");
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| RunlensError::io_operation("read config", path.display(), e))?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history.max_entries < MIN_HISTORY_ENTRIES {
            return Err(RunlensError::invalid_value(
                "history.max_entries (must be at least 2)",
                self.history.max_entries,
            ));
        }
        if self.report.title.trim().is_empty() {
            return Err(RunlensError::invalid_value("report.title", "<empty>"));
        }
        Ok(())
    }
}
