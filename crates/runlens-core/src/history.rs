//! Persisted run history
//!
//! A JSON array of [`RunSummary`] ordered oldest to newest. Loading is
//! lenient: entries that are not well-formed objects are dropped with a
//! warning instead of failing the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, RunlensError};
use crate::trend::RunSummary;

/// Default number of runs retained in the window
pub const DEFAULT_MAX_ENTRIES: usize = 30;

/// Bounded history window backed by a file
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
    entries: Vec<RunSummary>,
}

impl HistoryStore {
    /// Load the history at `path`; a missing file is an empty history
    pub fn load(path: &Path, max_entries: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(RunlensError::invalid_value("history max_entries", max_entries));
        }

        let entries = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| RunlensError::io_operation("read history", path.display(), e))?;
            parse_entries(&content)
        } else {
            debug!(path = %path.display(), "history file missing, starting empty");
            Vec::new()
        };

        let mut store = Self {
            path: path.to_path_buf(),
            max_entries,
            entries,
        };
        store.evict();
        Ok(store)
    }

    /// Append the newest run, evicting the oldest beyond capacity
    pub fn append(&mut self, summary: RunSummary) {
        self.entries.push(summary);
        self.evict();
    }

    /// Entries ordered oldest to newest
    pub fn window(&self) -> &[RunSummary] {
        &self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                RunlensError::io_operation("create history directory", parent.display(), e)
            })?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)
            .map_err(|e| RunlensError::io_operation("write history", self.path.display(), e))?;

        debug!(path = %self.path.display(), entries = self.entries.len(), "history saved");
        Ok(())
    }

    fn evict(&mut self) {
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }
}

/// Parse a history document, keeping only well-formed entries
pub fn parse_entries(content: &str) -> Vec<RunSummary> {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "history is not valid JSON, ignoring it");
            return Vec::new();
        }
    };

    let Value::Array(items) = value else {
        warn!("history is not a JSON array, ignoring it");
        return Vec::new();
    };

    let total = items.len();
    let entries: Vec<RunSummary> = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if entries.len() < total {
        warn!(dropped = total - entries.len(), "dropped malformed history entries");
    }

    entries
}
