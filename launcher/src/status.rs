//! Read-only inspection of the persisted record for `watchlist-launcher status`.

use std::path::PathBuf;

use crate::io::config_store::FileConfigStore;
use crate::io::paths::expand_user_path;
use crate::marker::Marker;

/// What the record currently says, and whether it would be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// No record file.
    Missing,
    /// The file exists but cannot be read or parsed.
    Unreadable(String),
    /// The stored path no longer contains the marker.
    Stale { repo_path: String },
    /// The stored path would be used without prompting.
    Valid { root: PathBuf },
}

impl StatusReport {
    pub fn is_valid(&self) -> bool {
        matches!(self, StatusReport::Valid { .. })
    }
}

/// Classify the record without prompting or writing.
pub fn inspect(store: &FileConfigStore, marker: &Marker) -> StatusReport {
    let record = match store.read_record() {
        Ok(Some(record)) => record,
        Ok(None) => return StatusReport::Missing,
        Err(err) => return StatusReport::Unreadable(format!("{err:#}")),
    };
    match expand_user_path(&record.repo_path) {
        Some(root) if marker.is_satisfied_by(&root) => StatusReport::Valid { root },
        _ => StatusReport::Stale {
            repo_path: record.repo_path,
        },
    }
}
