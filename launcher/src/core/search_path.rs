//! Composition of `PYTHONPATH`-style search path lists.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Put `root` first in a search path list, keeping the existing entries.
///
/// Empty entries and duplicates of `root` are dropped from `existing`.
pub fn prepend(root: &Path, existing: Option<&OsStr>) -> Result<OsString> {
    let mut entries: Vec<PathBuf> = vec![root.to_path_buf()];
    if let Some(existing) = existing {
        entries.extend(
            env::split_paths(existing)
                .filter(|entry| !entry.as_os_str().is_empty() && entry.as_path() != root),
        );
    }
    env::join_paths(entries).with_context(|| {
        format!(
            "repository root cannot be added to a search path: {}",
            root.display()
        )
    })
}
