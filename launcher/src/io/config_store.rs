//! Persisted record of the last repository root.
//!
//! The record is a single JSON object, `{"repo_path": "..."}`. Unknown fields
//! are ignored so newer launchers can add fields without breaking older ones.
//! [`ConfigStore::load`] never fails: a missing, corrupt, or stale record all
//! read as "nothing saved" so the resolver can fall through to prompting.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::io::paths::expand_user_path;
use crate::marker::Marker;

/// On-disk shape of the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedLocation {
    pub repo_path: String,
}

/// Storage for the last repository root a handoff happened with.
pub trait ConfigStore {
    /// Saved root, if there is one and `marker` still exists under it.
    fn load(&self, marker: &Marker) -> Option<PathBuf>;

    /// Overwrite the record with `path`.
    fn save(&self, path: &Path) -> Result<()>;
}

/// Record stored as a JSON file (normally `~/.nba_watchlist_launcher.json`).
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record without any validation of the stored path.
    ///
    /// A missing file is `Ok(None)`; unreadable or unparseable contents are errors.
    pub fn read_record(&self) -> Result<Option<PersistedLocation>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", self.path.display()));
            }
        };
        let record = serde_json::from_str(&contents)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(record))
    }
}

impl ConfigStore for FileConfigStore {
    #[instrument(skip_all, fields(record = %self.path.display()))]
    fn load(&self, marker: &Marker) -> Option<PathBuf> {
        match self.read_record() {
            Ok(Some(record)) => validated_root(&record, marker),
            Ok(None) => {
                debug!("no saved record");
                None
            }
            Err(err) => {
                warn!(err = %format!("{err:#}"), "ignoring unreadable record");
                None
            }
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        let record = record_for(path)?;
        let mut buf = serde_json::to_string_pretty(&record).context("serialize record")?;
        buf.push('\n');
        write_atomic(&self.path, &buf)?;
        info!(record = %self.path.display(), repo_path = %record.repo_path, "saved repository location");
        Ok(())
    }
}

/// In-memory store for driving the resolver without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    record: RefCell<Option<PersistedLocation>>,
    writes: Cell<usize>,
    fail_saves: bool,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts out holding `repo_path`.
    pub fn with_repo_path(repo_path: impl Into<String>) -> Self {
        Self {
            record: RefCell::new(Some(PersistedLocation {
                repo_path: repo_path.into(),
            })),
            ..Self::default()
        }
    }

    /// Store whose every `save` fails, like an unwritable home directory.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Number of successful `save` calls.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn repo_path(&self) -> Option<String> {
        self.record
            .borrow()
            .as_ref()
            .map(|record| record.repo_path.clone())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self, marker: &Marker) -> Option<PathBuf> {
        let record = self.record.borrow().clone()?;
        validated_root(&record, marker)
    }

    fn save(&self, path: &Path) -> Result<()> {
        if self.fail_saves {
            bail!("record is not writable");
        }
        let record = record_for(path)?;
        *self.record.borrow_mut() = Some(record);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

fn validated_root(record: &PersistedLocation, marker: &Marker) -> Option<PathBuf> {
    let Some(root) = expand_user_path(&record.repo_path) else {
        debug!(repo_path = %record.repo_path, "saved path is blank or unexpandable");
        return None;
    };
    if !marker.is_satisfied_by(&root) {
        info!(root = %root.display(), marker = %marker, "saved location is stale");
        return None;
    }
    debug!(root = %root.display(), "saved location is valid");
    Some(root)
}

fn record_for(path: &Path) -> Result<PersistedLocation> {
    let repo_path = path
        .to_str()
        .with_context(|| format!("repository path is not valid UTF-8: {}", path.display()))?;
    Ok(PersistedLocation {
        repo_path: repo_path.to_string(),
    })
}

/// Write via temp file + rename so a crash never leaves a half-written record.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("record path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp record {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace record {}", path.display()))?;
    Ok(())
}
