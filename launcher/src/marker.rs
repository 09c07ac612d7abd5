//! The marker file that identifies a repository root.
//!
//! A directory is a valid root exactly when `<root>/<marker>` exists. The same
//! check is applied to saved locations and to freshly picked directories.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

/// Entry script of the watchlist app, relative to the repository root.
pub const DEFAULT_ENTRY_SCRIPT: &str = "examples/nba_watchlist_app.py";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    relative: PathBuf,
}

impl Marker {
    /// Build a marker from a path relative to the repository root.
    ///
    /// Rejects empty paths, absolute paths, and paths that climb out of the
    /// root with `..`.
    pub fn new(relative: impl Into<PathBuf>) -> Result<Self> {
        let relative = relative.into();
        if relative.as_os_str().is_empty() {
            bail!("marker path must not be empty");
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    bail!("marker path must not contain '..': {}", relative.display())
                }
                Component::RootDir | Component::Prefix(_) => {
                    bail!("marker path must be relative: {}", relative.display())
                }
            }
        }
        Ok(Self { relative })
    }

    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Full path of the entry script under `root`.
    pub fn entry_script(&self, root: &Path) -> PathBuf {
        root.join(&self.relative)
    }

    /// Whether `candidate` looks like the repository root.
    ///
    /// The marker must be a regular file (or a symlink to one).
    pub fn is_satisfied_by(&self, candidate: &Path) -> bool {
        self.entry_script(candidate).is_file()
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            relative: PathBuf::from(DEFAULT_ENTRY_SCRIPT),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative.display())
    }
}
