//! Launcher configuration assembled from CLI flags and environment.

use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::core::state::CancelPolicy;
use crate::marker::Marker;

/// How the launcher talks to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Native message boxes and folder picker.
    #[default]
    Dialog,
    /// Terminal prompts.
    Console,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Persisted record holding the last repository root.
    pub record_path: PathBuf,
    /// Entry script, relative to the repository root.
    pub marker: Marker,
    /// Program used to run the entry script.
    pub interpreter: String,
    pub on_cancel: CancelPolicy,
    pub interaction: InteractionMode,
}

impl LauncherConfig {
    /// Defaults for everything except the record location.
    pub fn new(record_path: impl Into<PathBuf>) -> Self {
        Self {
            record_path: record_path.into(),
            marker: Marker::default(),
            interpreter: default_interpreter().to_string(),
            on_cancel: CancelPolicy::default(),
            interaction: InteractionMode::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.record_path.file_name().is_none() {
            return Err(anyhow!(
                "record path must name a file: {}",
                self.record_path.display()
            ));
        }
        if self.interpreter.trim().is_empty() {
            return Err(anyhow!("interpreter must be a non-empty program name"));
        }
        Ok(())
    }
}

/// Python launcher name for the current platform.
pub fn default_interpreter() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}
