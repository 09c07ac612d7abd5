//! Test helpers: scripted interaction, recording handoff, and repository fixtures.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;

use anyhow::{Context, Result, bail};
use tempfile::TempDir;

use crate::core::state::Pick;
use crate::io::handoff::{Handoff, LaunchRequest};
use crate::io::interaction::Interaction;
use crate::marker::Marker;

/// A dialog shown through [`ScriptedInteraction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Info(String),
    Error(String),
}

/// Interaction provider that answers picks from a script and records dialogs.
///
/// Once the script runs out, further picks are `Pick::Unavailable` so a test
/// can never spin forever.
pub struct ScriptedInteraction {
    picks: RefCell<VecDeque<Pick>>,
    picks_made: Cell<usize>,
    dialogs: RefCell<Vec<Dialog>>,
}

impl ScriptedInteraction {
    pub fn new(picks: Vec<Pick>) -> Self {
        Self {
            picks: RefCell::new(picks.into()),
            picks_made: Cell::new(0),
            dialogs: RefCell::new(Vec::new()),
        }
    }

    pub fn dialogs(&self) -> Vec<Dialog> {
        self.dialogs.borrow().clone()
    }

    pub fn picks_made(&self) -> usize {
        self.picks_made.get()
    }
}

impl Interaction for ScriptedInteraction {
    fn info(&self, _title: &str, message: &str) {
        self.dialogs
            .borrow_mut()
            .push(Dialog::Info(message.to_string()));
    }

    fn error(&self, _title: &str, message: &str) {
        self.dialogs
            .borrow_mut()
            .push(Dialog::Error(message.to_string()));
    }

    fn pick_directory(&self, _title: &str) -> Pick {
        self.picks_made.set(self.picks_made.get() + 1);
        self.picks
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Pick::Unavailable("pick script exhausted".to_string()))
    }
}

/// Handoff that records requests instead of starting a process.
#[derive(Default)]
pub struct RecordingHandoff {
    requests: RefCell<Vec<LaunchRequest>>,
    fail: bool,
}

impl RecordingHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handoff that fails like a missing interpreter.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<LaunchRequest> {
        self.requests.borrow().clone()
    }
}

impl Handoff for RecordingHandoff {
    fn hand_off(&self, request: &LaunchRequest) -> Result<()> {
        if self.fail {
            bail!("start python3: No such file or directory");
        }
        self.requests.borrow_mut().push(request.clone());
        Ok(())
    }
}

/// Temporary repository root containing the marker's entry script.
pub fn repo_with_marker(marker: &Marker) -> Result<TempDir> {
    let temp = tempfile::tempdir().context("create temp repository")?;
    let script = marker.entry_script(temp.path());
    if let Some(parent) = script.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(
        &script,
        "if __name__ == \"__main__\":\n    print(\"watchlist\")\n",
    )
    .with_context(|| format!("write {}", script.display()))?;
    Ok(temp)
}
