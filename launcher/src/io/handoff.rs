//! Control handoff to the entry script.
//!
//! The [`Handoff`] trait receives a validated root and an entry path; how the
//! script is started is the implementation's business. [`PythonHandoff`] runs
//! the script as the interpreter's main program with the root importable.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::core::search_path;
use crate::marker::Marker;

/// Everything needed to start the downstream application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Validated repository root.
    pub root: PathBuf,
    /// Entry script under `root`.
    pub script: PathBuf,
    /// Arguments forwarded to the script.
    pub args: Vec<OsString>,
}

impl LaunchRequest {
    pub fn new(root: &Path, marker: &Marker, args: Vec<OsString>) -> Self {
        Self {
            root: root.to_path_buf(),
            script: marker.entry_script(root),
            args,
        }
    }
}

/// One-way transfer of control to the entry script.
pub trait Handoff {
    /// Start the script. Real implementations do not return on success.
    fn hand_off(&self, request: &LaunchRequest) -> Result<()>;
}

/// Runs `<interpreter> <script> <args..>` from the repository root.
#[derive(Debug, Clone)]
pub struct PythonHandoff {
    interpreter: String,
}

impl PythonHandoff {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// Build the command with `root` first on `PYTHONPATH`.
    pub fn command(
        &self,
        request: &LaunchRequest,
        existing_pythonpath: Option<&OsStr>,
    ) -> Result<Command> {
        let pythonpath = search_path::prepend(&request.root, existing_pythonpath)?;
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&request.script)
            .args(&request.args)
            .current_dir(&request.root)
            .env("PYTHONPATH", pythonpath);
        Ok(cmd)
    }
}

impl Handoff for PythonHandoff {
    #[instrument(skip_all, fields(script = %request.script.display()))]
    fn hand_off(&self, request: &LaunchRequest) -> Result<()> {
        let existing = env::var_os("PYTHONPATH");
        let cmd = self.command(request, existing.as_deref())?;
        info!(
            interpreter = %self.interpreter,
            root = %request.root.display(),
            "handing off to entry script"
        );
        replace_process(cmd)
    }
}

#[cfg(unix)]
fn replace_process(mut cmd: Command) -> Result<()> {
    use std::os::unix::process::CommandExt;

    let err = cmd.exec();
    Err(err).with_context(|| format!("start {}", cmd.get_program().to_string_lossy()))
}

#[cfg(not(unix))]
fn replace_process(mut cmd: Command) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("start {}", cmd.get_program().to_string_lossy()))?;
    tracing::debug!(exit_code = ?status.code(), "entry script finished");
    std::process::exit(status.code().unwrap_or(1))
}
