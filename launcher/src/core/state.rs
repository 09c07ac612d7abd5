//! Values that flow through the resolution state machine.

use std::path::PathBuf;

/// Where a validated repository root came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Loaded from the persisted record; nothing is written back.
    Saved,
    /// Chosen interactively during this run; persisted before handoff.
    Picked,
}

/// What to do when the user dismisses the directory picker without choosing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Abort when the first prompt of a run with nothing saved is cancelled;
    /// later cancellations return to the picker.
    #[default]
    Abort,
    /// Never abort on cancellation; show the picker again every time.
    Reprompt,
}

/// Result of one directory-picker interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    Chosen(PathBuf),
    Cancelled,
    /// No interactive picker exists in this environment (reason attached).
    Unavailable(String),
}

/// Why resolution ended without a repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The user dismissed the picker.
    Cancelled,
    /// The picker could not be shown at all.
    PickerUnavailable(String),
}

/// States of the resolver. `Aborted` and `Validated` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    Start,
    /// `attempt` counts picker invocations already made in this run.
    Prompting { attempt: u32 },
    Validated { root: PathBuf, source: Source },
    Aborted(AbortReason),
}

/// A repository root that passed marker validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub root: PathBuf,
    pub source: Source,
}

/// Structured resolution outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(Resolution),
    Aborted(AbortReason),
}
