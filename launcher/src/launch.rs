//! Orchestration for `watchlist-launcher launch`.
//!
//! Resolves the repository root and hands control to the entry script. On
//! success with a real [`Handoff`] this never returns to the caller.

use std::ffi::OsString;

use anyhow::Result;
use tracing::debug;

use crate::core::state::{AbortReason, Resolution, ResolveOutcome};
use crate::io::config_store::ConfigStore;
use crate::io::handoff::{Handoff, LaunchRequest};
use crate::io::interaction::Interaction;
use crate::marker::Marker;
use crate::resolve::{ResolveOptions, resolve_root};

/// Outcome of a launch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Launched {
        resolution: Resolution,
        request: LaunchRequest,
    },
    Aborted(AbortReason),
}

/// Resolve the root, then hand off to `<root>/<marker>` with `args`.
pub fn launch<S, I, H>(
    store: &S,
    ui: &I,
    handoff: &H,
    marker: &Marker,
    options: &ResolveOptions,
    args: Vec<OsString>,
) -> Result<LaunchOutcome>
where
    S: ConfigStore + ?Sized,
    I: Interaction + ?Sized,
    H: Handoff + ?Sized,
{
    let resolution = match resolve_root(store, ui, marker, options)? {
        ResolveOutcome::Resolved(resolution) => resolution,
        ResolveOutcome::Aborted(reason) => return Ok(LaunchOutcome::Aborted(reason)),
    };
    let request = LaunchRequest::new(&resolution.root, marker, args);
    debug!(script = %request.script.display(), args = request.args.len(), "launch request built");
    handoff.hand_off(&request)?;
    Ok(LaunchOutcome::Launched {
        resolution,
        request,
    })
}

/// Terminating diagnostic for an aborted launch.
pub fn abort_diagnostic(reason: &AbortReason, marker: &Marker) -> String {
    let cause = match reason {
        AbortReason::Cancelled => "no folder was selected".to_string(),
        AbortReason::PickerUnavailable(detail) => {
            format!("the folder picker is not available ({detail})")
        }
    };
    format!(
        "Could not find the watchlist repository: {cause}. Re-run the launcher and \
         choose the folder that contains '{marker}'."
    )
}
