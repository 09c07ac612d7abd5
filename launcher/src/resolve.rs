//! Repository-root resolution.
//!
//! Runs the state machine `Start -> (Validated | Prompting)`,
//! `Prompting -> (Prompting | Validated | Aborted)`. A root loaded from the
//! record is used as is; a picked root is saved before it is returned, so the
//! record always names the last root a handoff was attempted with.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::core::state::{
    AbortReason, CancelPolicy, Pick, Resolution, ResolveOutcome, ResolveState, Source,
};
use crate::io::config_store::ConfigStore;
use crate::io::interaction::Interaction;
use crate::marker::Marker;

/// Title used for every dialog the launcher shows.
pub const DIALOG_TITLE: &str = "NBA Watchlist Launcher";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub on_cancel: CancelPolicy,
    /// Ignore the saved record and go straight to the picker.
    pub reselect: bool,
}

/// Produce a validated repository root, prompting when nothing valid is saved.
///
/// Returns `Err` only when a picked root cannot be saved.
#[instrument(skip_all, fields(marker = %marker, reselect = options.reselect))]
pub fn resolve_root<S, I>(
    store: &S,
    ui: &I,
    marker: &Marker,
    options: &ResolveOptions,
) -> Result<ResolveOutcome>
where
    S: ConfigStore + ?Sized,
    I: Interaction + ?Sized,
{
    let mut state = if options.reselect {
        ResolveState::Prompting { attempt: 0 }
    } else {
        ResolveState::Start
    };

    loop {
        debug!(state = ?state, "resolve step");
        state = match state {
            ResolveState::Start => match store.load(marker) {
                Some(root) => ResolveState::Validated {
                    root,
                    source: Source::Saved,
                },
                None => ResolveState::Prompting { attempt: 0 },
            },
            ResolveState::Prompting { attempt } => prompt(ui, marker, options, attempt),
            ResolveState::Validated { root, source } => {
                if source == Source::Picked {
                    store.save(&root).with_context(|| {
                        format!("save repository location {}", root.display())
                    })?;
                }
                info!(root = %root.display(), source = ?source, "repository root resolved");
                return Ok(ResolveOutcome::Resolved(Resolution { root, source }));
            }
            ResolveState::Aborted(reason) => {
                warn!(reason = ?reason, "resolution aborted");
                return Ok(ResolveOutcome::Aborted(reason));
            }
        };
    }
}

/// One pass through the picker.
fn prompt<I: Interaction + ?Sized>(
    ui: &I,
    marker: &Marker,
    options: &ResolveOptions,
    attempt: u32,
) -> ResolveState {
    if attempt == 0 {
        ui.info(DIALOG_TITLE, &intro_message(marker));
    }
    match ui.pick_directory(&picker_title(marker)) {
        Pick::Unavailable(reason) => ResolveState::Aborted(AbortReason::PickerUnavailable(reason)),
        // Only cancelling the very first prompt of a run with nothing saved
        // aborts; any later cancellation returns to the picker.
        Pick::Cancelled
            if options.on_cancel == CancelPolicy::Abort && attempt == 0 && !options.reselect =>
        {
            ResolveState::Aborted(AbortReason::Cancelled)
        }
        Pick::Cancelled => {
            debug!(attempt, "picker cancelled, asking again");
            ResolveState::Prompting {
                attempt: attempt.saturating_add(1),
            }
        }
        Pick::Chosen(dir) if marker.is_satisfied_by(&dir) => ResolveState::Validated {
            root: dir,
            source: Source::Picked,
        },
        Pick::Chosen(dir) => {
            info!(dir = %dir.display(), "picked directory lacks marker");
            ui.error(DIALOG_TITLE, &mismatch_message(marker, &dir));
            ResolveState::Prompting {
                attempt: attempt.saturating_add(1),
            }
        }
    }
}

pub fn intro_message(marker: &Marker) -> String {
    format!(
        "Select the folder that contains the watchlist repository.\n\n\
         It is the folder with '{marker}' inside it. Your choice is remembered \
         for future launches."
    )
}

fn picker_title(marker: &Marker) -> String {
    format!("Select the folder containing {marker}")
}

pub fn mismatch_message(marker: &Marker, dir: &Path) -> String {
    format!(
        "'{}' does not contain '{marker}'.\n\nChoose the repository folder that has \
         '{marker}' inside it.",
        dir.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config_store::MemoryConfigStore;
    use crate::test_support::{Dialog, ScriptedInteraction, repo_with_marker};
    use std::path::PathBuf;

    fn marker() -> Marker {
        Marker::default()
    }

    #[test]
    fn valid_saved_root_short_circuits() {
        let repo = repo_with_marker(&marker()).expect("repo");
        let store = MemoryConfigStore::with_repo_path(repo.path().to_str().expect("utf8"));
        let ui = ScriptedInteraction::new(vec![]);

        let outcome =
            resolve_root(&store, &ui, &marker(), &ResolveOptions::default()).expect("resolve");

        assert_eq!(
            outcome,
            ResolveOutcome::Resolved(Resolution {
                root: repo.path().to_path_buf(),
                source: Source::Saved,
            })
        );
        assert_eq!(store.writes(), 0);
        assert!(ui.dialogs().is_empty());
        assert_eq!(ui.picks_made(), 0);
    }

    #[test]
    fn stale_saved_root_falls_through_to_prompting() {
        let stale = tempfile::tempdir().expect("tempdir");
        let repo = repo_with_marker(&marker()).expect("repo");
        let store = MemoryConfigStore::with_repo_path(stale.path().to_str().expect("utf8"));
        let ui = ScriptedInteraction::new(vec![Pick::Chosen(repo.path().to_path_buf())]);

        let outcome =
            resolve_root(&store, &ui, &marker(), &ResolveOptions::default()).expect("resolve");

        assert_eq!(
            outcome,
            ResolveOutcome::Resolved(Resolution {
                root: repo.path().to_path_buf(),
                source: Source::Picked,
            })
        );
        assert_eq!(ui.picks_made(), 1);
        assert_eq!(store.writes(), 1);
        assert_eq!(
            store.repo_path().map(PathBuf::from),
            Some(repo.path().to_path_buf())
        );
    }

    #[test]
    fn non_matching_pick_shows_error_and_reprompts() {
        let other = tempfile::tempdir().expect("tempdir");
        let repo = repo_with_marker(&marker()).expect("repo");
        let store = MemoryConfigStore::new();
        let ui = ScriptedInteraction::new(vec![
            Pick::Chosen(other.path().to_path_buf()),
            Pick::Chosen(repo.path().to_path_buf()),
        ]);

        let outcome =
            resolve_root(&store, &ui, &marker(), &ResolveOptions::default()).expect("resolve");

        assert!(matches!(outcome, ResolveOutcome::Resolved(_)));
        assert_eq!(ui.picks_made(), 2);
        assert_eq!(store.writes(), 1);
        let dialogs = ui.dialogs();
        assert_eq!(dialogs.len(), 2);
        assert!(matches!(&dialogs[0], Dialog::Info(_)));
        match &dialogs[1] {
            Dialog::Error(message) => {
                assert!(message.contains("examples/nba_watchlist_app.py"));
                assert!(message.contains(&other.path().display().to_string()));
            }
            other => panic!("expected error dialog, got {other:?}"),
        }
    }

    #[test]
    fn only_non_matching_picks_then_cancel_reprompts_and_never_writes() {
        let other = tempfile::tempdir().expect("tempdir");
        let store = MemoryConfigStore::new();
        let ui = ScriptedInteraction::new(vec![
            Pick::Chosen(other.path().to_path_buf()),
            Pick::Chosen(other.path().to_path_buf()),
            Pick::Cancelled,
        ]);

        let outcome =
            resolve_root(&store, &ui, &marker(), &ResolveOptions::default()).expect("resolve");

        // The cancel goes back to the picker; the exhausted script then ends the run.
        assert!(matches!(
            outcome,
            ResolveOutcome::Aborted(AbortReason::PickerUnavailable(_))
        ));
        assert_eq!(ui.picks_made(), 4);
        assert_eq!(store.writes(), 0);
        assert_eq!(store.repo_path(), None);
    }

    #[test]
    fn cancel_after_non_matching_pick_offers_picker_again() {
        let other = tempfile::tempdir().expect("tempdir");
        let repo = repo_with_marker(&marker()).expect("repo");
        let store = MemoryConfigStore::new();
        let ui = ScriptedInteraction::new(vec![
            Pick::Chosen(other.path().to_path_buf()),
            Pick::Cancelled,
            Pick::Chosen(repo.path().to_path_buf()),
        ]);

        let outcome =
            resolve_root(&store, &ui, &marker(), &ResolveOptions::default()).expect("resolve");

        assert_eq!(
            outcome,
            ResolveOutcome::Resolved(Resolution {
                root: repo.path().to_path_buf(),
                source: Source::Picked,
            })
        );
        assert_eq!(ui.picks_made(), 3);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn cancel_during_reselect_offers_picker_again() {
        let saved = repo_with_marker(&marker()).expect("repo");
        let fresh = repo_with_marker(&marker()).expect("repo");
        let store = MemoryConfigStore::with_repo_path(saved.path().to_str().expect("utf8"));
        let ui = ScriptedInteraction::new(vec![
            Pick::Cancelled,
            Pick::Chosen(fresh.path().to_path_buf()),
        ]);
        let options = ResolveOptions {
            on_cancel: CancelPolicy::Abort,
            reselect: true,
        };

        let outcome = resolve_root(&store, &ui, &marker(), &options).expect("resolve");

        assert!(matches!(outcome, ResolveOutcome::Resolved(_)));
        assert_eq!(ui.picks_made(), 2);
    }

    #[test]
    fn attempt_counter_saturates() {
        let ui = ScriptedInteraction::new(vec![Pick::Cancelled]);
        let state = prompt(&ui, &marker(), &ResolveOptions::default(), u32::MAX);
        assert_eq!(state, ResolveState::Prompting { attempt: u32::MAX });
        assert!(ui.dialogs().is_empty());
    }

    #[test]
    fn cancel_aborts_by_default_without_error_dialog() {
        let store = MemoryConfigStore::new();
        let ui = ScriptedInteraction::new(vec![Pick::Cancelled]);

        let outcome =
            resolve_root(&store, &ui, &marker(), &ResolveOptions::default()).expect("resolve");

        assert_eq!(outcome, ResolveOutcome::Aborted(AbortReason::Cancelled));
        assert_eq!(ui.dialogs().len(), 1);
        assert!(matches!(&ui.dialogs()[0], Dialog::Info(_)));
    }

    #[test]
    fn cancel_reprompts_when_configured() {
        let repo = repo_with_marker(&marker()).expect("repo");
        let store = MemoryConfigStore::new();
        let ui = ScriptedInteraction::new(vec![
            Pick::Cancelled,
            Pick::Cancelled,
            Pick::Chosen(repo.path().to_path_buf()),
        ]);
        let options = ResolveOptions {
            on_cancel: CancelPolicy::Reprompt,
            reselect: false,
        };

        let outcome = resolve_root(&store, &ui, &marker(), &options).expect("resolve");

        assert!(matches!(outcome, ResolveOutcome::Resolved(_)));
        assert_eq!(ui.picks_made(), 3);
        // Info once; cancellations show no error.
        assert_eq!(ui.dialogs().len(), 1);
    }

    #[test]
    fn unavailable_picker_aborts() {
        let store = MemoryConfigStore::new();
        let ui = ScriptedInteraction::new(vec![Pick::Unavailable("headless".to_string())]);
        let options = ResolveOptions {
            on_cancel: CancelPolicy::Reprompt,
            reselect: false,
        };

        let outcome = resolve_root(&store, &ui, &marker(), &options).expect("resolve");

        assert_eq!(
            outcome,
            ResolveOutcome::Aborted(AbortReason::PickerUnavailable("headless".to_string()))
        );
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn reselect_ignores_valid_saved_root() {
        let saved = repo_with_marker(&marker()).expect("repo");
        let fresh = repo_with_marker(&marker()).expect("repo");
        let store = MemoryConfigStore::with_repo_path(saved.path().to_str().expect("utf8"));
        let ui = ScriptedInteraction::new(vec![Pick::Chosen(fresh.path().to_path_buf())]);
        let options = ResolveOptions {
            on_cancel: CancelPolicy::Abort,
            reselect: true,
        };

        let outcome = resolve_root(&store, &ui, &marker(), &options).expect("resolve");

        assert_eq!(
            outcome,
            ResolveOutcome::Resolved(Resolution {
                root: fresh.path().to_path_buf(),
                source: Source::Picked,
            })
        );
        assert_eq!(
            store.repo_path().map(PathBuf::from),
            Some(fresh.path().to_path_buf())
        );
    }

    #[test]
    fn save_failure_is_fatal() {
        let repo = repo_with_marker(&marker()).expect("repo");
        let store = MemoryConfigStore::failing();
        let ui = ScriptedInteraction::new(vec![Pick::Chosen(repo.path().to_path_buf())]);

        let err = resolve_root(&store, &ui, &marker(), &ResolveOptions::default()).unwrap_err();

        assert!(format!("{err:#}").contains("save repository location"));
    }
}
