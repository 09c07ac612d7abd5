//! Locate-once, launch-many bootstrap for the NBA watchlist app.
//!
//! The launcher remembers where the watchlist repository lives, validates that
//! location on every start, asks the user to pick it when nothing valid is
//! remembered, and then hands control to the repository's entry script.
//!
//! - **[`core`]**: Pure values and helpers (resolution states, path expansion,
//!   search-path composition). No I/O.
//! - **[`io`]**: Side-effecting seams behind traits (persisted record, dialogs,
//!   process handoff) so the state machine can be driven by fakes in tests.
//!
//! Orchestration modules ([`resolve`], [`launch`], [`status`]) tie the two
//! together for the CLI commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod launch;
pub mod logging;
pub mod marker;
pub mod resolve;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
