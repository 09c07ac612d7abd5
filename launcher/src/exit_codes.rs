//! Stable exit codes for launcher CLI commands.

/// Handoff started, or `status` found a valid saved location.
pub const OK: i32 = 0;
/// Fatal error: configuration, persisting the chosen location, or starting the entry script.
pub const FAILED: i32 = 1;
/// No repository location could be established (cancelled, no picker, nothing saved).
pub const ABORTED: i32 = 2;
