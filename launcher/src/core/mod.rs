//! Pure logic for resolving and launching: no filesystem, no dialogs.

pub mod expand;
pub mod search_path;
pub mod state;
