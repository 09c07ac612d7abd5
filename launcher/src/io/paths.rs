//! Well-known locations in the user's home directory.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::expand::expand_user;

/// File name of the persisted record, directly under the home directory.
pub const RECORD_FILE_NAME: &str = ".nba_watchlist_launcher.json";

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("could not resolve home directory")
}

/// Default location of the persisted record (`~/.nba_watchlist_launcher.json`).
pub fn default_record_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(RECORD_FILE_NAME))
}

/// Expand `~` in a user-supplied path against the current home directory.
pub fn expand_user_path(raw: &str) -> Option<PathBuf> {
    expand_user(raw, dirs::home_dir().as_deref())
}
