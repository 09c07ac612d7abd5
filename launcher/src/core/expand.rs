//! `~` expansion for user-entered and persisted paths.

use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~/` against `home`.
///
/// Returns `None` for blank input, or when the path needs a home directory
/// and none is known. `~user` forms are left untouched.
pub fn expand_user(raw: &str, home: Option<&Path>) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == "~" {
        return home.map(Path::to_path_buf);
    }
    if let Some(rest) = trimmed
        .strip_prefix("~/")
        .or_else(|| trimmed.strip_prefix("~\\"))
    {
        return home.map(|home| home.join(rest));
    }
    Some(PathBuf::from(trimmed))
}
