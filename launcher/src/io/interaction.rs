//! Interaction provider: messages and the directory picker.
//!
//! The [`Interaction`] trait decouples resolution from how the user is asked.
//! [`DialogInteraction`] uses native dialogs for double-click launches,
//! [`ConsoleInteraction`] prompts on the terminal. Tests use scripted providers.

use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use dialoguer::Input;
use tracing::{debug, warn};

pub use crate::core::state::Pick;
use crate::io::paths::expand_user_path;

/// Blocking user interaction used by the resolver.
pub trait Interaction {
    fn info(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
    /// Ask for a directory. Blocks until the user answers.
    fn pick_directory(&self, title: &str) -> Pick;
}

/// Native message boxes and folder picker.
pub struct DialogInteraction {
    unavailable: Option<String>,
    start_dir: Option<PathBuf>,
}

impl DialogInteraction {
    /// Check the environment once; without a display every dialog degrades.
    pub fn new() -> Self {
        let unavailable = detect_display();
        if let Some(reason) = &unavailable {
            warn!(reason = %reason, "native dialogs unavailable");
        }
        Self {
            unavailable,
            start_dir: dirs::home_dir(),
        }
    }

    fn message(&self, level: rfd::MessageLevel, title: &str, message: &str) {
        if self.unavailable.is_some() {
            eprintln!("{title}: {message}");
            return;
        }
        let _ = rfd::MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

impl Default for DialogInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction for DialogInteraction {
    fn info(&self, title: &str, message: &str) {
        self.message(rfd::MessageLevel::Info, title, message);
    }

    fn error(&self, title: &str, message: &str) {
        self.message(rfd::MessageLevel::Error, title, message);
    }

    fn pick_directory(&self, title: &str) -> Pick {
        if let Some(reason) = &self.unavailable {
            return Pick::Unavailable(reason.clone());
        }
        let mut dialog = rfd::FileDialog::new().set_title(title);
        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }
        match dialog.pick_folder() {
            Some(path) => {
                debug!(path = %path.display(), "directory picked");
                Pick::Chosen(path)
            }
            // rfd reports a failed portal the same way as a dismissed dialog.
            None => {
                debug!("picker returned no folder (dismissed, or the desktop portal failed)");
                Pick::Cancelled
            }
        }
    }
}

/// Detects a missing display only. With a display but no working
/// xdg-desktop-portal, `pick_folder` returns nothing and the pick reads as a
/// cancellation; `--console` is the way around that.
#[cfg(all(unix, not(target_os = "macos")))]
fn detect_display() -> Option<String> {
    missing_display_reason(|name| std::env::var_os(name))
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn detect_display() -> Option<String> {
    None
}

/// Reason dialogs cannot be shown on an X11/Wayland desktop, if any.
pub fn missing_display_reason(lookup: impl Fn(&str) -> Option<OsString>) -> Option<String> {
    let has_display = ["DISPLAY", "WAYLAND_DISPLAY"]
        .into_iter()
        .any(|name| lookup(name).is_some_and(|value| !value.is_empty()));
    if has_display {
        None
    } else {
        Some("no graphical display (DISPLAY and WAYLAND_DISPLAY are unset)".to_string())
    }
}

/// Terminal prompts; an empty answer cancels.
pub struct ConsoleInteraction;

impl Interaction for ConsoleInteraction {
    fn info(&self, title: &str, message: &str) {
        eprintln!("{title}\n{message}\n");
    }

    fn error(&self, title: &str, message: &str) {
        eprintln!("error: {title}: {message}");
    }

    fn pick_directory(&self, title: &str) -> Pick {
        if !std::io::stdin().is_terminal() {
            return Pick::Unavailable("standard input is not a terminal".to_string());
        }
        let answer = Input::<String>::new()
            .with_prompt(format!("{title} (leave empty to cancel)"))
            .allow_empty(true)
            .interact_text();
        match answer {
            Ok(raw) => parse_console_answer(&raw),
            Err(err) => Pick::Unavailable(format!("terminal prompt failed: {err}")),
        }
    }
}

/// Interpret a typed directory; blank means cancel.
pub fn parse_console_answer(raw: &str) -> Pick {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Pick::Cancelled;
    }
    Pick::Chosen(expand_user_path(trimmed).unwrap_or_else(|| PathBuf::from(trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_detection() {
        assert!(missing_display_reason(|_| None).is_some());
        assert!(missing_display_reason(|_| Some(OsString::new())).is_some());
        assert_eq!(
            missing_display_reason(|name| (name == "WAYLAND_DISPLAY")
                .then(|| OsString::from("wayland-0"))),
            None
        );
        assert_eq!(
            missing_display_reason(|name| (name == "DISPLAY").then(|| OsString::from(":0"))),
            None
        );
    }

    #[test]
    fn console_answer_parsing() {
        assert_eq!(parse_console_answer("   "), Pick::Cancelled);
        assert_eq!(
            parse_console_answer(" /home/u/proj \n"),
            Pick::Chosen(PathBuf::from("/home/u/proj"))
        );
    }

    #[test]
    fn console_answer_expands_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(parse_console_answer("~/proj"), Pick::Chosen(home.join("proj")));
    }
}
