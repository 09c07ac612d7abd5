//! I/O seams for the launcher.

pub mod config;
pub mod config_store;
pub mod handoff;
pub mod interaction;
pub mod paths;
