//! CLI module for the cook-along timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;

use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::debug;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;

use crate::types::SessionConfig;

/// Loads the session configuration.
///
/// An explicit path must exist. Without one, the default location is used
/// if present and built-in defaults otherwise.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    if let Some(path) = path {
        return SessionConfig::load(path).map_err(|e| anyhow!(e));
    }
    match SessionConfig::default_path() {
        Some(default) if default.is_file() => {
            debug!("Loading config from {}", default.display());
            SessionConfig::load(&default).map_err(|e| anyhow!(e))
        }
        _ => Ok(SessionConfig::default()),
    }
}
