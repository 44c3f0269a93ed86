//! XDG-style path utilities for configuration, cache, and data directories.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use std::path::PathBuf;

/// Returns the configuration directory for da.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/da` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/da` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME").map_or_else(
        |_| home_dir().join(".config").join("da"),
        |xdg| PathBuf::from(xdg).join("da"),
    )
}

/// Returns the cache directory for da (generated audio lives here).
///
/// Resolution order:
/// 1. `$XDG_CACHE_HOME/da` if `XDG_CACHE_HOME` is set
/// 2. `~/.cache/da` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn cache_dir() -> PathBuf {
    std::env::var("XDG_CACHE_HOME").map_or_else(
        |_| home_dir().join(".cache").join("da"),
        |xdg| PathBuf::from(xdg).join("da"),
    )
}

/// Returns the data directory for da (chat history, TTS settings).
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/da` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/da` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME").map_or_else(
        |_| home_dir().join(".local").join("share").join("da"),
        |xdg| PathBuf::from(xdg).join("da"),
    )
}

/// Returns the user's home directory.
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
#[allow(clippy::expect_used)]
fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Failed to determine home directory")
}
