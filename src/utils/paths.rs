//! Cross-Platform Path Utilities
//!
//! Functions for resolving Cotton's directories and expanding
//! user-supplied paths.

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Cotton directory (~/.cotton/)
pub fn cotton_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".cotton"))
}

/// Get the default personal preferences directory (~/.cotton/preferences/)
pub fn default_personal_prefs_dir() -> AppResult<PathBuf> {
    Ok(cotton_dir()?.join("preferences"))
}

/// Expand a leading `~` to the user's home directory.
///
/// Only the leading tilde is replaced; no environment-variable expansion
/// is performed. If the home directory cannot be resolved the input is
/// returned unchanged.
pub fn expand_tilde(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            if rest.is_empty() {
                return home;
            }
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}
