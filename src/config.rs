//! Assistant Configuration
//!
//! The caller-owned settings object the resolver and context builder read.
//! Settings arrive from a host-managed JSON file; this crate only reads
//! them, it never persists them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::error::{AppError, AppResult};

/// Settings consumed by the preference resolver and note context builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Load the preferences bundled with the assistant
    #[serde(default = "default_use_bundled")]
    pub use_bundled_prefs: bool,

    /// Path to the personal preferences directory (supports a leading `~`)
    #[serde(default)]
    pub personal_prefs_path: Option<String>,

    /// Path to the team preferences directory (supports a leading `~`)
    #[serde(default)]
    pub team_prefs_path: Option<String>,

    /// Comma-separated context tags restricting which preferences apply
    #[serde(default)]
    pub context_tags: String,

    /// Number of lines of the current note to include as context
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Include back-linking notes in the context section
    #[serde(default = "default_include_backlinks")]
    pub include_backlinks: bool,
}

fn default_use_bundled() -> bool {
    true
}

fn default_context_lines() -> usize {
    100
}

fn default_include_backlinks() -> bool {
    true
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            use_bundled_prefs: true,
            personal_prefs_path: None,
            team_prefs_path: None,
            context_tags: String::new(),
            context_lines: 100,
            include_backlinks: true,
        }
    }
}

impl AssistantSettings {
    /// The configured personal path, treating blank strings as unset.
    pub fn personal_path(&self) -> Option<&str> {
        non_blank(self.personal_prefs_path.as_deref())
    }

    /// The configured team path, treating blank strings as unset.
    pub fn team_path(&self) -> Option<&str> {
        non_blank(self.team_prefs_path.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Load settings from a JSON file path.
/// Returns defaults if the file doesn't exist.
pub fn load_settings(path: &Path) -> AppResult<AssistantSettings> {
    if !path.exists() {
        return Ok(AssistantSettings::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::config(format!("Failed to read settings {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        AppError::config(format!(
            "Failed to parse settings {}: {}",
            path.display(),
            e
        ))
    })
}

/// Split a comma-separated tag string into lowercase tags.
/// Entries are trimmed and empty entries dropped; order is preserved.
pub fn parse_context_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AssistantSettings::default();
        assert!(settings.use_bundled_prefs);
        assert!(settings.personal_prefs_path.is_none());
        assert!(settings.team_prefs_path.is_none());
        assert_eq!(settings.context_tags, "");
        assert_eq!(settings.context_lines, 100);
        assert!(settings.include_backlinks);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let settings = load_settings(Path::new("/nonexistent/settings.json")).unwrap();
        assert!(settings.use_bundled_prefs);
        assert_eq!(settings.context_lines, 100);
    }

    #[test]
    fn test_load_valid_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let content = r#"{
            "use_bundled_prefs": false,
            "personal_prefs_path": "~/prefs",
            "team_prefs_path": "/team/prefs",
            "context_tags": "react, css",
            "context_lines": 40,
            "include_backlinks": false
        }"#;
        fs::write(&path, content).unwrap();

        let settings = load_settings(&path).unwrap();
        assert!(!settings.use_bundled_prefs);
        assert_eq!(settings.personal_prefs_path.as_deref(), Some("~/prefs"));
        assert_eq!(settings.team_prefs_path.as_deref(), Some("/team/prefs"));
        assert_eq!(settings.context_tags, "react, css");
        assert_eq!(settings.context_lines, 40);
        assert!(!settings.include_backlinks);
    }

    #[test]
    fn test_load_partial_settings_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "context_tags": "rust" }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert!(settings.use_bundled_prefs);
        assert_eq!(settings.context_tags, "rust");
        assert_eq!(settings.context_lines, 100);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not valid json").unwrap();

        let result = load_settings(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_paths_treated_as_unset() {
        let settings = AssistantSettings {
            personal_prefs_path: Some("  ".to_string()),
            team_prefs_path: Some(String::new()),
            ..Default::default()
        };
        assert!(settings.personal_path().is_none());
        assert!(settings.team_path().is_none());
    }

    #[test]
    fn test_parse_context_tags() {
        assert_eq!(
            parse_context_tags("react, CSS, , typescript"),
            vec!["react", "css", "typescript"]
        );
    }

    #[test]
    fn test_parse_context_tags_empty() {
        assert!(parse_context_tags("").is_empty());
        assert!(parse_context_tags(" , ,").is_empty());
    }
}
