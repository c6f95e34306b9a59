//! Preference Discovery
//!
//! Turns the caller's settings into an ordered list of source directories
//! and scans each for `*.pref.md` files. Discovery never fails: a missing
//! or unreadable source degrades to zero documents (plus a warning when
//! the source was explicitly configured), and file ordering within a
//! source is lexicographic so downstream tie-breaking is reproducible.

use std::path::{Path, PathBuf};

use crate::config::AssistantSettings;
use crate::preferences::model::{DiscoveredFile, LoadWarning, SourceTier, PREFERENCE_SUFFIX};
use crate::preferences::parser::MalformedPreference;
use crate::utils::paths::{default_personal_prefs_dir, expand_tilde};

/// Directories to skip during recursive walks
const IGNORED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".obsidian",
    ".trash",
    "node_modules",
    "target",
    "dist",
    "build",
    "__pycache__",
    ".venv",
];

/// Resolve the ordered source list from settings.
///
/// Order is fixed and determines tie-breaking downstream: bundled, then
/// personal, then team (the load order; rank offsets are a separate
/// concern handled by `SourceTier::rank`). Sources that do not resolve to
/// an existing directory are dropped; explicitly configured ones also
/// produce a `SourceUnavailable` warning.
pub(crate) fn resolve_sources(
    settings: &AssistantSettings,
    bundled_dir: Option<&Path>,
) -> (Vec<(SourceTier, PathBuf)>, Vec<LoadWarning>) {
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    if settings.use_bundled_prefs {
        if let Some(dir) = bundled_dir {
            if dir.is_dir() {
                sources.push((SourceTier::Bundled, dir.to_path_buf()));
            } else {
                warnings.push(LoadWarning::SourceUnavailable {
                    tier: SourceTier::Bundled,
                    path: dir.to_path_buf(),
                });
            }
        }
    }

    match settings.personal_path() {
        Some(configured) => {
            let dir = expand_tilde(configured);
            if dir.is_dir() {
                sources.push((SourceTier::Personal, dir));
            } else {
                warnings.push(LoadWarning::SourceUnavailable {
                    tier: SourceTier::Personal,
                    path: dir,
                });
            }
        }
        None => {
            // Fall back to ~/.cotton/preferences, quietly skipped if absent.
            if let Ok(dir) = default_personal_prefs_dir() {
                if dir.is_dir() {
                    sources.push((SourceTier::Personal, dir));
                }
            }
        }
    }

    if let Some(configured) = settings.team_path() {
        let dir = expand_tilde(configured);
        if dir.is_dir() {
            sources.push((SourceTier::Team, dir));
        } else {
            warnings.push(LoadWarning::SourceUnavailable {
                tier: SourceTier::Team,
                path: dir,
            });
        }
    }

    (sources, warnings)
}

/// Recursively collect `*.pref.md` files under a directory,
/// sorted lexicographically by full path.
pub fn discover_preference_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_preference_directory(dir, &mut files);
    files.sort();
    files
}

fn walk_preference_directory(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let dir_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !IGNORED_DIRS.contains(&dir_name) {
                walk_preference_directory(&path, files);
            }
        } else if is_preference_file(&path) {
            files.push(path);
        }
    }
}

/// Check if a path carries the two-part preference suffix (`.pref.md`).
pub(crate) fn is_preference_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(PREFERENCE_SUFFIX))
        .unwrap_or(false)
}

/// Discover and read every preference file across all resolved sources.
///
/// Returns files in source order, lexicographic within a source; a file
/// that cannot be read becomes a `Malformed` warning and is skipped.
pub(crate) fn discover_all(
    settings: &AssistantSettings,
    bundled_dir: Option<&Path>,
) -> (Vec<DiscoveredFile>, Vec<LoadWarning>) {
    let (sources, mut warnings) = resolve_sources(settings, bundled_dir);
    let mut discovered = Vec::new();

    for (tier, dir) in sources {
        for path in discover_preference_files(&dir) {
            match std::fs::read_to_string(&path) {
                Ok(content) => discovered.push(DiscoveredFile {
                    path,
                    content,
                    tier,
                }),
                Err(e) => {
                    tracing::warn!("Failed to read preference file {}: {}", path.display(), e);
                    warnings.push(LoadWarning::Malformed {
                        path,
                        error: MalformedPreference::Unreadable { source: e },
                    });
                }
            }
        }
    }

    (discovered, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings_with_paths(personal: Option<&Path>, team: Option<&Path>) -> AssistantSettings {
        AssistantSettings {
            use_bundled_prefs: false,
            personal_prefs_path: personal.map(|p| p.to_string_lossy().into_owned()),
            team_prefs_path: team.map(|p| p.to_string_lossy().into_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_preference_file() {
        assert!(is_preference_file(Path::new("rust-style.pref.md")));
        assert!(is_preference_file(Path::new("/a/b/x.pref.md")));
        assert!(!is_preference_file(Path::new("rust-style.md")));
        assert!(!is_preference_file(Path::new("rust-style.pref.txt")));
        assert!(!is_preference_file(Path::new("noext")));
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(discover_preference_files(dir.path()).is_empty());
    }

    #[test]
    fn test_discover_missing_dir() {
        assert!(discover_preference_files(Path::new("/nonexistent/prefs")).is_empty());
    }

    #[test]
    fn test_discover_matches_only_suffix() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("style.pref.md"), "Body").unwrap();
        fs::write(dir.path().join("readme.md"), "Not a preference").unwrap();
        fs::write(dir.path().join("notes.txt"), "Nope").unwrap();

        let files = discover_preference_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("style.pref.md"));
    }

    #[test]
    fn test_discover_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("zeta.pref.md"), "Z").unwrap();
        fs::write(dir.path().join("alpha.pref.md"), "A").unwrap();
        fs::write(dir.path().join("nested/mid.pref.md"), "M").unwrap();

        let files = discover_preference_files(dir.path());
        assert_eq!(files.len(), 3);
        // Lexicographic by full path, so `alpha` < `nested/mid` < `zeta`.
        assert!(files[0].ends_with("alpha.pref.md"));
        assert!(files[1].ends_with("nested/mid.pref.md"));
        assert!(files[2].ends_with("zeta.pref.md"));
    }

    #[test]
    fn test_ignored_dirs_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join(".git/hidden.pref.md"), "X").unwrap();
        fs::write(dir.path().join("node_modules/dep.pref.md"), "X").unwrap();
        fs::write(dir.path().join("kept.pref.md"), "X").unwrap();

        let files = discover_preference_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("kept.pref.md"));
    }

    #[test]
    fn test_resolve_sources_order() {
        let bundled = TempDir::new().unwrap();
        let personal = TempDir::new().unwrap();
        let team = TempDir::new().unwrap();

        let mut settings = settings_with_paths(Some(personal.path()), Some(team.path()));
        settings.use_bundled_prefs = true;

        let (sources, warnings) = resolve_sources(&settings, Some(bundled.path()));
        assert!(warnings.is_empty());
        let tiers: Vec<SourceTier> = sources.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            tiers,
            vec![SourceTier::Bundled, SourceTier::Personal, SourceTier::Team]
        );
    }

    #[test]
    fn test_resolve_sources_missing_configured_path_warns() {
        let settings =
            settings_with_paths(Some(Path::new("/definitely/not/a/real/dir")), None);
        let (sources, warnings) = resolve_sources(&settings, None);
        assert!(sources.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            LoadWarning::SourceUnavailable {
                tier: SourceTier::Personal,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_sources_bundled_disabled() {
        let bundled = TempDir::new().unwrap();
        let settings = settings_with_paths(None, None);
        let (sources, _) = resolve_sources(&settings, Some(bundled.path()));
        assert!(!sources.iter().any(|(t, _)| *t == SourceTier::Bundled));
    }

    #[test]
    fn test_resolve_sources_missing_bundled_warns() {
        let mut settings = settings_with_paths(None, None);
        settings.use_bundled_prefs = true;
        let (_, warnings) = resolve_sources(&settings, Some(Path::new("/no/bundled/here")));
        assert!(matches!(
            warnings[0],
            LoadWarning::SourceUnavailable {
                tier: SourceTier::Bundled,
                ..
            }
        ));
    }

    #[test]
    fn test_discover_all_reads_content_and_tiers() {
        let personal = TempDir::new().unwrap();
        let team = TempDir::new().unwrap();
        fs::write(personal.path().join("mine.pref.md"), "personal body").unwrap();
        fs::write(team.path().join("ours.pref.md"), "team body").unwrap();

        let settings = settings_with_paths(Some(personal.path()), Some(team.path()));
        let (files, warnings) = discover_all(&settings, None);

        assert!(warnings.is_empty());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].tier, SourceTier::Personal);
        assert_eq!(files[0].content, "personal body");
        assert_eq!(files[1].tier, SourceTier::Team);
        assert_eq!(files[1].content, "team body");
    }
}
