//! Preference System Data Types
//!
//! Core types for preference documents, source tiers, merge results, and
//! the load report surfaced to the host UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::preferences::parser::MalformedPreference;

/// File suffix marking a preference document (`*.pref.md`)
pub const PREFERENCE_SUFFIX: &str = ".pref.md";

/// Baseline declared priority when a document does not specify one
pub const DEFAULT_PRIORITY: i64 = 100;

/// Source tier for a preference document, determining its rank offset.
///
/// Personal outranks team on purpose: an individual's explicit overrides
/// win over shared team policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    /// Preferences bundled with the assistant (rank 0)
    Bundled,
    /// Shared team/project preferences (rank 150)
    Team,
    /// The user's personal preferences (rank 200)
    Personal,
}

impl SourceTier {
    /// Rank offset this tier contributes to effective priority.
    pub fn rank(self) -> i64 {
        match self {
            SourceTier::Bundled => 0,
            SourceTier::Team => 150,
            SourceTier::Personal => 200,
        }
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTier::Bundled => write!(f, "bundled"),
            SourceTier::Team => write!(f, "team"),
            SourceTier::Personal => write!(f, "personal"),
        }
    }
}

/// A parsed preference document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceDocument {
    /// Stable id: normalized name + first 12 chars of the content SHA-256.
    /// Unique within a load is not enforced; same-id documents co-exist.
    pub id: String,
    /// Human-readable title, used as a section heading
    pub name: String,
    /// Markdown body, opaque to the resolver
    pub content: String,
    /// Priority the document declares (defaults to 100)
    pub declared_priority: i64,
    /// Lowercase tags; empty means the document always applies
    pub tags: Vec<String>,
    /// Which source tier produced this document
    pub source: SourceTier,
    /// Source file path
    pub path: PathBuf,
    /// Full SHA-256 hex string of the raw file content
    pub hash: String,
}

impl PreferenceDocument {
    /// Declared priority plus the source tier's rank.
    /// Higher effective priority sorts first in the final output.
    pub fn effective_priority(&self) -> i64 {
        self.declared_priority + self.source.rank()
    }

    /// Whether this document applies under the given context tags.
    ///
    /// An empty context passes everything; an untagged document applies
    /// universally; otherwise at least one tag must intersect
    /// (case-insensitive).
    pub fn applies_to(&self, context_tags: &[String]) -> bool {
        context_tags.is_empty()
            || self.tags.is_empty()
            || self
                .tags
                .iter()
                .any(|t| context_tags.iter().any(|c| t.eq_ignore_ascii_case(c)))
    }

    /// Convert to a lightweight summary for status displays.
    pub fn to_summary(&self) -> PreferenceSummary {
        PreferenceSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            declared_priority: self.declared_priority,
            effective_priority: self.effective_priority(),
            tags: self.tags.clone(),
            source: self.source,
            path: self.path.clone(),
        }
    }
}

/// Lightweight summary without body (for UI listings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceSummary {
    pub id: String,
    pub name: String,
    pub declared_priority: i64,
    pub effective_priority: i64,
    pub tags: Vec<String>,
    pub source: SourceTier,
    pub path: PathBuf,
}

/// The result of merging loaded documents under a set of context tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedPreferences {
    /// Surviving documents, ordered descending by effective priority
    pub documents: Vec<PreferenceDocument>,
    /// Context tags the merge was computed with
    pub context_tags: Vec<String>,
    /// Tags that actually matched a surviving document, sorted
    pub matched_tags: Vec<String>,
}

/// A raw file discovered during scanning, before parsing.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub content: String,
    pub tier: SourceTier,
}

/// A non-fatal problem encountered during a load.
///
/// Warnings never abort the load; the caller decides whether to surface
/// them to the end user.
#[derive(Debug)]
pub enum LoadWarning {
    /// A configured source directory is missing or unreadable
    SourceUnavailable { tier: SourceTier, path: PathBuf },
    /// A specific file failed to parse and was skipped
    Malformed {
        path: PathBuf,
        error: MalformedPreference,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::SourceUnavailable { tier, path } => {
                write!(
                    f,
                    "{} preferences directory unavailable: {}",
                    tier,
                    path.display()
                )
            }
            LoadWarning::Malformed { path, error } => {
                write!(f, "skipped {}: {}", path.display(), error)
            }
        }
    }
}

/// Outcome of a `load_preferences` call.
#[derive(Debug)]
pub struct LoadReport {
    pub documents_loaded: usize,
    pub warnings: Vec<LoadWarning>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadReport {
    /// Warning messages ready for a host notice list.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

/// Per-tier document counts for the status display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadStats {
    pub total: usize,
    pub bundled: usize,
    pub team: usize,
    pub personal: usize,
}

impl LoadStats {
    /// Tally documents by source tier.
    pub fn from_documents(documents: &[PreferenceDocument]) -> Self {
        let mut stats = LoadStats {
            total: documents.len(),
            ..Default::default()
        };
        for doc in documents {
            match doc.source {
                SourceTier::Bundled => stats.bundled += 1,
                SourceTier::Team => stats.team += 1,
                SourceTier::Personal => stats.personal += 1,
            }
        }
        stats
    }
}
