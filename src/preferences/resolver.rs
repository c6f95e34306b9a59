//! Preference Resolver
//!
//! The caller-owned handle over the whole pipeline: discovery, parsing,
//! merge, and formatting, plus the process-scoped state backing the
//! host's "what's loaded" display.
//!
//! There is exactly one logical owner (the hosting plugin instance), so
//! every mutating operation takes `&mut self` and a completed reload
//! replaces the state wholesale; if the caller races two reloads, the
//! last one to complete wins.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::config::{parse_context_tags, AssistantSettings};
use crate::preferences::discovery::discover_all;
use crate::preferences::format::format_for_prompt;
use crate::preferences::merge::merge_preferences;
use crate::preferences::model::{
    LoadReport, LoadStats, LoadWarning, MergedPreferences, PreferenceDocument, PreferenceSummary,
};
use crate::preferences::parser::parse_preference_file;

/// Last-loaded documents and last-computed merge, held between calls.
#[derive(Debug, Default)]
struct ResolverState {
    documents: Vec<PreferenceDocument>,
    merged: Option<MergedPreferences>,
    loaded_at: Option<DateTime<Utc>>,
}

/// Discovers, parses, merges, and formats preference documents.
#[derive(Debug)]
pub struct PreferenceResolver {
    settings: AssistantSettings,
    bundled_dir: Option<PathBuf>,
    state: ResolverState,
}

impl PreferenceResolver {
    /// Create a resolver over the given settings. No bundled tier is
    /// assumed; the host supplies one via `with_bundled_dir`.
    pub fn new(settings: AssistantSettings) -> Self {
        Self {
            settings,
            bundled_dir: None,
            state: ResolverState::default(),
        }
    }

    /// Set the directory holding the assistant's bundled preferences.
    pub fn with_bundled_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bundled_dir = Some(dir.into());
        self
    }

    /// Replace the settings and clear all loaded state.
    ///
    /// The resolver never reloads itself implicitly; the caller must
    /// invoke `load_preferences` again afterward.
    pub fn update_settings(&mut self, settings: AssistantSettings) {
        self.settings = settings;
        self.state = ResolverState::default();
    }

    /// Discover and parse preference documents from every configured
    /// source, replacing any previously loaded set.
    ///
    /// Never fails: unavailable sources and malformed files become
    /// warnings on the returned report, and a total absence of loadable
    /// preferences is a valid outcome.
    pub async fn load_preferences(&mut self) -> LoadReport {
        let (files, mut warnings) = discover_all(&self.settings, self.bundled_dir.as_deref());

        let mut documents = Vec::new();
        for file in files {
            match parse_preference_file(&file.path, &file.content, file.tier) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse preference file {}: {}",
                        file.path.display(),
                        e
                    );
                    warnings.push(LoadWarning::Malformed {
                        path: file.path,
                        error: e,
                    });
                }
            }
        }

        let loaded_at = Utc::now();
        tracing::debug!(
            "Loaded {} preference documents ({} warnings)",
            documents.len(),
            warnings.len()
        );

        self.state = ResolverState {
            documents,
            merged: None,
            loaded_at: Some(loaded_at),
        };

        LoadReport {
            documents_loaded: self.state.documents.len(),
            warnings,
            loaded_at,
        }
    }

    /// Merge the loaded documents under the current context tags and
    /// render the prompt fragment. Empty when nothing is loaded or
    /// nothing survives the filter; callers omit the section then.
    ///
    /// The merge result is retained for the status display.
    pub fn format_for_prompt(&mut self) -> String {
        if self.state.documents.is_empty() {
            return String::new();
        }

        let context_tags = parse_context_tags(&self.settings.context_tags);
        let merged = merge_preferences(&self.state.documents, &context_tags);
        let rendered = format_for_prompt(&merged);
        self.state.merged = Some(merged);
        rendered
    }

    /// The settings currently in effect.
    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }

    /// The bundled preferences directory, if one was supplied.
    pub fn bundled_dir(&self) -> Option<&Path> {
        self.bundled_dir.as_deref()
    }

    /// All documents from the last load, in discovery order.
    pub fn loaded_preferences(&self) -> &[PreferenceDocument] {
        &self.state.documents
    }

    /// Lightweight summaries of the loaded documents.
    pub fn summaries(&self) -> Vec<PreferenceSummary> {
        self.state.documents.iter().map(|d| d.to_summary()).collect()
    }

    /// Per-tier counts of the loaded documents.
    pub fn stats(&self) -> LoadStats {
        LoadStats::from_documents(&self.state.documents)
    }

    /// The last merge result, if `format_for_prompt` has run since the
    /// last load.
    pub fn last_merge(&self) -> Option<&MergedPreferences> {
        self.state.merged.as_ref()
    }

    /// When the current document set was loaded.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.state.loaded_at
    }
}
