//! Note Context Extraction
//!
//! Builds the "current note" section of the system prompt: the note's
//! body truncated to a configured line count, its front-matter, an
//! optional text selection, and the notes that link back to it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::AssistantSettings;
use crate::preferences::parser::{parse_metadata_fields, split_metadata};
use crate::utils::error::{AppError, AppResult};

/// Most back-linking notes to report
const MAX_BACKLINKS: usize = 10;

/// Directories to skip when scanning the vault for backlinks
const IGNORED_DIRS: &[&str] = &[".git", ".obsidian", ".trash", "node_modules"];

/// Context extracted from one note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteContext {
    /// Vault-relative path of the note
    pub path: String,
    /// Note name (file stem)
    pub name: String,
    /// Body content, truncated to the configured line count
    pub content: String,
    /// Front-matter fields, when the note declares any
    pub frontmatter: Option<BTreeMap<String, String>>,
    /// Vault-relative paths of notes linking to this one, sorted
    pub backlinks: Vec<String>,
    /// Text the user had selected, if any
    pub selection: Option<String>,
}

/// Builds `NoteContext` values from notes inside a vault directory.
#[derive(Debug)]
pub struct NoteContextBuilder {
    vault_root: PathBuf,
    settings: AssistantSettings,
}

impl NoteContextBuilder {
    pub fn new(vault_root: impl Into<PathBuf>, settings: AssistantSettings) -> Self {
        Self {
            vault_root: vault_root.into(),
            settings,
        }
    }

    /// Replace the settings in effect for subsequent builds.
    pub fn update_settings(&mut self, settings: AssistantSettings) {
        self.settings = settings;
    }

    /// Build context for a note, given its vault-relative path.
    pub fn build_context(
        &self,
        note_path: &Path,
        selection: Option<String>,
    ) -> AppResult<NoteContext> {
        let full_path = self.vault_root.join(note_path);
        if !full_path.is_file() {
            return Err(AppError::not_found(format!(
                "Note not found: {}",
                note_path.display()
            )));
        }

        let raw = std::fs::read_to_string(&full_path)?;
        let (metadata, body) = split_metadata(&raw);
        let frontmatter = metadata.as_deref().map(parse_metadata_fields);

        let name = note_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("note")
            .to_string();

        let backlinks = if self.settings.include_backlinks {
            self.collect_backlinks(note_path, &name)?
        } else {
            Vec::new()
        };

        Ok(NoteContext {
            path: note_path.to_string_lossy().into_owned(),
            name,
            content: self.truncate_content(body.trim()),
            frontmatter,
            backlinks,
            selection,
        })
    }

    /// Truncate content to the configured number of lines, appending a
    /// marker when anything was cut.
    fn truncate_content(&self, content: &str) -> String {
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() <= self.settings.context_lines {
            return content.to_string();
        }
        let kept = lines[..self.settings.context_lines].join("\n");
        format!("{}\n\n[...truncated]", kept)
    }

    /// Scan the vault for notes containing a `[[name]]` wiki-link to the
    /// target note. Results are vault-relative, sorted, and capped.
    fn collect_backlinks(&self, note_path: &Path, name: &str) -> AppResult<Vec<String>> {
        if !self.vault_root.is_dir() {
            return Err(AppError::validation(format!(
                "Vault root is not a directory: {}",
                self.vault_root.display()
            )));
        }

        let link = format!("[[{}", name);
        let mut backlinks = Vec::new();
        let mut notes = Vec::new();
        walk_notes(&self.vault_root, &mut notes);

        for candidate in notes {
            let relative = match candidate.strip_prefix(&self.vault_root) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            if relative == note_path {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&candidate) else {
                continue;
            };
            // Match [[name]] and aliased/heading forms like [[name|alias]].
            if content.match_indices(&link).any(|(i, _)| {
                matches!(
                    content[i + link.len()..].chars().next(),
                    Some(']') | Some('|') | Some('#')
                )
            }) {
                backlinks.push(relative.to_string_lossy().into_owned());
            }
        }

        backlinks.sort();
        backlinks.truncate(MAX_BACKLINKS);
        Ok(backlinks)
    }
}

/// Recursively collect `.md` files under a directory.
fn walk_notes(dir: &Path, notes: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let dir_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !IGNORED_DIRS.contains(&dir_name) {
                walk_notes(&path, notes);
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("md"))
            .unwrap_or(false)
        {
            notes.push(path);
        }
    }
}

/// Render a note context as the `## Current Note` prompt section.
pub fn format_context_for_prompt(context: &NoteContext) -> String {
    let mut output = format!("## Current Note: {}\n\n", context.name);

    if let Some(frontmatter) = &context.frontmatter {
        output.push_str("### Frontmatter\n```yaml\n");
        for (key, value) in frontmatter {
            output.push_str(&format!("{}: {}\n", key, value));
        }
        output.push_str("```\n\n");
    }

    if let Some(selection) = &context.selection {
        output.push_str(&format!("### Selected Text\n```\n{}\n```\n\n", selection));
    }

    output.push_str(&format!(
        "### Content\n```markdown\n{}\n```\n",
        context.content
    ));

    if !context.backlinks.is_empty() {
        output.push_str("\n### Backlinks\n");
        for backlink in &context.backlinks {
            output.push_str(&format!("- [[{}]]\n", backlink));
        }
    }

    output
}
