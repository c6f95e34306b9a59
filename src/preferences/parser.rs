//! Preference File Parser
//!
//! Parses `*.pref.md` files: an optional leading metadata block between
//! `---` delimiters (`key: value` pairs for `name`, `priority`, `tags`)
//! followed by a markdown body. Unknown keys are ignored. A file without
//! a metadata block is all body and gets defaults for every field.
//!
//! Failures are typed (`MalformedPreference`) and never abort a load:
//! the caller records a warning and continues with the remaining files.
//!
//! `serialize_preference` is the write side of the same format; a file it
//! produces parses back to an equivalent document (same name, priority,
//! tags, and body).

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::preferences::model::{
    PreferenceDocument, SourceTier, DEFAULT_PRIORITY, PREFERENCE_SUFFIX,
};

/// Why a specific preference file was rejected.
///
/// `EmptyContent` and `InvalidPriority` carry precise causes for
/// user-facing diagnostics; I/O faults on individual files are folded in
/// as `Unreadable`.
#[derive(Error, Debug)]
pub enum MalformedPreference {
    /// The file has no body text after the metadata block
    #[error("no body content after the metadata block")]
    EmptyContent,

    /// The declared priority is not an integer
    #[error("declared priority is not an integer: {value:?}")]
    InvalidPriority { value: String },

    /// The file exists but could not be read
    #[error("could not be read: {source}")]
    Unreadable {
        #[source]
        source: std::io::Error,
    },
}

/// Parse one preference file's raw text into a `PreferenceDocument`.
///
/// The path supplies the fallback name when no `name` is declared; the
/// tier is recorded on the document and contributes its rank to the
/// effective priority.
pub fn parse_preference_file(
    path: &Path,
    content: &str,
    tier: SourceTier,
) -> Result<PreferenceDocument, MalformedPreference> {
    let (metadata, body) = split_metadata(content);
    let fields = metadata
        .as_deref()
        .map(parse_metadata_fields)
        .unwrap_or_default();

    let body = body.trim();
    if body.is_empty() {
        return Err(MalformedPreference::EmptyContent);
    }

    let name = fields
        .get("name")
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_name(path));

    let declared_priority = match fields.get("priority") {
        Some(raw) => {
            let trimmed = raw.trim();
            trimmed
                .parse::<i64>()
                .map_err(|_| MalformedPreference::InvalidPriority {
                    value: trimmed.to_string(),
                })?
        }
        None => DEFAULT_PRIORITY,
    };

    let tags = fields.get("tags").map(|v| parse_tag_list(v)).unwrap_or_default();

    let hash = compute_sha256(content);
    let id = generate_preference_id(&name, &hash);

    Ok(PreferenceDocument {
        id,
        name,
        content: body.to_string(),
        declared_priority,
        tags,
        source: tier,
        path: path.to_path_buf(),
        hash,
    })
}

/// Render a document back into the preference file format.
///
/// Parsing the output yields an equivalent document: same name, priority,
/// tags, and body. The id and hash are derived from the serialized text
/// and so differ from the original's.
pub fn serialize_preference(doc: &PreferenceDocument) -> String {
    let mut output = String::new();
    output.push_str("---\n");
    output.push_str(&format!("name: {}\n", doc.name));
    output.push_str(&format!("priority: {}\n", doc.declared_priority));
    if !doc.tags.is_empty() {
        output.push_str(&format!("tags: [{}]\n", doc.tags.join(", ")));
    }
    output.push_str("---\n\n");
    output.push_str(&doc.content);
    output.push('\n');
    output
}

/// Split content into an optional metadata block and the body.
/// Returns (Some(block_text), body) or (None, full_content).
pub(crate) fn split_metadata(content: &str) -> (Option<String>, String) {
    let trimmed = content.trim_start();
    let mut lines = trimmed.lines();

    match lines.next() {
        Some(first) if is_delimiter(first) => {}
        _ => return (None, content.to_string()),
    }

    let mut block_lines = Vec::new();
    while let Some(line) = lines.next() {
        if is_delimiter(line) {
            let body: Vec<&str> = lines.collect();
            return (Some(block_lines.join("\n")), body.join("\n"));
        }
        block_lines.push(line);
    }

    // Opening delimiter without a closing one: treat everything as body.
    (None, content.to_string())
}

fn is_delimiter(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

/// Parse a metadata block into a flat key -> raw value map.
/// Later duplicate keys win; lines without a colon are skipped.
pub(crate) fn parse_metadata_fields(block: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = parse_key_value(trimmed) {
            fields.insert(key.to_lowercase(), value);
        }
    }

    fields
}

/// Parse a `key: value` line. Returns (key, value_part).
fn parse_key_value(line: &str) -> Option<(String, String)> {
    let colon_pos = line.find(':')?;
    let key = line[..colon_pos].trim().to_string();
    let value = line[colon_pos + 1..].trim().to_string();
    if key.is_empty() || key.contains(' ') {
        return None;
    }
    Some((key, unquote(&value)))
}

/// Parse a tag declaration: an inline list `[a, b]` or a comma-separated
/// string. Tags are lowercased and deduplicated, preserving order.
fn parse_tag_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    let inner = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    let mut tags = Vec::new();
    for raw in inner.split(',') {
        let tag = unquote(raw.trim()).to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Remove surrounding quotes from a string value.
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"'))
            || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Fallback name: the file name with the `.pref.md` suffix stripped.
fn default_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("preference");

    file_name
        .strip_suffix(PREFERENCE_SUFFIX)
        .unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("preference")
        })
        .to_string()
}

/// Compute the SHA-256 hash of content, returning the full hex string.
pub fn compute_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Generate a document id: normalized name + "-" + first 12 chars of hash.
pub fn generate_preference_id(name: &str, hash: &str) -> String {
    let normalized = name
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect::<String>();

    let hash_prefix = if hash.len() >= 12 { &hash[..12] } else { hash };

    format!("{}-{}", normalized, hash_prefix)
}
