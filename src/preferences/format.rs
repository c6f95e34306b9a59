//! Preference Formatting
//!
//! Renders a merge result into a single text block for embedding inside a
//! larger LLM system prompt. Plain string construction, byte-identical
//! across repeat calls on the same merge result.

use crate::preferences::model::MergedPreferences;

/// Render the merged documents as a prompt fragment.
///
/// An empty merge result yields an empty string; callers omit the section
/// entirely rather than treating that as an error.
pub fn format_for_prompt(merged: &MergedPreferences) -> String {
    if merged.documents.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str("## Coding Style Preferences\n\n");
    output.push_str(
        "The following preferences are binding guidance for any code or prose you produce:\n",
    );

    for (i, doc) in merged.documents.iter().enumerate() {
        output.push_str(&format!("\n### {}\n\n", doc.name));
        output.push_str(&doc.content);

        if i < merged.documents.len() - 1 {
            output.push_str("\n\n---\n");
        } else {
            output.push('\n');
        }
    }

    output
}
