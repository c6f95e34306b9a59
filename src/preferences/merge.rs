//! Preference Merge & Filter
//!
//! Combines parsed documents from all sources into the final ordered list:
//! tag filter first, then a stable descending sort by effective priority.
//!
//! Documents sharing an id co-exist rather than shadowing one another;
//! both appear, ordered by priority like any other pair.

use std::collections::BTreeSet;

use crate::preferences::model::{MergedPreferences, PreferenceDocument};

/// Merge documents under the caller's context tags.
///
/// With empty `context_tags` every document passes. Otherwise a document
/// passes if it is untagged or shares at least one tag with the context
/// (case-insensitive). Survivors are sorted descending by effective
/// priority; the sort is stable, so ties keep discovery order.
pub fn merge_preferences(
    documents: &[PreferenceDocument],
    context_tags: &[String],
) -> MergedPreferences {
    let mut survivors: Vec<PreferenceDocument> = documents
        .iter()
        .filter(|doc| doc.applies_to(context_tags))
        .cloned()
        .collect();

    survivors.sort_by(|a, b| b.effective_priority().cmp(&a.effective_priority()));

    let matched_tags = collect_matched_tags(&survivors, context_tags);

    MergedPreferences {
        documents: survivors,
        context_tags: context_tags.to_vec(),
        matched_tags,
    }
}

/// Tags that actually intersected a surviving document, sorted for a
/// deterministic status display.
fn collect_matched_tags(survivors: &[PreferenceDocument], context_tags: &[String]) -> Vec<String> {
    let mut matched = BTreeSet::new();
    for doc in survivors {
        for tag in &doc.tags {
            if context_tags.iter().any(|c| c.eq_ignore_ascii_case(tag)) {
                matched.insert(tag.to_lowercase());
            }
        }
    }
    matched.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::model::SourceTier;
    use std::path::PathBuf;

    fn make_doc(
        name: &str,
        source: SourceTier,
        priority: i64,
        tags: &[&str],
    ) -> PreferenceDocument {
        PreferenceDocument {
            id: format!("{}-000000000000", name),
            name: name.to_string(),
            content: format!("Guidance from {}.", name),
            declared_priority: priority,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source,
            path: PathBuf::from(format!("/prefs/{}.pref.md", name)),
            hash: "0".repeat(64),
        }
    }

    #[test]
    fn test_empty_context_passes_everything() {
        let docs = vec![
            make_doc("a", SourceTier::Bundled, 100, &["react"]),
            make_doc("b", SourceTier::Bundled, 100, &[]),
        ];
        let merged = merge_preferences(&docs, &[]);
        assert_eq!(merged.documents.len(), 2);
        assert!(merged.matched_tags.is_empty());
    }

    #[test]
    fn test_tag_filter() {
        let docs = vec![
            make_doc("react-doc", SourceTier::Bundled, 100, &["react"]),
            make_doc("css-doc", SourceTier::Bundled, 100, &["css"]),
            make_doc("untagged", SourceTier::Bundled, 100, &[]),
        ];
        let merged = merge_preferences(&docs, &["react".to_string()]);

        let names: Vec<&str> = merged.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["react-doc", "untagged"]);
        assert_eq!(merged.matched_tags, vec!["react"]);
    }

    #[test]
    fn test_tag_filter_case_insensitive() {
        let docs = vec![make_doc("a", SourceTier::Bundled, 100, &["react"])];
        let merged = merge_preferences(&docs, &["REACT".to_string()]);
        assert_eq!(merged.documents.len(), 1);
        assert_eq!(merged.matched_tags, vec!["react"]);
    }

    #[test]
    fn test_sorted_descending_by_effective_priority() {
        // Shuffled discovery order; effective priorities 100, 300, 250.
        let docs = vec![
            make_doc("low", SourceTier::Bundled, 100, &[]),
            make_doc("high", SourceTier::Personal, 100, &[]),
            make_doc("mid", SourceTier::Team, 100, &[]),
        ];
        let merged = merge_preferences(&docs, &[]);

        let priorities: Vec<i64> = merged
            .documents
            .iter()
            .map(|d| d.effective_priority())
            .collect();
        assert_eq!(priorities, vec![300, 250, 100]);
    }

    #[test]
    fn test_equal_priority_keeps_discovery_order() {
        let docs = vec![
            make_doc("first", SourceTier::Team, 100, &[]),
            make_doc("second", SourceTier::Team, 100, &[]),
            make_doc("third", SourceTier::Team, 100, &[]),
        ];
        let merged = merge_preferences(&docs, &[]);

        let names: Vec<&str> = merged.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_personal_wins_over_team_at_equal_declared_priority() {
        let docs = vec![
            make_doc("team-doc", SourceTier::Team, 100, &[]),
            make_doc("personal-doc", SourceTier::Personal, 100, &[]),
        ];
        let merged = merge_preferences(&docs, &[]);
        assert_eq!(merged.documents[0].name, "personal-doc");
        assert_eq!(merged.documents[1].name, "team-doc");
    }

    #[test]
    fn test_same_id_documents_coexist() {
        let mut a = make_doc("style", SourceTier::Team, 100, &[]);
        let mut b = make_doc("style", SourceTier::Personal, 100, &[]);
        a.id = "style-duplicate".to_string();
        b.id = "style-duplicate".to_string();

        let merged = merge_preferences(&[a, b], &[]);
        assert_eq!(merged.documents.len(), 2);
    }

    #[test]
    fn test_matched_tags_across_survivors() {
        let docs = vec![
            make_doc("a", SourceTier::Bundled, 100, &["react", "frontend"]),
            make_doc("b", SourceTier::Bundled, 100, &["rust"]),
        ];
        let merged =
            merge_preferences(&docs, &["react".to_string(), "rust".to_string()]);
        assert_eq!(merged.matched_tags, vec!["react", "rust"]);
    }

    #[test]
    fn test_context_tags_recorded() {
        let docs = vec![make_doc("a", SourceTier::Bundled, 100, &[])];
        let merged = merge_preferences(&docs, &["react".to_string()]);
        assert_eq!(merged.context_tags, vec!["react"]);
    }
}
