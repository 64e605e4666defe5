//! Keyword-based tag suggestions for draft content.
//!
//! # Invariants
//! - Matching is case-insensitive and whole-word only.
//! - The result never contains duplicates.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

const KEYWORD_TAGS: &[(&str, &str)] = &[
    ("todo", "task"),
    ("task", "task"),
    ("deadline", "task"),
    ("meeting", "meeting"),
    ("call", "meeting"),
    ("conference", "meeting"),
    ("event", "event"),
    ("idea", "idea"),
    ("brainstorm", "idea"),
    ("concept", "idea"),
    ("creative", "creative"),
    ("bug", "bug"),
    ("fix", "bug"),
    ("feature", "feature"),
    ("code", "coding"),
    ("dev", "coding"),
    ("test", "testing"),
    ("learn", "learning"),
    ("study", "learning"),
    ("research", "research"),
    ("read", "reading"),
    ("book", "reading"),
    ("article", "reading"),
    ("project", "project"),
    ("milestone", "project"),
    ("planning", "planning"),
    ("goal", "goal"),
    ("reminder", "reminder"),
    ("note", "note"),
    ("important", "important"),
    ("urgent", "urgent"),
];

static KEYWORD_MATCHERS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    KEYWORD_TAGS
        .iter()
        .map(|(keyword, tag)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
            (Regex::new(&pattern).expect("valid keyword regex"), *tag)
        })
        .collect()
});

/// Returns the tags whose keywords appear as whole words in `content`.
pub fn suggest_tags(content: &str) -> BTreeSet<&'static str> {
    KEYWORD_MATCHERS
        .iter()
        .filter(|(matcher, _)| matcher.is_match(content))
        .map(|(_, tag)| *tag)
        .collect()
}
