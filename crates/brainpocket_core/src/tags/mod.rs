//! Tag helpers that operate on draft content and note collections.
//!
//! # Responsibility
//! - Suggest tags for the note currently being drafted.
//! - List the tags available to the tag filter.

pub mod suggest;

use crate::model::note::Note;
use std::collections::HashSet;

/// Distinct tags across `notes`, in first-seen order.
pub fn all_tags(notes: &[Note]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for tag in notes.iter().flat_map(|note| &note.tags) {
        if seen.insert(tag.as_str()) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::all_tags;
    use crate::model::note::{Note, NoteOrigin};

    #[test]
    fn all_tags_keeps_first_seen_order() {
        let notes = vec![
            Note::new(NoteOrigin::User, "one").tagged(["work", "ideas"]),
            Note::new(NoteOrigin::User, "two").tagged(["errand", "work"]),
        ];
        assert_eq!(all_tags(&notes), vec!["ideas", "work", "errand"]);
    }
}
