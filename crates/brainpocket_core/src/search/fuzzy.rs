//! Typo-tolerant search over note content.
//!
//! # Responsibility
//! - Hold a lowercase copy of every note's content for one snapshot.
//! - Score notes by their best approximate substring match.
//!
//! # Invariants
//! - The index is rebuilt wholesale per snapshot, never patched.
//! - Match position inside the content does not affect the score.
//! - A blank query is `SearchOutcome::Inactive`, never "match everything".
//! - Hits are ordered best-first; equal scores keep collection order.

use crate::model::note::{Note, NoteId};
use std::cmp::Ordering;
use strsim::normalized_damerau_levenshtein;

/// Default maximum score (0 = exact, 1 = unrelated) accepted as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Tuning knobs for fuzzy matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Highest accepted score in `[0, 1]`.
    pub threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Single fuzzy-search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub note_id: NoteId,
    /// Position of the note in the indexed snapshot.
    pub position: usize,
    /// 0.0 for an exact substring match, up to the threshold otherwise.
    pub score: f64,
}

/// Tri-state search result.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchOutcome {
    /// No query entered.
    #[default]
    Inactive,
    /// A query was entered and nothing matched.
    NoMatches,
    /// Non-empty hit list, best match first.
    Matches(Vec<SearchHit>),
}

impl SearchOutcome {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Inactive)
    }

    /// Hit list; empty for both inactive and no-match states.
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            Self::Matches(hits) => hits,
            Self::Inactive | Self::NoMatches => &[],
        }
    }
}

#[derive(Debug, Clone)]
struct IndexEntry {
    note_id: NoteId,
    haystack: Vec<char>,
}

/// Fuzzy index over one note-collection snapshot.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    options: SearchOptions,
}

impl SearchIndex {
    pub fn build(notes: &[Note]) -> Self {
        Self::with_options(notes, SearchOptions::default())
    }

    pub fn with_options(notes: &[Note], options: SearchOptions) -> Self {
        let entries = notes
            .iter()
            .map(|note| IndexEntry {
                note_id: note.id,
                haystack: note.content.to_lowercase().chars().collect(),
            })
            .collect();
        Self { entries, options }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Runs `query` against the index.
    pub fn search(&self, query: &str) -> SearchOutcome {
        let needle: Vec<char> = query.trim().to_lowercase().chars().collect();
        if needle.is_empty() {
            return SearchOutcome::Inactive;
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                let score = match_score(&entry.haystack, &needle);
                (score <= self.options.threshold).then_some(SearchHit {
                    note_id: entry.note_id,
                    position,
                    score,
                })
            })
            .collect();

        if hits.is_empty() {
            return SearchOutcome::NoMatches;
        }

        hits.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
        SearchOutcome::Matches(hits)
    }
}

/// Best score of `needle` against any window of `haystack`.
///
/// Windows span the needle length plus/minus one character so a single
/// inserted or dropped character still lines up.
fn match_score(haystack: &[char], needle: &[char]) -> f64 {
    if haystack.is_empty() {
        return 1.0;
    }
    if haystack.windows(needle.len()).any(|window| window == needle) {
        return 0.0;
    }

    let needle_text: String = needle.iter().collect();
    if haystack.len() <= needle.len() {
        let text: String = haystack.iter().collect();
        return 1.0 - normalized_damerau_levenshtein(&text, &needle_text);
    }

    let mut best = 1.0_f64;
    let shortest = needle.len().saturating_sub(1).max(1);
    let longest = (needle.len() + 1).min(haystack.len());
    for width in shortest..=longest {
        for window in haystack.windows(width) {
            let text: String = window.iter().collect();
            let score = 1.0 - normalized_damerau_levenshtein(&text, &needle_text);
            if score < best {
                best = score;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(value: &str) -> Vec<char> {
        value.chars().collect()
    }

    #[test]
    fn exact_substring_scores_zero() {
        assert_eq!(match_score(&chars("buy milk today"), &chars("milk")), 0.0);
    }

    #[test]
    fn transposition_is_tolerated() {
        let score = match_score(&chars("buy milk today"), &chars("mlik"));
        assert!(score <= DEFAULT_THRESHOLD, "score was {score}");
    }

    #[test]
    fn dropped_character_is_tolerated() {
        let score = match_score(&chars("weekly meeting notes"), &chars("meetng"));
        assert!(score <= DEFAULT_THRESHOLD, "score was {score}");
    }

    #[test]
    fn unrelated_text_scores_high() {
        let score = match_score(&chars("call mom"), &chars("groceries"));
        assert!(score > DEFAULT_THRESHOLD, "score was {score}");
    }

    #[test]
    fn empty_haystack_never_matches() {
        assert_eq!(match_score(&[], &chars("x")), 1.0);
    }
}
