//! Snapshot holder pairing a note collection with its search index.
//!
//! # Invariants
//! - `notes` and `index` always describe the same snapshot.
//! - A new snapshot replaces both wholesale.

use crate::calendar::bucket::DayBuckets;
use crate::calendar::month::{month_grid, CalendarDay};
use crate::model::note::Note;
use crate::search::fuzzy::{SearchIndex, SearchOptions, SearchOutcome};
use crate::tags::all_tags;
use crate::tags::suggest::suggest_tags;
use crate::view::pipeline::{derive_view, ViewState};
use chrono::NaiveDateTime;
use log::debug;
use std::collections::BTreeSet;

/// Read-through projection of the persisted collection.
#[derive(Debug, Clone, Default)]
pub struct Board {
    notes: Vec<Note>,
    index: SearchIndex,
    options: SearchOptions,
}

impl Board {
    pub fn new(notes: Vec<Note>) -> Self {
        Self::with_search_options(notes, SearchOptions::default())
    }

    pub fn with_search_options(notes: Vec<Note>, options: SearchOptions) -> Self {
        let index = SearchIndex::with_options(&notes, options);
        Self {
            notes,
            index,
            options,
        }
    }

    /// Swaps in a fresh snapshot from the persistence layer.
    pub fn replace_snapshot(&mut self, notes: Vec<Note>) {
        self.index = SearchIndex::with_options(&notes, self.options);
        self.notes = notes;
        debug!(
            "event=snapshot_replaced module=view status=ok notes={}",
            self.notes.len()
        );
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        self.index.search(query)
    }

    /// Displayed sequence for `state`, running its search text first.
    pub fn displayed(&self, state: &ViewState) -> Vec<&Note> {
        let search = self.search(&state.search_text);
        derive_view(&self.notes, state, &search)
    }

    pub fn day_buckets(&self) -> DayBuckets<'_> {
        DayBuckets::build(&self.notes)
    }

    /// Month grid around `state.selected_day`.
    pub fn month(&self, state: &ViewState, now: NaiveDateTime) -> Vec<CalendarDay> {
        month_grid(
            &self.day_buckets(),
            state.selected_day,
            state.selected_day,
            now,
        )
    }

    pub fn all_tags(&self) -> Vec<String> {
        all_tags(&self.notes)
    }

    /// Suggestions for draft content, minus tags the draft already has.
    pub fn suggest_tags(&self, draft: &str, existing: &[String]) -> BTreeSet<&'static str> {
        suggest_tags(draft)
            .into_iter()
            .filter(|tag| !existing.iter().any(|have| have == tag))
            .collect()
    }
}
