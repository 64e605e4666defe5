//! Filter/sort pipeline for the displayed note sequence.
//!
//! Precedence, first match wins:
//! 1. An active search shows exactly its hits (or nothing on no match).
//! 2. The calendar view shows the selected day's bucket.
//! 3. Selected tags keep notes carrying any of them.
//! 4. Otherwise the full collection.
//!
//! The tasks view then keeps task-bearing notes and sorts them.

use crate::calendar::bucket::DayBuckets;
use crate::model::note::{normalize_tag, Note};
use crate::search::fuzzy::SearchOutcome;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sidebar view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    All,
    Tags,
    Calendar,
    Tasks,
    Assistant,
}

/// Field the tasks view sorts by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    DueDate,
    CreatedAt,
    Tags,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    /// Click-to-flip: same field flips direction, new field resets to ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Current UI selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub selected_tags: Vec<String>,
    pub selected_day: NaiveDate,
    pub search_text: String,
    pub sort: SortOrder,
}

impl ViewState {
    /// Default state: all notes, nothing selected, `today` as the calendar day.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            mode: ViewMode::All,
            selected_tags: Vec::new(),
            selected_day: today,
            search_text: String::new(),
            sort: SortOrder::default(),
        }
    }

    /// Switches view; returning to `All` clears the tag selection.
    pub fn select_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        if mode == ViewMode::All {
            self.selected_tags.clear();
        }
    }

    /// Adds `tag` to the selection, or removes it if already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        let Some(tag) = normalize_tag(tag) else {
            return;
        };
        if let Some(index) = self.selected_tags.iter().position(|t| *t == tag) {
            self.selected_tags.remove(index);
        } else {
            self.selected_tags.push(tag);
        }
    }

    pub fn select_day(&mut self, day: NaiveDate) {
        self.selected_day = day;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }
}

/// Derives the displayed note sequence.
///
/// `search` must come from an index built over the same `notes` snapshot.
pub fn derive_view<'a>(
    notes: &'a [Note],
    state: &ViewState,
    search: &SearchOutcome,
) -> Vec<&'a Note> {
    match search {
        SearchOutcome::Matches(hits) => {
            return hits
                .iter()
                .filter_map(|hit| notes.get(hit.position).filter(|note| note.id == hit.note_id))
                .collect();
        }
        SearchOutcome::NoMatches => return Vec::new(),
        SearchOutcome::Inactive => {}
    }

    let mut displayed: Vec<&'a Note> = if state.mode == ViewMode::Calendar {
        DayBuckets::build(notes).get(state.selected_day).to_vec()
    } else if !state.selected_tags.is_empty() {
        filter_by_tags(notes, &state.selected_tags)
    } else {
        notes.iter().collect()
    };

    if state.mode == ViewMode::Tasks {
        displayed.retain(|note| note.has_task());
        sort_tasks(&mut displayed, state.sort);
    }
    displayed
}

/// Notes carrying at least one of `tags`, in collection order.
pub fn filter_by_tags<'a>(notes: &'a [Note], tags: &[String]) -> Vec<&'a Note> {
    notes.iter().filter(|note| note.has_any_tag(tags)).collect()
}

/// Stable sort; equal keys keep their incoming order in both directions.
pub fn sort_tasks(notes: &mut [&Note], order: SortOrder) {
    notes.sort_by(|a, b| {
        let ordering = compare_by(a, b, order.field);
        match order.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_by(a: &Note, b: &Note, field: SortField) -> Ordering {
    match field {
        SortField::DueDate => match (&a.task, &b.task) {
            (Some(a), Some(b)) => a.due.chronological_cmp(&b.due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        // Whole joined string, not per-tag.
        SortField::Tags => a.joined_tags().cmp(&b.joined_tags()),
    }
}
