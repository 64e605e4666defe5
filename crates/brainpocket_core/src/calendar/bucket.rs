//! Day buckets of task-bearing notes.

use crate::model::note::Note;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rendering hint for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Empty,
    HasTasks,
    Urgent,
}

/// Notes grouped by the calendar day of their task due date.
///
/// Each bucket keeps collection order. A note appears in at most one bucket.
#[derive(Debug, Clone, Default)]
pub struct DayBuckets<'a> {
    buckets: BTreeMap<NaiveDate, Vec<&'a Note>>,
}

impl<'a> DayBuckets<'a> {
    /// Buckets every note that has a task.
    pub fn build(notes: &'a [Note]) -> Self {
        let mut buckets: BTreeMap<NaiveDate, Vec<&'a Note>> = BTreeMap::new();
        for note in notes {
            if let Some(task) = &note.task {
                buckets.entry(task.due.day()).or_default().push(note);
            }
        }
        Self { buckets }
    }

    /// Notes due on `day`, in collection order.
    pub fn get(&self, day: NaiveDate) -> &[&'a Note] {
        self.buckets.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn task_count(&self, day: NaiveDate) -> usize {
        self.get(day).len()
    }

    pub fn urgent_count(&self, day: NaiveDate, now: NaiveDateTime) -> usize {
        self.get(day)
            .iter()
            .filter(|note| note.task.as_ref().is_some_and(|task| task.due.is_urgent(now)))
            .count()
    }

    pub fn status(&self, day: NaiveDate, now: NaiveDateTime) -> DayStatus {
        if self.urgent_count(day, now) > 0 {
            DayStatus::Urgent
        } else if self.task_count(day) > 0 {
            DayStatus::HasTasks
        } else {
            DayStatus::Empty
        }
    }

    /// Days with at least one task, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Note])> + '_ {
        self.buckets.iter().map(|(day, notes)| (*day, notes.as_slice()))
    }

    /// Number of non-empty days.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
