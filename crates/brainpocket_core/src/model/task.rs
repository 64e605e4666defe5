//! Task model attached 1:1 to a note.
//!
//! # Responsibility
//! - Define the schedulable to-do shape and its due-date semantics.
//! - Parse user-entered due dates into all-day or timed values.
//!
//! # Invariants
//! - `Task::title` is non-blank once validated.
//! - A due date at local midnight is treated as all-day.
//! - Due dates are wall-clock values in the viewer's local time zone.

use crate::model::note::NoteValidationError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

const URGENT_WINDOW_HOURS: i64 = 24;
const DATE_INPUT_FMT: &str = "%Y-%m-%d";
const DATETIME_INPUT_FMTS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Task urgency bucket chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Local wall-clock due date with an all-day flag.
///
/// The flag is always set for midnight values, so equality agrees with
/// `is_all_day()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawDueDate")]
pub struct DueDate {
    at: NaiveDateTime,
    all_day: bool,
}

/// Wire shape accepted from JSON imports before normalization.
#[derive(Deserialize)]
struct RawDueDate {
    at: NaiveDateTime,
    all_day: bool,
}

impl From<RawDueDate> for DueDate {
    fn from(raw: RawDueDate) -> Self {
        Self::normalized(raw.at, raw.all_day)
    }
}

impl DueDate {
    /// Date-only due date, pinned to local midnight.
    pub fn all_day(date: NaiveDate) -> Self {
        Self {
            at: date.and_time(NaiveTime::MIN),
            all_day: true,
        }
    }

    /// Date+time due date. A midnight value collapses to all-day.
    pub fn timed(at: NaiveDateTime) -> Self {
        Self::normalized(at, false)
    }

    fn normalized(at: NaiveDateTime, all_day: bool) -> Self {
        Self {
            at,
            all_day: all_day || at.time() == NaiveTime::MIN,
        }
    }

    /// Parses `YYYY-MM-DD` (all-day) or `YYYY-MM-DDTHH:MM[:SS]` (timed).
    pub fn parse(input: &str) -> Result<Self, NoteValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(NoteValidationError::MissingDueDate);
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_INPUT_FMT) {
            return Ok(Self::all_day(date));
        }

        DATETIME_INPUT_FMTS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(Self::timed)
            .ok_or_else(|| NoteValidationError::InvalidDueDate(trimmed.to_string()))
    }

    pub fn at(&self) -> NaiveDateTime {
        self.at
    }

    /// Calendar day this due date is bucketed under.
    pub fn day(&self) -> NaiveDate {
        self.at.date()
    }

    pub fn is_all_day(&self) -> bool {
        self.all_day
    }

    /// True iff the due date is strictly after `now` and at most 24h away.
    pub fn is_urgent(&self, now: NaiveDateTime) -> bool {
        let remaining = self.at - now;
        remaining > Duration::zero() && remaining <= Duration::hours(URGENT_WINDOW_HOURS)
    }

    /// Chronological comparison that ignores the all-day flag.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at)
    }

    /// Time-of-day label (`6:00 PM`), absent for all-day tasks.
    pub fn time_label(&self) -> Option<String> {
        if self.is_all_day() {
            None
        } else {
            Some(self.at.format("%-I:%M %p").to_string())
        }
    }

    /// Storage form used by the SQLite repository.
    pub fn to_storage(&self) -> String {
        self.at.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    pub fn from_storage(value: &str, all_day: bool) -> Option<Self> {
        let at = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()?;
        Some(Self::normalized(at, all_day))
    }
}

impl Display for DueDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_all_day() {
            write!(f, "{}", self.at.format("%b %-d, %Y"))
        } else {
            write!(f, "{}", self.at.format("%b %-d, %Y %-I:%M %p"))
        }
    }
}

/// Schedulable to-do owned by exactly one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub due: DueDate,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub completed: bool,
}

impl Task {
    pub fn new(title: impl Into<String>, due: DueDate) -> Self {
        Self {
            title: title.into(),
            due,
            description: None,
            priority: None,
            completed: false,
        }
    }

    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTaskTitle);
        }
        Ok(())
    }
}

/// Unvalidated task input as submitted from a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    /// Raw due-date input; `None` or blank is rejected.
    pub due: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, due: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due: Some(due.into()),
            description: None,
            priority: None,
        }
    }

    /// Validates the draft and builds an incomplete task.
    pub fn into_task(self) -> Result<Task, NoteValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(NoteValidationError::EmptyTaskTitle);
        }
        let raw_due = self.due.ok_or(NoteValidationError::MissingDueDate)?;
        let due = DueDate::parse(&raw_due)?;
        let description = self
            .description
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Task {
            title,
            due,
            description,
            priority: self.priority,
            completed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn parse_distinguishes_all_day_and_timed() {
        let all_day = DueDate::parse("2024-01-10").unwrap();
        assert!(all_day.is_all_day());
        assert_eq!(all_day.at(), at("2024-01-10T00:00"));

        let timed = DueDate::parse("2024-01-10T18:00").unwrap();
        assert!(!timed.is_all_day());
        assert_eq!(timed.day(), all_day.day());
    }

    #[test]
    fn midnight_timed_value_is_all_day() {
        let due = DueDate::parse("2024-01-10T00:00").unwrap();
        assert!(due.is_all_day());
        assert_eq!(due.time_label(), None);
        assert_eq!(due.to_string(), "Jan 10, 2024");
    }

    #[test]
    fn parse_rejects_blank_and_garbage() {
        assert_eq!(DueDate::parse("  "), Err(NoteValidationError::MissingDueDate));
        assert!(matches!(
            DueDate::parse("next tuesday"),
            Err(NoteValidationError::InvalidDueDate(_))
        ));
    }

    #[test]
    fn urgency_window_is_exclusive_of_now_and_inclusive_of_24h() {
        let now = at("2024-01-10T12:00");
        assert!(!DueDate::timed(now).is_urgent(now));
        assert!(DueDate::timed(at("2024-01-10T12:01")).is_urgent(now));
        assert!(DueDate::timed(at("2024-01-11T12:00")).is_urgent(now));
        assert!(!DueDate::timed(at("2024-01-11T12:01")).is_urgent(now));
        assert!(!DueDate::timed(at("2024-01-09T12:00")).is_urgent(now));
    }

    #[test]
    fn display_formats_timed_due_dates() {
        let due = DueDate::parse("2024-01-10T18:05").unwrap();
        assert_eq!(due.to_string(), "Jan 10, 2024 6:05 PM");
        assert_eq!(due.time_label().as_deref(), Some("6:05 PM"));
    }

    #[test]
    fn draft_requires_title_and_due_date() {
        let missing_due = TaskDraft {
            title: "Call mom".to_string(),
            ..TaskDraft::default()
        };
        assert_eq!(
            missing_due.into_task(),
            Err(NoteValidationError::MissingDueDate)
        );

        let blank_title = TaskDraft::new("  ", "2024-01-10");
        assert_eq!(blank_title.into_task(), Err(NoteValidationError::EmptyTaskTitle));

        let task = TaskDraft::new(" Call mom ", "2024-01-10T18:00")
            .into_task()
            .unwrap();
        assert_eq!(task.title, "Call mom");
        assert!(!task.completed);
    }

    #[test]
    fn midnight_flag_is_normalized_on_every_entry_point() {
        let parsed = DueDate::parse("2024-01-10T00:00").unwrap();

        let from_json: DueDate =
            serde_json::from_str(r#"{"at":"2024-01-10T00:00:00","all_day":false}"#).unwrap();
        assert_eq!(from_json, parsed);
        assert!(from_json.is_all_day());

        let from_storage = DueDate::from_storage("2024-01-10T00:00:00", false).unwrap();
        assert_eq!(from_storage, parsed);

        let timed: DueDate =
            serde_json::from_str(r#"{"at":"2024-01-10T18:00:00","all_day":false}"#).unwrap();
        assert!(!timed.is_all_day());
    }

    #[test]
    fn storage_form_round_trips() {
        let due = DueDate::parse("2024-03-01T07:30").unwrap();
        let restored = DueDate::from_storage(&due.to_storage(), false).unwrap();
        assert_eq!(restored, due);
    }
}
