//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record rendered by every view.
//! - Normalize tag input and validate note-level invariants.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `tags` holds lowercase, non-empty, unique entries.
//! - `updated_at >= created_at`.
//! - `task`, when present, carries a due date by construction.

use crate::model::task::Task;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned when a note is created.
pub type NoteId = Uuid;

/// Who authored a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteOrigin {
    #[default]
    User,
    Assistant,
}

impl NoteOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// Validation failures raised before anything reaches persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    NilId,
    EmptyContent,
    EmptyTaskTitle,
    MissingDueDate,
    InvalidDueDate(String),
    InvalidTag(String),
    DuplicateTag(String),
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "note id must not be nil"),
            Self::EmptyContent => write!(f, "note content must not be empty"),
            Self::EmptyTaskTitle => write!(f, "task title must not be empty"),
            Self::MissingDueDate => write!(f, "task requires a due date"),
            Self::InvalidDueDate(value) => write!(f, "invalid due date `{value}`"),
            Self::InvalidTag(value) => write!(f, "invalid tag `{value}`"),
            Self::DuplicateTag(value) => write!(f, "duplicate tag `{value}`"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// One user- or assistant-authored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub origin: NoteOrigin,
    pub task: Option<Task>,
}

impl Note {
    /// Creates a note with a generated id and both timestamps set to now.
    pub fn new(origin: NoteOrigin, content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), origin, content, now_millis())
    }

    /// Creates a note with a caller-provided id and creation time.
    pub fn with_id(
        id: NoteId,
        origin: NoteOrigin,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            tags: Vec::new(),
            created_at,
            updated_at: created_at,
            origin,
            task: None,
        }
    }

    /// Builder-style tag assignment; input is normalized.
    pub fn tagged<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }

    /// Records a mutation. `updated_at` never moves before `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.created_at);
    }

    /// Checks every note invariant.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.is_nil() {
            return Err(NoteValidationError::NilId);
        }
        if self.origin == NoteOrigin::User && self.content.trim().is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }

        let mut seen = HashSet::new();
        for tag in &self.tags {
            if tag.trim().is_empty() || tag.chars().any(char::is_uppercase) {
                return Err(NoteValidationError::InvalidTag(tag.clone()));
            }
            if !seen.insert(tag.to_lowercase()) {
                return Err(NoteValidationError::DuplicateTag(tag.clone()));
            }
        }

        if let Some(task) = &self.task {
            task.validate()?;
        }
        Ok(())
    }

    pub fn has_task(&self) -> bool {
        self.task.is_some()
    }

    /// True iff the note carries at least one of `tags`.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.tags.contains(tag))
    }

    /// Tags joined into a single comma-separated string.
    pub fn joined_tags(&self) -> String {
        self.tags.join(",")
    }
}

/// Current instant truncated to the millisecond storage precision.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Normalizes one tag: trims, strips one leading `#`, lowercases.
///
/// Returns `None` for blank input.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes, deduplicates and sorts tag values.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag.as_ref()) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

/// Parses comma-separated tag input (`"work, #Ideas,,"`).
pub fn parse_tag_input(input: &str) -> Vec<String> {
    normalize_tags(input.split(','))
}
