//! Note use-case service.
//!
//! # Responsibility
//! - Validate drafts before any persistence call.
//! - Provide create/update/delete/list entry points scoped to one owner.
//! - Persist assistant replies as assistant-origin notes.
//!
//! # Invariants
//! - Validation failures never reach the repository.
//! - Provider failures are surfaced unchanged; nothing is retried here.
//! - Update/delete of a missing id is a no-op success.
//! - Every mutation bumps `updated_at`.

use crate::assistant::{Assistant, AssistantError};
use crate::model::note::{normalize_tags, Note, NoteId, NoteOrigin, NoteValidationError};
use crate::model::task::TaskDraft;
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::search::fuzzy::SearchOptions;
use crate::view::board::Board;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error following the validation/provider split.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Rejected before persistence; show inline to the user.
    Validation(NoteValidationError),
    /// Assistant backend failed or rejected the query.
    Assistant(AssistantError),
    /// Persistence collaborator failure, surfaced as-is.
    Provider(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Assistant(err) => write!(f, "{err}"),
            Self::Provider(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Assistant(err) => Some(err),
            Self::Provider(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<AssistantError> for NoteServiceError {
    fn from(value: AssistantError) -> Self {
        Self::Assistant(value)
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Provider(other),
        }
    }
}

/// Input for a new user note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub content: String,
    /// Raw tag values; normalized on create.
    pub tags: Vec<String>,
    pub task: Option<TaskDraft>,
}

impl NoteDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_task(mut self, task: TaskDraft) -> Self {
        self.task = Some(task);
        self
    }
}

/// What to do with a note's task during an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskChange {
    #[default]
    Keep,
    /// Attach a new task or replace the existing one.
    Set(TaskDraft),
    /// Flip the completion flag of the existing task.
    SetCompleted(bool),
    Detach,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub task: TaskChange,
}

/// Owner-scoped note service over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
    owner_uid: String,
    search_options: SearchOptions,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R, owner_uid: impl Into<String>) -> Self {
        Self {
            repo,
            owner_uid: owner_uid.into(),
            search_options: SearchOptions::default(),
        }
    }

    /// Search tuning applied to boards built by `snapshot`.
    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.search_options = options;
        self
    }

    pub fn owner_uid(&self) -> &str {
        &self.owner_uid
    }

    /// Validates and persists a user note, returning the stored record.
    pub fn create_note(&self, draft: NoteDraft) -> Result<Note, NoteServiceError> {
        if draft.content.trim().is_empty() {
            return Err(NoteValidationError::EmptyContent.into());
        }
        let task = draft.task.map(TaskDraft::into_task).transpose()?;

        let mut note = Note::new(NoteOrigin::User, draft.content).tagged(&draft.tags);
        note.task = task;
        self.persist_new(note)
    }

    /// Persists an assistant reply as an assistant-origin note.
    pub fn record_assistant_reply(
        &self,
        content: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        self.persist_new(Note::new(NoteOrigin::Assistant, content))
    }

    /// Asks `assistant` with the owner's note contents as context and stores
    /// the reply.
    pub fn ask_assistant<A: Assistant>(
        &self,
        assistant: &A,
        query: &str,
    ) -> Result<Note, NoteServiceError> {
        if query.trim().is_empty() {
            return Err(AssistantError::EmptyQuery.into());
        }
        let context: Vec<String> = self
            .list_notes()?
            .into_iter()
            .map(|note| note.content)
            .collect();
        let reply = assistant.respond(query, &context)?;
        self.record_assistant_reply(reply)
    }

    /// Applies a partial update.
    ///
    /// Returns `Ok(None)` when the note does not exist.
    pub fn update_note(
        &self,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<Option<Note>, NoteServiceError> {
        let Some(mut note) = self.repo.get_note(&self.owner_uid, id)? else {
            warn!("event=note_update module=service status=skipped reason=not_found");
            return Ok(None);
        };

        let edits_fields = update.content.is_some() || update.tags.is_some();
        if let Some(content) = update.content {
            if content.trim().is_empty() {
                return Err(NoteValidationError::EmptyContent.into());
            }
            note.content = content;
        }
        if let Some(tags) = update.tags {
            note.tags = normalize_tags(&tags);
        }
        match update.task {
            TaskChange::Keep => {}
            TaskChange::Set(draft) => note.task = Some(draft.into_task()?),
            TaskChange::SetCompleted(completed) => match note.task.as_mut() {
                Some(task) => task.completed = completed,
                None if !edits_fields => {
                    warn!("event=note_update module=service status=skipped reason=no_task");
                    return Ok(Some(note));
                }
                None => {}
            },
            TaskChange::Detach => note.task = None,
        }
        note.touch();

        match self.repo.update_note(&self.owner_uid, &note) {
            Ok(()) => {}
            Err(RepoError::NotFound(_)) => {
                warn!("event=note_update module=service status=skipped reason=deleted_concurrently");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        }
        info!("event=note_update module=service status=ok");

        self.repo
            .get_note(&self.owner_uid, id)?
            .map(Some)
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    /// Replaces the note's full tag set.
    pub fn set_tags(&self, id: NoteId, tags: Vec<String>) -> Result<Option<Note>, NoteServiceError> {
        self.update_note(
            id,
            NoteUpdate {
                tags: Some(tags),
                ..NoteUpdate::default()
            },
        )
    }

    /// Deletes a note and its task. Returns whether anything was removed.
    pub fn delete_note(&self, id: NoteId) -> Result<bool, NoteServiceError> {
        match self.repo.delete_note(&self.owner_uid, id) {
            Ok(()) => {
                info!("event=note_delete module=service status=ok");
                Ok(true)
            }
            Err(RepoError::NotFound(_)) => {
                warn!("event=note_delete module=service status=skipped reason=not_found");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        Ok(self.repo.get_note(&self.owner_uid, id)?)
    }

    /// Every note of the owner, oldest first.
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes(&self.owner_uid)?)
    }

    /// Fresh board built from the current persisted collection.
    pub fn snapshot(&self) -> Result<Board, NoteServiceError> {
        Ok(Board::with_search_options(
            self.list_notes()?,
            self.search_options,
        ))
    }

    fn persist_new(&self, note: Note) -> Result<Note, NoteServiceError> {
        let id = self.repo.create_note(&self.owner_uid, &note)?;
        info!(
            "event=note_create module=service status=ok origin={} has_task={}",
            note.origin.as_str(),
            note.has_task()
        );
        self.repo
            .get_note(&self.owner_uid, id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }
}
