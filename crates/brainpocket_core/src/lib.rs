//! Core domain logic for BrainPocket.
//! This crate is the single source of truth for note invariants and for the
//! organization engine that turns a note collection into the displayed views.

pub mod assistant;
pub mod calendar;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod tags;
pub mod view;

pub use assistant::{Assistant, AssistantError, CannedAssistant};
pub use calendar::bucket::{DayBuckets, DayStatus};
pub use calendar::month::{month_days, month_grid, shift_month, CalendarDay};
pub use config::{ConfigError, CoreConfig};
pub use export::{export_notes, import_json, ExportDocument, ExportError, ExportFormat};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{parse_tag_input, Note, NoteId, NoteOrigin, NoteValidationError};
pub use model::task::{DueDate, Task, TaskDraft, TaskPriority};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use search::fuzzy::{SearchHit, SearchIndex, SearchOptions, SearchOutcome};
pub use service::note_service::{NoteDraft, NoteService, NoteServiceError, NoteUpdate, TaskChange};
pub use tags::all_tags;
pub use tags::suggest::suggest_tags;
pub use view::board::Board;
pub use view::pipeline::{derive_view, SortDirection, SortField, SortOrder, ViewMode, ViewState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
