//! Domain model for notes and their attached tasks.
//!
//! # Responsibility
//! - Define the canonical note/task shapes shared by every projection.
//! - Own tag normalization and note-level invariant checks.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - A task never exists without its owning note and always has a due date.

pub mod note;
pub mod task;
