//! Repository layer: the persistence collaborator seam.
//!
//! # Responsibility
//! - Define owner-scoped note persistence contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Note::validate()` before persistence.
//! - Missing ids surface as `RepoError::NotFound`, distinct from transport
//!   errors.

pub mod note_repo;
