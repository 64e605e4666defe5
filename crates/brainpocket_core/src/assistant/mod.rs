//! Assistant panel backends.
//!
//! # Responsibility
//! - Define the seam a hosted completion backend plugs into.
//! - Provide the canned-response backend used when none is configured.
//!
//! # Invariants
//! - Blank queries are rejected before reaching a backend.
//! - Replies are returned verbatim; persisting them is the service's job.

mod canned;

pub use canned::CannedAssistant;

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    EmptyQuery,
    /// Backend could not produce a reply.
    Unavailable(String),
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQuery => write!(f, "assistant query must not be empty"),
            Self::Unavailable(message) => write!(f, "assistant unavailable: {message}"),
        }
    }
}

impl Error for AssistantError {}

/// Produces a reply for a query, given the owner's note contents as context.
pub trait Assistant {
    fn respond(&self, query: &str, context: &[String]) -> Result<String, AssistantError>;
}
