//! Export serializers for the note collection.
//!
//! # Responsibility
//! - Render a snapshot as Markdown, JSON or printable HTML.
//! - Package output with a filename and MIME type for delivery.
//!
//! # Invariants
//! - Every format renders notes in collection order.
//! - An empty collection produces an empty but valid document.

mod html;
mod json;
mod markdown;

pub use html::render_printable_html;
pub use json::{import_json, render_json};
pub use markdown::render_markdown;

use crate::model::note::{Note, NoteValidationError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EXPORT_BASENAME: &str = "brainpocket-notes";

/// Failures while encoding or decoding exported documents.
#[derive(Debug)]
pub enum ExportError {
    Json(serde_json::Error),
    /// An imported note broke a model invariant.
    InvalidNote {
        index: usize,
        source: NoteValidationError,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "json export failed: {err}"),
            Self::InvalidNote { index, source } => {
                write!(f, "imported note #{index} is invalid: {source}")
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidNote { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
    /// HTML meant for PDF capture; pagination is left to the renderer.
    PrintableHtml,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::PrintableHtml => "html",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::Json => "application/json",
            Self::PrintableHtml => "text/html",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            "html" | "pdf" => Some(Self::PrintableHtml),
            _ => None,
        }
    }
}

/// Rendered export ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Renders `notes` in `format`.
///
/// # Errors
/// - Returns `ExportError::Json` only if JSON encoding fails, which does not
///   happen for well-formed notes.
pub fn export_notes(notes: &[Note], format: ExportFormat) -> Result<ExportDocument, ExportError> {
    let body = match format {
        ExportFormat::Markdown => render_markdown(notes),
        ExportFormat::Json => render_json(notes)?,
        ExportFormat::PrintableHtml => render_printable_html(notes),
    };

    info!(
        "event=export module=export status=ok format={} notes={} bytes={}",
        format.extension(),
        notes.len(),
        body.len()
    );

    Ok(ExportDocument {
        filename: format!("{EXPORT_BASENAME}.{}", format.extension()),
        mime_type: format.mime_type(),
        bytes: body.into_bytes(),
    })
}

/// Heading text for a note: content with line breaks folded into spaces.
fn heading_text(note: &Note) -> String {
    note.content.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tags_line(note: &Note) -> String {
    if note.tags.is_empty() {
        "Tags:".to_string()
    } else {
        format!("Tags: {}", note.tags.join(", "))
    }
}

fn task_line(note: &Note) -> Option<String> {
    note.task
        .as_ref()
        .map(|task| format!("Task: {} (due {})", task.title, task.due))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_metadata_matches_format() {
        let doc = export_notes(&[], ExportFormat::Json).unwrap();
        assert_eq!(doc.filename, "brainpocket-notes.json");
        assert_eq!(doc.mime_type, "application/json");

        let doc = export_notes(&[], ExportFormat::PrintableHtml).unwrap();
        assert_eq!(doc.filename, "brainpocket-notes.html");
        assert_eq!(doc.mime_type, "text/html");
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(ExportFormat::parse("MD"), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::parse("pdf"), Some(ExportFormat::PrintableHtml));
        assert_eq!(ExportFormat::parse("docx"), None);
    }
}
