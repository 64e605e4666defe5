use super::ExportError;
use crate::model::note::Note;

/// Pretty-printed lossless dump of every note field.
pub fn render_json(notes: &[Note]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(notes)?)
}

/// Parses a JSON export and validates each note.
pub fn import_json(bytes: &[u8]) -> Result<Vec<Note>, ExportError> {
    let notes: Vec<Note> = serde_json::from_slice(bytes)?;
    for (index, note) in notes.iter().enumerate() {
        note.validate()
            .map_err(|source| ExportError::InvalidNote { index, source })?;
    }
    Ok(notes)
}
