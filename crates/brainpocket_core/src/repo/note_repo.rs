//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped note CRUD for the persistence collaborator seam.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every query is constrained to one `owner_uid`.
//! - Writes call `Note::validate()` before SQL mutations.
//! - Reads reject invalid persisted state instead of masking it.
//! - Task columns live on the note row; tag rows cascade on delete.
//! - Lists are ordered by `created_at ASC, uuid ASC`.

use crate::db::DbError;
use crate::model::note::{Note, NoteId, NoteOrigin, NoteValidationError};
use crate::model::task::{DueDate, Task, TaskPriority};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row, Transaction};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    origin,
    content,
    created_at,
    updated_at,
    task_title,
    task_due_at,
    task_all_day,
    task_description,
    task_priority,
    task_completed
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer failure surfaced to callers as-is.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Owner-scoped note persistence.
pub trait NoteRepository {
    /// All notes owned by `owner`, oldest first.
    fn list_notes(&self, owner: &str) -> RepoResult<Vec<Note>>;
    fn get_note(&self, owner: &str, id: NoteId) -> RepoResult<Option<Note>>;
    /// Inserts `note` and returns its id.
    fn create_note(&self, owner: &str, note: &Note) -> RepoResult<NoteId>;
    /// Replaces every mutable field. `RepoError::NotFound` if absent.
    fn update_note(&self, owner: &str, note: &Note) -> RepoResult<()>;
    /// Deletes the note and its task and tags. `RepoError::NotFound` if absent.
    fn delete_note(&self, owner: &str, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn list_notes(&self, owner: &str) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner_uid = ?1
             ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([owner])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        let mut tags = load_owner_tags(self.conn, owner)?;
        for note in &mut notes {
            note.tags = tags.remove(&note.id.to_string()).unwrap_or_default();
            note.validate()?;
        }
        Ok(notes)
    }

    fn get_note(&self, owner: &str, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner_uid = ?1
               AND uuid = ?2;"
        ))?;
        let mut rows = stmt.query(params![owner, id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut note = parse_note_row(row)?;
        note.tags = load_note_tags(self.conn, &note.id.to_string())?;
        note.validate()?;
        Ok(Some(note))
    }

    fn create_note(&self, owner: &str, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;
        let task = TaskColumns::from_note(note);

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO notes (
                uuid,
                owner_uid,
                origin,
                content,
                created_at,
                updated_at,
                task_title,
                task_due_at,
                task_all_day,
                task_description,
                task_priority,
                task_completed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                note.id.to_string(),
                owner,
                note.origin.as_str(),
                note.content.as_str(),
                note.created_at.timestamp_millis(),
                note.updated_at.timestamp_millis(),
                task.title,
                task.due_at,
                bool_to_int(task.all_day),
                task.description,
                task.priority,
                bool_to_int(task.completed),
            ],
        )?;
        replace_tags(&tx, note)?;
        tx.commit()?;

        Ok(note.id)
    }

    fn update_note(&self, owner: &str, note: &Note) -> RepoResult<()> {
        note.validate()?;
        let task = TaskColumns::from_note(note);

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                content = ?3,
                updated_at = ?4,
                task_title = ?5,
                task_due_at = ?6,
                task_all_day = ?7,
                task_description = ?8,
                task_priority = ?9,
                task_completed = ?10
             WHERE uuid = ?1
               AND owner_uid = ?2;",
            params![
                note.id.to_string(),
                owner,
                note.content.as_str(),
                note.updated_at.timestamp_millis(),
                task.title,
                task.due_at,
                bool_to_int(task.all_day),
                task.description,
                task.priority,
                bool_to_int(task.completed),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        replace_tags(&tx, note)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_note(&self, owner: &str, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE uuid = ?1 AND owner_uid = ?2;",
            params![id.to_string(), owner],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Flattened task fields as stored on the note row.
struct TaskColumns<'a> {
    title: Option<&'a str>,
    due_at: Option<String>,
    all_day: bool,
    description: Option<&'a str>,
    priority: Option<&'static str>,
    completed: bool,
}

impl<'a> TaskColumns<'a> {
    fn from_note(note: &'a Note) -> Self {
        match &note.task {
            Some(task) => Self {
                title: Some(task.title.as_str()),
                due_at: Some(task.due.to_storage()),
                all_day: task.due.is_all_day(),
                description: task.description.as_deref(),
                priority: task.priority.map(TaskPriority::as_str),
                completed: task.completed,
            },
            None => Self {
                title: None,
                due_at: None,
                all_day: false,
                description: None,
                priority: None,
                completed: false,
            },
        }
    }
}

fn replace_tags(tx: &Transaction<'_>, note: &Note) -> RepoResult<()> {
    let uuid = note.id.to_string();
    tx.execute("DELETE FROM note_tags WHERE note_uuid = ?1;", [uuid.as_str()])?;
    for tag in &note.tags {
        tx.execute(
            "INSERT INTO note_tags (note_uuid, tag) VALUES (?1, ?2);",
            params![uuid.as_str(), tag.as_str()],
        )?;
    }
    Ok(())
}

fn load_note_tags(conn: &Connection, note_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT tag FROM note_tags WHERE note_uuid = ?1 ORDER BY tag ASC;")?;
    let mut rows = stmt.query([note_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn load_owner_tags(conn: &Connection, owner: &str) -> RepoResult<HashMap<String, Vec<String>>> {
    let mut stmt = conn.prepare(
        "SELECT nt.note_uuid, nt.tag
         FROM note_tags nt
         INNER JOIN notes n ON n.uuid = nt.note_uuid
         WHERE n.owner_uid = ?1
         ORDER BY nt.note_uuid ASC, nt.tag ASC;",
    )?;
    let mut rows = stmt.query([owner])?;
    let mut tags: HashMap<String, Vec<String>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let note_uuid: String = row.get(0)?;
        tags.entry(note_uuid).or_default().push(row.get(1)?);
    }
    Ok(tags)
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let origin_text: String = row.get("origin")?;
    let origin = NoteOrigin::parse(&origin_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid origin `{origin_text}` in notes.origin"))
    })?;

    let task = match row.get::<_, Option<String>>("task_title")? {
        Some(title) => Some(parse_task_columns(row, title)?),
        None => None,
    };

    Ok(Note {
        id,
        content: row.get("content")?,
        tags: Vec::new(),
        created_at: parse_millis(row.get("created_at")?, "created_at")?,
        updated_at: parse_millis(row.get("updated_at")?, "updated_at")?,
        origin,
        task,
    })
}

fn parse_task_columns(row: &Row<'_>, title: String) -> RepoResult<Task> {
    let due_text: Option<String> = row.get("task_due_at")?;
    let due_text = due_text.ok_or_else(|| {
        RepoError::InvalidData("task without notes.task_due_at".to_string())
    })?;
    let all_day = int_to_bool(row.get("task_all_day")?, "task_all_day")?;
    let due = DueDate::from_storage(&due_text, all_day).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid due date `{due_text}` in notes.task_due_at"))
    })?;

    let priority = match row.get::<_, Option<String>>("task_priority")? {
        Some(value) => Some(TaskPriority::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid priority `{value}` in notes.task_priority"))
        })?),
        None => None,
    };

    Ok(Task {
        title,
        due,
        description: row.get("task_description")?,
        priority,
        completed: int_to_bool(row.get("task_completed")?, "task_completed")?,
    })
}

fn parse_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in notes.{column}"))
    })
}

fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in notes.{column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
