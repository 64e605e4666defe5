use brainpocket_core::db::open_db_in_memory;
use brainpocket_core::{
    Assistant, AssistantError, CannedAssistant, NoteDraft, NoteOrigin, NoteService,
    NoteServiceError, NoteUpdate, NoteValidationError, SqliteNoteRepository, TaskChange, TaskDraft,
    ViewMode, ViewState,
};
use chrono::NaiveDate;
use std::cell::RefCell;
use uuid::Uuid;

#[test]
fn create_note_normalizes_tags_and_sets_equal_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");

    let created = service
        .create_note(NoteDraft::new("Sprint planning").with_tags([" #Work", "work", "Ideas "]))
        .unwrap();

    assert_eq!(created.origin, NoteOrigin::User);
    assert_eq!(created.tags, vec!["ideas".to_string(), "work".to_string()]);
    assert_eq!(created.created_at, created.updated_at);
    assert!(created.task.is_none());
}

#[test]
fn validation_errors_never_reach_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");

    let blank = service.create_note(NoteDraft::new("   "));
    assert!(matches!(
        blank,
        Err(NoteServiceError::Validation(NoteValidationError::EmptyContent))
    ));

    let missing_due = service.create_note(NoteDraft::new("call").with_task(TaskDraft {
        title: "Call mom".to_string(),
        ..TaskDraft::default()
    }));
    assert!(matches!(
        missing_due,
        Err(NoteServiceError::Validation(NoteValidationError::MissingDueDate))
    ));

    let untitled =
        service.create_note(NoteDraft::new("call").with_task(TaskDraft::new(" ", "2024-01-10")));
    assert!(matches!(
        untitled,
        Err(NoteServiceError::Validation(NoteValidationError::EmptyTaskTitle))
    ));

    assert!(service.list_notes().unwrap().is_empty());
}

#[test]
fn create_drops_blank_tags_like_update_does() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");

    let created = service
        .create_note(NoteDraft::new("hello").with_tags(["work", "  ", "", "#", "##x"]))
        .unwrap();
    assert_eq!(created.tags, vec!["#x".to_string(), "work".to_string()]);

    let updated = service
        .set_tags(created.id, vec!["work".to_string(), " ".to_string(), "#".to_string()])
        .unwrap()
        .unwrap();
    assert_eq!(updated.tags, vec!["work".to_string()]);
}

#[test]
fn completing_a_note_without_task_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");
    let created = service.create_note(NoteDraft::new("plain")).unwrap();

    let unchanged = service
        .update_note(
            created.id,
            NoteUpdate {
                task: TaskChange::SetCompleted(true),
                ..NoteUpdate::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, created);
    assert_eq!(
        service.get_note(created.id).unwrap().unwrap().updated_at,
        created.updated_at
    );
}

#[test]
fn update_changes_fields_and_bumps_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");
    let created = service.create_note(NoteDraft::new("first")).unwrap();

    let updated = service
        .update_note(
            created.id,
            NoteUpdate {
                content: Some("second".to_string()),
                tags: Some(vec!["Home".to_string()]),
                task: TaskChange::Set(TaskDraft::new("Water plants", "2024-05-01T09:30")),
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.content, "second");
    assert_eq!(updated.tags, vec!["home".to_string()]);
    assert!(updated.updated_at >= created.updated_at);
    let task = updated.task.unwrap();
    assert_eq!(task.title, "Water plants");
    assert!(!task.completed);
}

#[test]
fn task_completion_and_detach() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");
    let created = service
        .create_note(NoteDraft::new("milk").with_task(TaskDraft::new("Buy milk", "2024-01-10")))
        .unwrap();

    let completed = service
        .update_note(
            created.id,
            NoteUpdate {
                task: TaskChange::SetCompleted(true),
                ..NoteUpdate::default()
            },
        )
        .unwrap()
        .unwrap();
    assert!(completed.task.unwrap().completed);

    let detached = service
        .update_note(
            created.id,
            NoteUpdate {
                task: TaskChange::Detach,
                ..NoteUpdate::default()
            },
        )
        .unwrap()
        .unwrap();
    assert!(detached.task.is_none());
    assert_eq!(detached.content, "milk");
}

#[test]
fn missing_ids_are_no_op_successes() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");

    let missing = Uuid::new_v4();
    assert!(service
        .update_note(missing, NoteUpdate::default())
        .unwrap()
        .is_none());
    assert!(!service.delete_note(missing).unwrap());
}

#[test]
fn delete_removes_note_once() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");
    let created = service.create_note(NoteDraft::new("temp")).unwrap();

    assert!(service.delete_note(created.id).unwrap());
    assert!(!service.delete_note(created.id).unwrap());
    assert!(service.get_note(created.id).unwrap().is_none());
}

#[test]
fn owners_do_not_see_each_other() {
    let conn = open_db_in_memory().unwrap();
    let alice = NoteService::new(SqliteNoteRepository::new(&conn), "alice");
    let bob = NoteService::new(SqliteNoteRepository::new(&conn), "bob");

    let note = alice.create_note(NoteDraft::new("private")).unwrap();
    assert!(bob.list_notes().unwrap().is_empty());
    assert!(!bob.delete_note(note.id).unwrap());
    assert_eq!(alice.list_notes().unwrap().len(), 1);
}

#[test]
fn ask_assistant_stores_reply_as_assistant_note() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");
    service.create_note(NoteDraft::new("context note")).unwrap();

    let reply = service
        .ask_assistant(&CannedAssistant::new(), "what next?")
        .unwrap();
    assert_eq!(reply.origin, NoteOrigin::Assistant);
    assert!(reply.content.contains("simulated assistant response"));
    assert_eq!(service.list_notes().unwrap().len(), 2);

    let empty = service.ask_assistant(&CannedAssistant::new(), "  ");
    assert!(matches!(
        empty,
        Err(NoteServiceError::Assistant(AssistantError::EmptyQuery))
    ));
}

struct RecordingAssistant {
    seen: RefCell<Vec<String>>,
}

impl Assistant for RecordingAssistant {
    fn respond(&self, _query: &str, context: &[String]) -> Result<String, AssistantError> {
        self.seen.borrow_mut().extend(context.iter().cloned());
        Err(AssistantError::Unavailable("offline".to_string()))
    }
}

#[test]
fn assistant_receives_owner_context_and_failures_store_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");
    service.create_note(NoteDraft::new("one")).unwrap();
    service.create_note(NoteDraft::new("two")).unwrap();

    let assistant = RecordingAssistant {
        seen: RefCell::new(Vec::new()),
    };
    let result = service.ask_assistant(&assistant, "summarize");

    assert!(matches!(
        result,
        Err(NoteServiceError::Assistant(AssistantError::Unavailable(_)))
    ));
    let mut seen = assistant.seen.borrow().clone();
    seen.sort();
    assert_eq!(seen, vec!["one".to_string(), "two".to_string()]);
    assert_eq!(service.list_notes().unwrap().len(), 2);
}

#[test]
fn snapshot_feeds_the_board() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), "local");
    service
        .create_note(NoteDraft::new("Buy milk").with_task(TaskDraft::new("Buy milk", "2024-01-10")))
        .unwrap();
    service
        .create_note(NoteDraft::new("Read a book").with_tags(["reading"]))
        .unwrap();

    let board = service.snapshot().unwrap();
    assert_eq!(board.notes().len(), 2);
    assert_eq!(board.all_tags(), vec!["reading".to_string()]);

    let mut state = ViewState::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    state.select_mode(ViewMode::Tasks);
    let tasks = board.displayed(&state);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].content, "Buy milk");
}
