use brainpocket_core::{
    derive_view, Board, DayBuckets, DueDate, Note, NoteOrigin, SearchIndex, SearchOutcome,
    SortDirection, SortField, Task, ViewMode, ViewState,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").unwrap()
}

fn created(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + seconds, 0).unwrap()
}

fn note(content: &str, tags: &[&str], seconds: i64) -> Note {
    Note::with_id(Uuid::new_v4(), NoteOrigin::User, content, created(seconds)).tagged(tags)
}

fn task_note(content: &str, tags: &[&str], due: &str, seconds: i64) -> Note {
    note(content, tags, seconds).with_task(Task::new(content, DueDate::parse(due).unwrap()))
}

fn contents(notes: &[&Note]) -> Vec<String> {
    notes.iter().map(|note| note.content.clone()).collect()
}

fn collection() -> Vec<Note> {
    vec![
        task_note("Buy milk", &["errand"], "2024-01-10T00:00", 0),
        task_note("Call mom", &[], "2024-01-10T18:00", 1),
        note("Sprint planning meeting", &["work"], 2),
        task_note("Read chapter", &["reading", "work"], "2024-01-12", 3),
        note("Shopping list", &["errand", "home"], 4),
    ]
}

#[test]
fn bucket_example_keeps_both_notes_in_collection_order() {
    let notes = collection();
    let buckets = DayBuckets::build(&notes);

    let jan_10: Vec<String> = buckets
        .get(day(2024, 1, 10))
        .iter()
        .map(|note| note.content.clone())
        .collect();
    assert_eq!(jan_10, vec!["Buy milk".to_string(), "Call mom".to_string()]);

    assert_eq!(buckets.urgent_count(day(2024, 1, 10), at("2024-01-10T12:00")), 1);
    assert_eq!(buckets.urgent_count(day(2024, 1, 10), at("2024-01-11T12:00")), 0);
}

#[test]
fn buckets_partition_exactly_the_task_notes() {
    let notes = collection();
    let buckets = DayBuckets::build(&notes);

    let mut bucketed: Vec<Uuid> = buckets
        .iter()
        .flat_map(|(_, notes)| notes.iter().map(|note| note.id))
        .collect();
    let total = bucketed.len();
    bucketed.sort();
    bucketed.dedup();
    assert_eq!(bucketed.len(), total, "a note appeared in two buckets");

    let mut expected: Vec<Uuid> = notes
        .iter()
        .filter(|note| note.has_task())
        .map(|note| note.id)
        .collect();
    expected.sort();
    assert_eq!(bucketed, expected);
}

#[test]
fn default_state_shows_full_collection_unmodified() {
    let notes = collection();
    let state = ViewState::new(day(2024, 1, 10));

    let displayed = derive_view(&notes, &state, &SearchOutcome::Inactive);
    let expected: Vec<&Note> = notes.iter().collect();
    assert_eq!(displayed, expected);
}

#[test]
fn selected_tags_are_ored_and_keep_order() {
    let notes = collection();
    let mut state = ViewState::new(day(2024, 1, 10));
    state.select_mode(ViewMode::Tags);
    state.toggle_tag("home");
    state.toggle_tag("reading");

    let displayed = derive_view(&notes, &state, &SearchOutcome::Inactive);
    assert_eq!(
        contents(&displayed),
        vec!["Read chapter".to_string(), "Shopping list".to_string()]
    );

    state.toggle_tag("reading");
    let displayed = derive_view(&notes, &state, &SearchOutcome::Inactive);
    assert_eq!(contents(&displayed), vec!["Shopping list".to_string()]);
}

#[test]
fn search_hits_override_tag_selection() {
    let notes = collection();
    let index = SearchIndex::build(&notes);
    let mut state = ViewState::new(day(2024, 1, 10));
    state.select_mode(ViewMode::Tags);
    state.toggle_tag("work");

    let search = index.search("milk");
    let displayed = derive_view(&notes, &state, &search);
    assert_eq!(contents(&displayed), vec!["Buy milk".to_string()]);
}

#[test]
fn active_search_without_matches_shows_nothing() {
    let notes = collection();
    let board = Board::new(notes);
    let mut state = ViewState::new(day(2024, 1, 10));
    state.set_search("zzqqxx");

    assert_eq!(board.search("zzqqxx"), SearchOutcome::NoMatches);
    assert!(board.displayed(&state).is_empty());
}

#[test]
fn calendar_view_shows_selected_day_bucket() {
    let notes = collection();
    let mut state = ViewState::new(day(2024, 1, 12));
    state.select_mode(ViewMode::Calendar);
    state.toggle_tag("errand");

    let displayed = derive_view(&notes, &state, &SearchOutcome::Inactive);
    assert_eq!(contents(&displayed), vec!["Read chapter".to_string()]);

    state.select_day(day(2024, 1, 11));
    assert!(derive_view(&notes, &state, &SearchOutcome::Inactive).is_empty());
}

#[test]
fn selecting_all_clears_tag_selection() {
    let mut state = ViewState::new(day(2024, 1, 10));
    state.select_mode(ViewMode::Tags);
    state.toggle_tag("#Work");
    assert_eq!(state.selected_tags, vec!["work".to_string()]);

    state.select_mode(ViewMode::All);
    assert!(state.selected_tags.is_empty());
}

#[test]
fn tasks_view_sorts_and_reverses_by_due_date() {
    let notes = vec![
        task_note("third", &[], "2024-03-01T09:00", 0),
        task_note("first", &[], "2024-01-01T09:00", 1),
        note("no task", &[], 2),
        task_note("second", &[], "2024-02-01", 3),
    ];
    let mut state = ViewState::new(day(2024, 1, 1));
    state.select_mode(ViewMode::Tasks);

    let ascending = contents(&derive_view(&notes, &state, &SearchOutcome::Inactive));
    assert_eq!(ascending, vec!["first", "second", "third"]);

    state.toggle_sort(SortField::DueDate);
    assert_eq!(state.sort.direction, SortDirection::Descending);
    let mut descending = contents(&derive_view(&notes, &state, &SearchOutcome::Inactive));
    descending.reverse();
    assert_eq!(descending, ascending);
}

#[test]
fn new_sort_field_resets_to_ascending() {
    let mut state = ViewState::new(day(2024, 1, 1));
    state.toggle_sort(SortField::DueDate);
    assert_eq!(state.sort.direction, SortDirection::Descending);

    state.toggle_sort(SortField::CreatedAt);
    assert_eq!(state.sort.field, SortField::CreatedAt);
    assert_eq!(state.sort.direction, SortDirection::Ascending);
}

#[test]
fn tag_sort_compares_joined_strings_and_keeps_ties_stable() {
    let notes = vec![
        task_note("b-only", &["b"], "2024-01-01", 0),
        task_note("a-then-z", &["a", "z"], "2024-01-02", 1),
        task_note("a-alone", &["a"], "2024-01-03", 2),
        task_note("b-again", &["b"], "2024-01-04", 3),
    ];
    let mut state = ViewState::new(day(2024, 1, 1));
    state.select_mode(ViewMode::Tasks);
    state.toggle_sort(SortField::Tags);

    let ascending = contents(&derive_view(&notes, &state, &SearchOutcome::Inactive));
    assert_eq!(ascending, vec!["a-alone", "a-then-z", "b-only", "b-again"]);

    state.toggle_sort(SortField::Tags);
    let descending = contents(&derive_view(&notes, &state, &SearchOutcome::Inactive));
    assert_eq!(descending, vec!["b-only", "b-again", "a-then-z", "a-alone"]);
}

#[test]
fn replacing_the_snapshot_rebuilds_search() {
    let mut board = Board::new(vec![note("old content", &[], 0)]);
    assert!(board.search("old").is_active());
    assert!(!board.search("old").hits().is_empty());

    board.replace_snapshot(vec![note("fresh content", &[], 1)]);
    assert_eq!(board.search("old"), SearchOutcome::NoMatches);
    assert_eq!(board.search("fresh").hits().len(), 1);
}
