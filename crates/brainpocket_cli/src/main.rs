//! BrainPocket command-line entry point.
//!
//! # Responsibility
//! - Wire configuration, logging and the SQLite repository to the core engine.
//! - Render engine output as plain text.

use brainpocket_core::calendar::local_now;
use brainpocket_core::db::open_db;
use brainpocket_core::{
    export_notes, init_logging, month_grid, parse_tag_input, shift_month, Board, CannedAssistant,
    CoreConfig, DayStatus, ExportFormat, Note, NoteDraft, NoteId, NoteOrigin, NoteService,
    NoteUpdate, SortField, SqliteNoteRepository, TaskChange, TaskDraft, TaskPriority, ViewMode,
    ViewState,
};
use chrono::{Datelike, NaiveDate};
use log::info;
use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_help();
        return Ok(());
    }
    let cmd = args.remove(0);
    if cmd == "help" {
        print_help();
        return Ok(());
    }
    if cmd == "suggest" {
        return suggest(args);
    }

    let config = CoreConfig::from_env()?;
    if let Some(dir) = &config.log_dir {
        init_logging(config.log_level, &absolute(dir)?.to_string_lossy())?;
    }
    let conn = open_db(&config.db_path)?;
    let service = NoteService::new(SqliteNoteRepository::new(&conn), config.owner_uid.clone())
        .with_search_options(config.search_options());
    info!("event=cli_command module=cli status=start command={cmd}");

    match cmd.as_str() {
        "add" => add(&service, args)?,
        "list" => list(&service, args)?,
        "tasks" => {
            args.push("--tasks".to_string());
            list(&service, args)?
        }
        "search" => search(&service, args)?,
        "tags" => {
            for tag in service.snapshot()?.all_tags() {
                println!("#{tag}");
            }
        }
        "calendar" => calendar(&service, args)?,
        "done" => set_completed(&service, args, true)?,
        "undone" => set_completed(&service, args, false)?,
        "delete" => delete(&service, args)?,
        "export" => export(&service, args)?,
        "ask" => ask(&service, args)?,
        other => {
            eprintln!("Unknown command: {other}");
            print_help();
        }
    }
    Ok(())
}

fn print_help() {
    println!(
        "\
BrainPocket CLI
Usage:
  brainpocket add \"text\" [--tags a,b] [--task TITLE --due DATE [--priority low|medium|high]]
                                  Add a note, optionally with a task
  brainpocket list [--tag T]... [--day YYYY-MM-DD] [--search Q]
                                  List notes (tag filter, calendar day, or fuzzy search)
  brainpocket tasks [--sort due|created|tags] [--desc]
                                  List task notes
  brainpocket search <query>      Fuzzy search note content
  brainpocket tags                List every tag in use
  brainpocket calendar [YYYY-MM] [--next|--prev]
                                  Month grid with task counts
  brainpocket done <id>           Mark a note's task complete (undone to reopen)
  brainpocket delete <id>         Delete a note and its task
  brainpocket suggest \"text\"      Suggest tags for draft text
  brainpocket export md|json|html [--out PATH]
                                  Export every note
  brainpocket ask \"question\"      Ask the assistant and store its reply
  brainpocket help                Show this message

Environment:
  BRAINPOCKET_UID                 Owner of the notes (default: local)
  BRAINPOCKET_DB                  SQLite file (default: brainpocket.sqlite3)
  BRAINPOCKET_LOG_LEVEL           trace|debug|info|warn|error
  BRAINPOCKET_LOG_DIR             Enable rolling log files in this directory
  BRAINPOCKET_SEARCH_THRESHOLD    Fuzzy match threshold in [0, 1] (default: 0.3)
"
    );
}

type Service<'conn> = NoteService<SqliteNoteRepository<'conn>>;

fn add(service: &Service<'_>, mut args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let tags = take_flag(&mut args, "--tags")
        .map(|raw| parse_tag_input(&raw))
        .unwrap_or_default();
    let task_title = take_flag(&mut args, "--task");
    let due = take_flag(&mut args, "--due");
    let priority = match take_flag(&mut args, "--priority") {
        Some(raw) => Some(TaskPriority::parse(&raw).ok_or(format!("unknown priority `{raw}`"))?),
        None => None,
    };

    let mut draft = NoteDraft::new(args.join(" ")).with_tags(tags);
    if let Some(title) = task_title {
        draft = draft.with_task(TaskDraft {
            title,
            due,
            description: None,
            priority,
        });
    }
    let note = service.create_note(draft)?;
    println!("Created {}", note.id);
    Ok(())
}

fn list(service: &Service<'_>, mut args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let board = service.snapshot()?;
    let mut state = ViewState::new(local_now().date());

    if take_switch(&mut args, "--tasks") {
        state.select_mode(ViewMode::Tasks);
    }
    while let Some(tag) = take_flag(&mut args, "--tag") {
        if state.mode == ViewMode::All {
            state.select_mode(ViewMode::Tags);
        }
        state.toggle_tag(&tag);
    }
    if let Some(day) = take_flag(&mut args, "--day") {
        state.select_mode(ViewMode::Calendar);
        state.select_day(parse_day(&day)?);
    }
    if let Some(raw) = take_flag(&mut args, "--sort") {
        let field = parse_sort_field(&raw)?;
        if state.sort.field != field {
            state.toggle_sort(field);
        }
    }
    if take_switch(&mut args, "--desc") {
        let field = state.sort.field;
        state.toggle_sort(field);
    }
    if let Some(query) = take_flag(&mut args, "--search") {
        state.set_search(query);
    }

    print_notes(&board.displayed(&state));
    Ok(())
}

fn search(service: &Service<'_>, args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let board = service.snapshot()?;
    let mut state = ViewState::new(local_now().date());
    state.set_search(args.join(" "));
    let displayed = board.displayed(&state);
    if displayed.is_empty() {
        println!("No matches.");
    }
    print_notes(&displayed);
    Ok(())
}

fn calendar(service: &Service<'_>, mut args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let board: Board = service.snapshot()?;
    let now = local_now();
    let mut anchor = match args.first().filter(|arg| !arg.starts_with("--")) {
        Some(month) => parse_day(&format!("{month}-01"))?,
        None => now.date(),
    };
    if take_switch(&mut args, "--next") {
        anchor = shift_month(anchor, 1);
    }
    if take_switch(&mut args, "--prev") {
        anchor = shift_month(anchor, -1);
    }

    println!("{}", anchor.format("%B %Y"));
    let buckets = board.day_buckets();
    for day in month_grid(&buckets, anchor, now.date(), now) {
        if day.task_count == 0 && !day.is_today {
            continue;
        }
        let marker = match day.status {
            DayStatus::Urgent => "!",
            DayStatus::HasTasks => "*",
            DayStatus::Empty => " ",
        };
        let today = if day.is_today { " (today)" } else { "" };
        println!(
            "{marker} {:>2} {} task(s){today}",
            day.date.day(),
            day.task_count
        );
        for note in buckets.get(day.date) {
            if let Some(task) = &note.task {
                let time = task.due.time_label().unwrap_or_else(|| "all day".to_string());
                println!("     {time:<8} {}", task.title);
            }
        }
    }
    Ok(())
}

fn set_completed(
    service: &Service<'_>,
    args: Vec<String>,
    completed: bool,
) -> Result<(), Box<dyn Error>> {
    let id = parse_id(args.first())?;
    let update = NoteUpdate {
        task: TaskChange::SetCompleted(completed),
        ..NoteUpdate::default()
    };
    match service.update_note(id, update)? {
        Some(note) if note.has_task() => println!("Updated {id}"),
        Some(_) => println!("Note {id} has no task"),
        None => println!("No note {id}"),
    }
    Ok(())
}

fn delete(service: &Service<'_>, args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let id = parse_id(args.first())?;
    if service.delete_note(id)? {
        println!("Deleted {id}");
    } else {
        println!("No note {id}");
    }
    Ok(())
}

fn export(service: &Service<'_>, mut args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let out = take_flag(&mut args, "--out").map(PathBuf::from);
    let raw = args.first().map(String::as_str).unwrap_or("md");
    let format = ExportFormat::parse(raw).ok_or(format!("unknown export format `{raw}`"))?;
    let document = export_notes(&service.list_notes()?, format)?;
    let path = out.unwrap_or_else(|| PathBuf::from(&document.filename));
    fs::write(&path, &document.bytes)?;
    println!("Wrote {} ({})", path.display(), document.mime_type);
    Ok(())
}

fn ask(service: &Service<'_>, args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let note = service.ask_assistant(&CannedAssistant::new(), &args.join(" "))?;
    println!("{}", note.content);
    Ok(())
}

fn suggest(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let board = Board::default();
    let tags: Vec<String> = board
        .suggest_tags(&args.join(" "), &[])
        .into_iter()
        .map(|tag| format!("#{tag}"))
        .collect();
    println!("{}", tags.join(" "));
    Ok(())
}

fn print_notes(notes: &[&Note]) {
    for note in notes {
        let who = match note.origin {
            NoteOrigin::User => "",
            NoteOrigin::Assistant => " [assistant]",
        };
        println!("{}{who}  {}", note.id, note.created_at.format("%Y-%m-%d %H:%M"));
        println!("  {}", preview_line(&note.content));
        if !note.tags.is_empty() {
            let tags: Vec<String> = note.tags.iter().map(|tag| format!("#{tag}")).collect();
            println!("  {}", tags.join(" "));
        }
        if let Some(task) = &note.task {
            let check = if task.completed { "x" } else { " " };
            println!("  [{check}] {} (due {})", task.title, task.due);
        }
    }
}

fn preview_line(content: &str) -> String {
    let first = content.lines().next().unwrap_or("");
    let mut preview: String = first.chars().take(80).collect();
    if first.chars().count() > 80 || content.lines().count() > 1 {
        preview.push_str("...");
    }
    preview
}

fn take_flag(args: &mut Vec<String>, name: &str) -> Option<String> {
    let index = args.iter().position(|arg| arg == name)?;
    if index + 1 >= args.len() {
        args.remove(index);
        return None;
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Some(value)
}

fn take_switch(args: &mut Vec<String>, name: &str) -> bool {
    match args.iter().position(|arg| arg == name) {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    }
}

fn parse_id(raw: Option<&String>) -> Result<NoteId, Box<dyn Error>> {
    let raw = raw.ok_or("missing note id")?;
    Ok(NoteId::parse_str(raw.trim())?)
}

fn parse_day(raw: &str) -> Result<NaiveDate, Box<dyn Error>> {
    Ok(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date `{raw}`: {err}"))?)
}

fn parse_sort_field(raw: &str) -> Result<SortField, Box<dyn Error>> {
    match raw.trim() {
        "due" => Ok(SortField::DueDate),
        "created" => Ok(SortField::CreatedAt),
        "tags" => Ok(SortField::Tags),
        other => Err(format!("unknown sort field `{other}`").into()),
    }
}

fn absolute(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
