use super::{heading_text, tags_line, task_line};
use crate::model::note::Note;

const SECTION_SEPARATOR: &str = "\n---\n\n";

/// One `##` section per note, separated by horizontal rules.
pub fn render_markdown(notes: &[Note]) -> String {
    notes
        .iter()
        .map(render_section)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

fn render_section(note: &Note) -> String {
    let mut section = format!("## {}\n\n{}\n", heading_text(note), tags_line(note));
    if let Some(task) = task_line(note) {
        section.push_str(&task);
        section.push('\n');
    }
    section
}

#[cfg(test)]
mod tests {
    use super::render_markdown;
    use crate::model::note::{Note, NoteOrigin};
    use crate::model::task::{DueDate, Task};

    #[test]
    fn renders_sections_with_rule_between() {
        let notes = vec![
            Note::new(NoteOrigin::User, "Buy milk")
                .tagged(["errand"])
                .with_task(Task::new("Buy milk", DueDate::parse("2024-01-10").unwrap())),
            Note::new(NoteOrigin::User, "Call\nmom"),
        ];

        assert_eq!(
            render_markdown(&notes),
            "## Buy milk\n\nTags: errand\nTask: Buy milk (due Jan 10, 2024)\n\
             \n---\n\n\
             ## Call mom\n\nTags:\n"
        );
    }

    #[test]
    fn empty_collection_is_empty_document() {
        assert_eq!(render_markdown(&[]), "");
    }
}
