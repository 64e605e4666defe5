//! Printable HTML rendered through pulldown-cmark's event stream so note
//! text is escaped by the HTML writer.

use super::{heading_text, tags_line, task_line};
use crate::model::note::Note;
use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Tag, TagEnd};

const DOCUMENT_HEAD: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
<title>BrainPocket Notes</title>\n<style>\n\
body { font-family: sans-serif; margin: 2rem; }\n\
.note { margin-bottom: 1.5rem; break-inside: avoid; }\n\
.note h2 { margin: 0 0 0.5rem; }\n\
.note p { margin: 0.25rem 0; color: #444; }\n\
</style>\n</head>\n<body>\n";
const DOCUMENT_TAIL: &str = "</body>\n</html>\n";

/// Single-flow document with one `<section>` per note.
pub fn render_printable_html(notes: &[Note]) -> String {
    let mut out = String::from(DOCUMENT_HEAD);
    for note in notes {
        out.push_str("<section class=\"note\">\n");
        html::push_html(&mut out, note_events(note).into_iter());
        out.push_str("</section>\n");
    }
    out.push_str(DOCUMENT_TAIL);
    out
}

fn note_events(note: &Note) -> Vec<Event<'static>> {
    let mut events = vec![
        Event::Start(Tag::Heading {
            level: HeadingLevel::H2,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
        }),
        Event::Text(CowStr::from(heading_text(note))),
        Event::End(TagEnd::Heading(HeadingLevel::H2)),
    ];
    push_paragraph(&mut events, tags_line(note));
    if let Some(task) = task_line(note) {
        push_paragraph(&mut events, task);
    }
    events
}

fn push_paragraph(events: &mut Vec<Event<'static>>, text: String) {
    events.push(Event::Start(Tag::Paragraph));
    events.push(Event::Text(CowStr::from(text)));
    events.push(Event::End(TagEnd::Paragraph));
}
