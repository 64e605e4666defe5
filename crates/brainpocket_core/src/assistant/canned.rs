use super::{Assistant, AssistantError};
use std::sync::atomic::{AtomicUsize, Ordering};

const CANNED_RESPONSES: &[&str] = &[
    "That's an interesting thought. Have you considered...",
    "Based on your note, you might want to explore...",
    "I can help you develop this idea further...",
    "Here's a different perspective on this...",
];
const SIMULATED_NOTICE: &str = "This is a simulated assistant response.";

/// Rotates through a fixed list of replies.
#[derive(Debug, Default)]
pub struct CannedAssistant {
    next: AtomicUsize,
}

impl CannedAssistant {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Assistant for CannedAssistant {
    fn respond(&self, query: &str, _context: &[String]) -> Result<String, AssistantError> {
        if query.trim().is_empty() {
            return Err(AssistantError::EmptyQuery);
        }
        let slot = self.next.fetch_add(1, Ordering::Relaxed) % CANNED_RESPONSES.len();
        Ok(format!("{}\n\n{SIMULATED_NOTICE}", CANNED_RESPONSES[slot]))
    }
}
