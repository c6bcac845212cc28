//! Clinical-note keyword screen.
//!
//! A case-insensitive substring match against a short list of concern terms.
//! This is a flag for the clinician, not a text-risk model.

use serde::{Deserialize, Serialize};

const CONCERN_KEYWORDS: [&str; 3] = ["suicidal", "self-harm", "hopeless"];

/// Result of screening one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFinding {
    pub elevated_concern: bool,
    /// Keywords found, in list order
    pub matched_keywords: Vec<String>,
}

impl NoteFinding {
    /// One-line summary for the dashboard.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.elevated_concern {
            "Clinical note analyzed for risk indicators - Elevated concern detected".to_string()
        } else {
            "Clinical note analyzed for risk indicators".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoteScreen;

impl NoteScreen {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Screen a note. Blank notes yield `None`.
    #[must_use]
    pub fn screen(&self, note: &str) -> Option<NoteFinding> {
        if note.trim().is_empty() {
            return None;
        }
        let lowered = note.to_lowercase();
        let matched_keywords: Vec<String> = CONCERN_KEYWORDS
            .iter()
            .filter(|k| lowered.contains(*k))
            .map(|k| (*k).to_string())
            .collect();

        Some(NoteFinding {
            elevated_concern: !matched_keywords.is_empty(),
            matched_keywords,
        })
    }
}
