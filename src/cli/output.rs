//! Output format types for CLI commands.

use crate::domain::Note;
use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub id: String,
    pub title: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl NoteListing {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id().to_string(),
            title: note.title().to_string(),
            updated_at: note.updated_at().to_rfc3339(),
        }
    }
}

/// A full note in show output.
#[derive(Debug, Serialize)]
pub struct NoteDetail {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl NoteDetail {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id().to_string(),
            title: note.title().to_string(),
            content: note.content().to_string(),
            updated_at: note.updated_at().to_rfc3339(),
        }
    }
}
