//! Note record and the partial-field patch applied by edits.

use crate::domain::NoteId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-authored note.
///
/// The durable record is owned by the persistence service; the store holds an
/// in-memory copy that may transiently diverge (optimistic edit) until the
/// next fetch reconciles it.
///
/// # Fields
/// - `id`: Unique ULID identifier, stable for the note's lifetime
/// - `title`: Human-readable title (may be empty; creation defaults to "Untitled")
/// - `content`: Markdown body
/// - `updated_at`: Last modification time, refreshed on every persisted update
///
/// Serialized as `{ "id", "title", "content", "updatedAt" }` with `updatedAt`
/// as integer milliseconds since epoch, matching the durable record format.
///
/// # Examples
///
/// ```
/// use reef::domain::{Note, NoteId};
/// use chrono::Utc;
///
/// let note = Note::new(NoteId::new(), "API Design", "# Notes", Utc::now());
/// assert_eq!(note.title(), "API Design");
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    title: String,
    content: String,
    #[serde(rename = "updatedAt", with = "chrono::serde::ts_milliseconds")]
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new Note.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            updated_at,
        }
    }

    /// Returns the note's unique identifier.
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Returns the note's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the note's markdown body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the note was last modified.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy with `fields` merged in, timestamp unchanged.
    ///
    /// This is the optimistic-edit merge: the store applies it to its
    /// in-memory copy without contacting the backend.
    pub fn with_fields(&self, fields: &NoteFields) -> Self {
        let mut next = self.clone();
        if let Some(title) = fields.title_field() {
            next.title = title.to_string();
        }
        if let Some(content) = fields.content_field() {
            next.content = content.to_string();
        }
        next
    }

    /// Returns a copy with the modification timestamp set to `at`.
    ///
    /// Used by the persistence service, which always refreshes the timestamp
    /// when it durably applies an update.
    pub fn touched(&self, at: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.updated_at = at;
        next
    }

    /// Case-insensitive substring match against title OR content.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&q) || self.content.to_lowercase().contains(&q)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id.prefix())
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("content", &self.content)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// A partial patch of editable note fields.
///
/// `None` fields are left untouched by a merge. Used both for the store's
/// optimistic in-memory edit and for the service's durable update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFields {
    title: Option<String>,
    content: Option<String>,
}

impl NoteFields {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title field.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the content field.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Returns the title patch, if any.
    pub fn title_field(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the content patch, if any.
    pub fn content_field(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}
