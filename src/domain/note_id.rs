//! ULID-based note identifier with prefix matching and serde support.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::time::SystemTime;
use ulid::Ulid;

/// A unique identifier for notes based on ULID.
///
/// ULIDs are 26-character Crockford Base32 encoded strings that are:
/// - Lexicographically sortable (chronological order)
/// - Globally unique
/// - URL-safe
///
/// # Examples
///
/// ```
/// use reef::domain::NoteId;
///
/// let id = NoteId::new();
/// println!("Full ID: {}", id);         // e.g., "01HQ3K5M7NXJK4QZPW8V2R6T9Y"
/// println!("Prefix: {}", id.prefix()); // e.g., "01HQ3K5M7N"
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NoteId(Ulid);

impl NoteId {
    /// Creates a new NoteId with the current timestamp.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Creates a NoteId from a specific datetime (useful for testing).
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let system_time: SystemTime = datetime.into();
        Self(Ulid::from_datetime(system_time))
    }

    /// Returns the 10-character prefix of the ULID.
    ///
    /// The first 10 characters encode the full 48-bit millisecond timestamp,
    /// which keeps prefixes short but stable in listings.
    pub fn prefix(&self) -> String {
        self.0.to_string()[..10].to_string()
    }

    /// Returns true if this ID's string form starts with `prefix`
    /// (case-insensitive, ULIDs are canonically uppercase).
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.0
            .to_string()
            .starts_with(&prefix.trim().to_uppercase())
    }

    /// Returns the timestamp encoded in this ID.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let millis = self.0.timestamp_ms();
        DateTime::from_timestamp_millis(millis as i64).expect("ULID timestamp should be valid")
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId(\"{}\")", self.0)
    }
}

/// Error returned when parsing an invalid ULID string.
#[derive(Debug, Clone)]
pub struct ParseNoteIdError {
    value: String,
    reason: String,
}

impl ParseNoteIdError {
    /// Returns the invalid value that caused this error.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseNoteIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid ULID '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ParseNoteIdError {}

impl FromStr for NoteId {
    type Err = ParseNoteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s)
            .map(NoteId)
            .map_err(|e| ParseNoteIdError {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Serialize for NoteId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
