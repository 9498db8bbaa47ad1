//! Normalisation of legacy note payloads.
//!
//! Older revisions of the backend stored line notes three different ways: a
//! bare string, a JSON-encoded string containing an array of note objects,
//! and a plain array of note objects. Key casing drifted too
//! (`user_name` / `userName` / `username`). All shapes are normalised once at
//! ingestion into [`NoteEntry`]; nothing downstream branches on shape, and no
//! shape is allowed to fail the load.

use serde::{Deserialize, Serialize};

/// One normalised note attached to a request line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteEntry {
    /// Timestamp the note was recorded (ISO 8601 format).
    pub noted_at: Option<String>,
    /// Name of the author.
    pub author: Option<String>,
    /// Role the author acted in.
    pub role: Option<String>,
    /// Note text.
    pub content: String,
}

/// Wire shape of the `note` field, tolerating every legacy format.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(in crate::erp) enum ApiNotePayload {
    /// Current format: an array of note objects.
    Entries(Vec<ApiNoteEntry>),
    /// Legacy formats: bare text, or a JSON-encoded array in a string.
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub(in crate::erp) struct ApiNoteEntry {
    #[serde(alias = "timestamp", alias = "created_at")]
    noted_at: Option<String>,
    #[serde(alias = "user_name", alias = "userName", alias = "username")]
    author: Option<String>,
    #[serde(alias = "userRole")]
    role: Option<String>,
    #[serde(alias = "note", alias = "text")]
    content: Option<String>,
}

impl From<ApiNoteEntry> for NoteEntry {
    fn from(value: ApiNoteEntry) -> Self {
        Self {
            noted_at: value.noted_at,
            author: value.author,
            role: value.role,
            content: value.content.unwrap_or_default(),
        }
    }
}

/// Normalises whatever the backend stored into a list of note entries.
///
/// Bare text becomes a single authorless entry; a JSON-encoded array is
/// decoded and treated like the array form; blank text yields no entries.
/// Entries whose content is blank after trimming are dropped.
pub(in crate::erp) fn normalise_notes(payload: Option<ApiNotePayload>) -> Vec<NoteEntry> {
    let Some(payload) = payload else {
        return Vec::new();
    };

    let entries = match payload {
        ApiNotePayload::Entries(entries) => entries,
        ApiNotePayload::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            match serde_json::from_str::<Vec<ApiNoteEntry>>(trimmed) {
                Ok(entries) => entries,
                Err(_) => {
                    return vec![NoteEntry {
                        noted_at: None,
                        author: None,
                        role: None,
                        content: trimmed.to_owned(),
                    }];
                }
            }
        }
    };

    entries
        .into_iter()
        .map(NoteEntry::from)
        .filter(|entry| !entry.content.trim().is_empty())
        .collect()
}
