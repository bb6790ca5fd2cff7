//! JSON bodies exchanged with the classroom API.
//!
//! Successful reads are wrapped in a `{ "data": ... }` envelope. Failed
//! requests may carry a `{ "message": ... }` body whose text is shown to the
//! user as-is.

use serde::{Deserialize, Serialize};

use crate::section::Section;

/// `{ "data": T }` response envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    /// Wrapped payload.
    pub data: T,
}

/// Classroom with its sections populated.
///
/// Fields other than `title` and `sections` are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct Classroom {
    /// Classroom title, when the backend sends one.
    #[serde(default)]
    pub title: Option<String>,
    /// Sections in server order (not necessarily sorted).
    pub sections: Vec<Section>,
}

/// Body of the create-section request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewSection<'a> {
    /// Title of the new section.
    pub title: &'a str,
}

/// Body of the partial-update request that persists a new order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    /// New display position.
    pub order: i64,
}

/// Error body returned with non-success statuses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// User-facing error text.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract a non-empty `message` from a raw response body, if any.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
