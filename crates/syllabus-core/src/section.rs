//! The section record.
//!
//! The classroom API is document-store backed and may key a section by `id`,
//! `_id`, or both. Deserialization goes through [`RawSection`] so either
//! spelling is accepted; `id` wins when both are present.

use serde::{Deserialize, Serialize};

use crate::ids::SectionId;

/// A titled, orderable child record within a classroom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct Section {
    /// Section identifier, unique within the classroom.
    pub id: SectionId,
    /// Display title.
    pub title: String,
    /// Display position. Lower values sort first.
    pub order: i64,
}

impl Section {
    /// Create a section.
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
        }
    }
}

/// Section as it appears on the wire.
#[derive(Deserialize)]
struct RawSection {
    #[serde(default)]
    id: Option<SectionId>,
    #[serde(rename = "_id", default)]
    document_id: Option<SectionId>,
    title: String,
    order: i64,
}

impl TryFrom<RawSection> for Section {
    type Error = String;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.document_id)
            .ok_or_else(|| format!("section {:?} has no id or _id", raw.title))?;
        Ok(Self {
            id,
            title: raw.title,
            order: raw.order,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_plain_id() {
        let s: Section = serde_json::from_value(json!({
            "id": "s1", "title": "Intro", "order": 1
        }))
        .unwrap();
        assert_eq!(s, Section::new("s1", "Intro", 1));
    }

    #[test]
    fn accepts_document_id() {
        let s: Section = serde_json::from_value(json!({
            "_id": "65f0", "title": "Week 1", "order": 3, "__v": 0
        }))
        .unwrap();
        assert_eq!(s.id.as_str(), "65f0");
        assert_eq!(s.order, 3);
    }

    #[test]
    fn id_wins_over_document_id() {
        let s: Section = serde_json::from_value(json!({
            "_id": "doc", "id": "virtual", "title": "T", "order": 1
        }))
        .unwrap();
        assert_eq!(s.id.as_str(), "virtual");
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = serde_json::from_value::<Section>(json!({"title": "T", "order": 1}))
            .unwrap_err();
        assert!(err.to_string().contains("no id"));
    }

    #[test]
    fn missing_order_is_rejected() {
        assert!(serde_json::from_value::<Section>(json!({"id": "a", "title": "T"})).is_err());
    }

    #[test]
    fn serializes_with_id_field() {
        let v = serde_json::to_value(Section::new("a", "T", 2)).unwrap();
        assert_eq!(v, json!({"id": "a", "title": "T", "order": 2}));
    }
}
