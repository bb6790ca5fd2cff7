//! Ordering error types.

use crate::ids::SectionId;

/// Errors raised while moving sections within a collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError {
    /// The referenced section is not part of the collection.
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
