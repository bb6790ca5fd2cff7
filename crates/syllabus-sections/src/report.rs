//! Outcome of persisting a reorder.

use syllabus_core::SectionId;

/// One order update the server did not accept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedUpdate {
    /// Section whose order was not saved.
    pub id: SectionId,
    /// Order value that was sent.
    pub order: i64,
    /// User-facing failure text.
    pub message: String,
}

/// Result of [`SectionListController::reorder`](crate::SectionListController::reorder).
///
/// The local move has always been applied when a report is returned;
/// the report only describes persistence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReorderReport {
    /// `(from, to)` positions of the moved section, `None` for a no-op.
    pub moved: Option<(usize, usize)>,
    /// Sections whose new order was saved, ascending by new order.
    pub updated: Vec<SectionId>,
    /// Sections whose new order was not saved, ascending by new order.
    pub failed: Vec<FailedUpdate>,
}

impl ReorderReport {
    /// Report for a drop onto the section's own position.
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Every attempted update was saved.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of update requests attempted.
    pub fn attempted(&self) -> usize {
        self.updated.len() + self.failed.len()
    }

    /// Aggregated user-facing message, `None` when nothing failed.
    ///
    /// A single failure shows its own message; several are summarized with
    /// the message of the last one.
    pub fn failure_message(&self) -> Option<String> {
        let last = self.failed.last()?;
        if self.failed.len() == 1 {
            return Some(last.message.clone());
        }
        Some(format!(
            "Failed to save the new order for {} of {} sections: {}",
            self.failed.len(),
            self.attempted(),
            last.message
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(id: &str, order: i64) -> FailedUpdate {
        FailedUpdate {
            id: id.into(),
            order,
            message: format!("{id} rejected"),
        }
    }

    #[test]
    fn unchanged_is_complete() {
        let r = ReorderReport::unchanged();
        assert!(r.is_complete());
        assert_eq!(r.attempted(), 0);
        assert_eq!(r.failure_message(), None);
    }

    #[test]
    fn single_failure_uses_its_message() {
        let r = ReorderReport {
            moved: Some((2, 0)),
            updated: vec!["a".into(), "b".into()],
            failed: vec![failed("c", 1)],
        };
        assert!(!r.is_complete());
        assert_eq!(r.failure_message().as_deref(), Some("c rejected"));
    }

    #[test]
    fn multiple_failures_are_summarized() {
        let r = ReorderReport {
            moved: Some((0, 2)),
            updated: vec!["a".into()],
            failed: vec![failed("b", 1), failed("c", 2)],
        };
        assert_eq!(
            r.failure_message().as_deref(),
            Some("Failed to save the new order for 2 of 3 sections: c rejected")
        );
    }
}
