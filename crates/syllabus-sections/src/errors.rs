//! Controller error types.

use syllabus_api::{ApiError, Operation};
use syllabus_auth::AuthError;
use syllabus_core::{ClassroomId, OrderingError, SectionId};

/// Errors returned by [`SectionListController`](crate::SectionListController)
/// operations.
///
/// Every error except [`Stale`](Self::Stale) is also recorded as the
/// controller's display error via [`user_message`](Self::user_message).
#[derive(Debug, thiserror::Error)]
pub enum SectionListError {
    /// A classroom API call failed.
    #[error("{op} failed: {source}")]
    Api {
        /// Which call failed.
        op: Operation,
        /// Underlying API error.
        #[source]
        source: ApiError,
    },

    /// No bearer token could be obtained.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// The section title was empty or whitespace-only.
    #[error("section title is empty")]
    EmptyTitle,

    /// The classroom ID was empty or whitespace-only.
    #[error("classroom id is empty")]
    EmptyClassroomId,

    /// A reorder referenced a section that is not loaded.
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),

    /// The classroom changed while the request was in flight; the response
    /// was discarded.
    #[error("response for classroom {0} discarded after classroom switch")]
    Stale(ClassroomId),
}

impl SectionListError {
    pub(crate) fn api(op: Operation) -> impl FnOnce(ApiError) -> Self {
        move |source| Self::Api { op, source }
    }

    /// Text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { op, source } => source.user_message(*op),
            Self::Auth(e) => format!("Authentication failed: {e}"),
            Self::EmptyTitle => "Section title cannot be empty".to_string(),
            Self::EmptyClassroomId => "A classroom is required".to_string(),
            Self::UnknownSection(id) => format!("Section {id} is not in this classroom"),
            Self::Stale(_) => self.to_string(),
        }
    }
}

impl From<OrderingError> for SectionListError {
    fn from(err: OrderingError) -> Self {
        match err {
            OrderingError::UnknownSection(id) => Self::UnknownSection(id),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_names_operation() {
        let err = SectionListError::api(Operation::CreateSection)(ApiError::Status {
            status: 409,
            message: "Duplicate title".into(),
        });
        assert_eq!(
            err.to_string(),
            "create section failed: API error (409): Duplicate title"
        );
        assert_eq!(err.user_message(), "Duplicate title");
    }

    #[test]
    fn auth_user_message() {
        let err = SectionListError::from(AuthError::EmptyToken);
        assert_eq!(err.user_message(), "Authentication failed: auth token is empty");
    }

    #[test]
    fn ordering_error_conversion() {
        let err = SectionListError::from(OrderingError::UnknownSection("s9".into()));
        assert!(matches!(err, SectionListError::UnknownSection(ref id) if id.as_str() == "s9"));
        assert_eq!(err.user_message(), "Section s9 is not in this classroom");
    }
}
