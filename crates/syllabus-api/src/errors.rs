//! API error types.

/// Classroom API operations, used to pick a fallback user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// `GET /{classroomId}?populate=sections`
    FetchClassroom,
    /// `POST /{classroomId}`
    CreateSection,
    /// `PUT /{classroomId}/{sectionId}`
    UpdateOrder,
}

impl Operation {
    /// Message shown when the server gives no usable `message`.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::FetchClassroom => "An error occurred while fetching classrooms!",
            Self::CreateSection => "An error occurred while adding section",
            Self::UpdateOrder => "An error occurred while updating section order",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::FetchClassroom => "fetch classroom",
            Self::CreateSection => "create section",
            Self::UpdateOrder => "update section order",
        })
    }
}

/// Errors returned by [`ClassroomApi`](crate::ClassroomApi) calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided `message`, or the operation's fallback.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Error category string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(_) => "network",
            Self::Status { .. } => "status",
            Self::Decode(_) => "parse",
            Self::InvalidUrl(_) => "config",
        }
    }

    /// HTTP status, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Human-readable text for display.
    ///
    /// Server messages are shown verbatim; everything else collapses to the
    /// operation's fallback message.
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidUrl(_) => {
                op.fallback_message().to_string()
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
