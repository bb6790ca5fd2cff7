//! Auth error types.

/// Errors that can occur while obtaining a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No token source is configured (e.g. the env var is unset).
    #[error("no auth token configured: {0}")]
    NotConfigured(String),

    /// The token source returned an empty token.
    #[error("auth token is empty")]
    EmptyToken,

    /// Refreshing the token failed.
    #[error("token refresh failed: {0}")]
    Refresh(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
