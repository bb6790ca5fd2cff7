//! Token provider trait and implementations.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::errors::AuthError;

/// Supplies a bearer token on demand.
///
/// Implementors must be `Send + Sync` so one provider can be shared by every
/// request a controller issues.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token for the `Authorization: Bearer` header.
    async fn token(&self) -> Result<String, AuthError>;
}

// ── Static ──────────────────────────────────────────────────────────────────

/// Always returns the same token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Create a provider for a fixed token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<String, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(self.token.clone())
    }
}

// ── Environment ─────────────────────────────────────────────────────────────

/// Reads the token from an environment variable on every call.
#[derive(Clone, Debug)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    /// Create a provider reading `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable this provider reads.
    pub fn var(&self) -> &str {
        &self.var
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn token(&self) -> Result<String, AuthError> {
        match std::env::var(&self.var) {
            Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            Ok(_) => Err(AuthError::NotConfigured(format!("{} is empty", self.var))),
            Err(_) => Err(AuthError::NotConfigured(format!("{} is unset", self.var))),
        }
    }
}

// ── Cached refresh ──────────────────────────────────────────────────────────

/// Token returned by a refresh function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedToken {
    /// The bearer token.
    pub access_token: String,
    /// Lifetime from now. `None` means the token never expires.
    pub expires_in: Option<Duration>,
}

struct Cached {
    token: String,
    refresh_at: Option<Instant>,
}

impl Cached {
    fn is_fresh(&self, now: Instant) -> bool {
        self.refresh_at.is_none_or(|at| now < at)
    }
}

type RefreshFn = Arc<dyn Fn() -> BoxFuture<'static, Result<IssuedToken, AuthError>> + Send + Sync>;

/// Caches the token produced by an async refresh function.
///
/// The token is reused until `expires_in - expiry_buffer` has elapsed. The
/// cache lock is held across the refresh, so concurrent callers wait for a
/// single refresh instead of starting their own.
pub struct CachedTokenProvider {
    refresh: RefreshFn,
    expiry_buffer: Duration,
    cached: Mutex<Option<Cached>>,
}

impl CachedTokenProvider {
    /// Default time before expiry at which a token is refreshed.
    pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::from_secs(30);

    /// Create a provider around `refresh`.
    pub fn new<F, Fut>(refresh: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<IssuedToken, AuthError>> + Send + 'static,
    {
        Self {
            refresh: Arc::new(move || Box::pin(refresh())),
            expiry_buffer: Self::DEFAULT_EXPIRY_BUFFER,
            cached: Mutex::new(None),
        }
    }

    /// Refresh this long before the token expires.
    #[must_use]
    pub fn with_expiry_buffer(mut self, buffer: Duration) -> Self {
        self.expiry_buffer = buffer;
        self
    }

    /// Drop the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}

#[async_trait]
impl TokenProvider for CachedTokenProvider {
    async fn token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        let now = Instant::now();
        if let Some(c) = cached.as_ref().filter(|c| c.is_fresh(now)) {
            return Ok(c.token.clone());
        }

        debug!("refreshing bearer token");
        let issued = (self.refresh)().await?;
        if issued.access_token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        let refresh_at = issued
            .expires_in
            .map(|ttl| now + ttl.saturating_sub(self.expiry_buffer));
        *cached = Some(Cached {
            token: issued.access_token.clone(),
            refresh_at,
        });
        Ok(issued.access_token)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
