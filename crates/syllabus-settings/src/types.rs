//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a partial JSON file only needs the keys it overrides.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "api": { "baseUrl": "https://school.example.com", "timeoutMs": 10000 },
///   "reorder": { "maxConcurrentUpdates": 4 }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyllabusSettings {
    /// Settings schema version.
    pub version: String,
    /// Classroom API endpoint settings.
    pub api: ApiSettings,
    /// Bearer token source.
    pub auth: AuthSettings,
    /// Reorder persistence settings.
    pub reorder: ReorderSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for SyllabusSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            api: ApiSettings::default(),
            auth: AuthSettings::default(),
            reorder: ReorderSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl SyllabusSettings {
    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "api.baseUrl must not be empty".to_string(),
            ));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(SettingsError::InvalidValue(format!(
                "api.baseUrl must be an http(s) URL, got {:?}",
                self.api.base_url
            )));
        }
        if self.api.timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "api.timeoutMs must be > 0".to_string(),
            ));
        }
        if self.reorder.max_concurrent_updates == 0 {
            return Err(SettingsError::InvalidValue(
                "reorder.maxConcurrentUpdates must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Classroom API endpoint settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Scheme, host and port of the backend.
    pub base_url: String,
    /// Path of the classrooms collection under `base_url`.
    pub classrooms_path: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            classrooms_path: "/api/v1/classrooms".to_string(),
            timeout_ms: 30_000,
            user_agent: concat!("syllabus/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiSettings {
    /// Full URL of the classrooms collection, without a trailing slash.
    pub fn classrooms_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.classrooms_path.trim_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Bearer token source.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    /// Environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_env: "SYLLABUS_API_TOKEN".to_string(),
        }
    }
}

/// Reorder persistence settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReorderSettings {
    /// Maximum order updates in flight at once.
    pub max_concurrent_updates: usize,
    /// Send an update for every section, even when its order did not change.
    pub persist_unchanged: bool,
}

impl Default for ReorderSettings {
    fn default() -> Self {
        Self {
            max_concurrent_updates: 8,
            persist_unchanged: false,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
