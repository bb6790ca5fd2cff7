//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SyllabusSettings::default()`]
//! 2. If `~/.syllabus/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `SYLLABUS_*` environment variable overrides
//! 4. Validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::SyllabusSettings;

/// Resolve the path to the settings file (`~/.syllabus/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".syllabus").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<SyllabusSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults (plus env overrides). If the
/// file contains invalid JSON or the result fails validation, returns an
/// error.
pub fn load_settings_from_path(path: &Path) -> Result<SyllabusSettings> {
    let mut settings = read_settings_file(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<SyllabusSettings> {
    let defaults =
        serde_json::to_value(SyllabusSettings::default()).map_err(SettingsError::parse(path))?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path).map_err(SettingsError::read(path))?;
        let user: Value = serde_json::from_str(&content).map_err(SettingsError::parse(path))?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    serde_json::from_value(merged).map_err(SettingsError::parse(path))
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut SyllabusSettings) {
    apply_env_overrides_with(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Empty values are treated as unset. Values that fail to parse or fall
/// outside their range are ignored with a warning.
pub fn apply_env_overrides_with<F>(settings: &mut SyllabusSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader { lookup };

    // ── API settings ────────────────────────────────────────────────
    if let Some(v) = env.string("SYLLABUS_API_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = env.string("SYLLABUS_CLASSROOMS_PATH") {
        settings.api.classrooms_path = v;
    }
    if let Some(v) = env.u64("SYLLABUS_TIMEOUT_MS", 100, 600_000) {
        settings.api.timeout_ms = v;
    }

    // ── Auth settings ───────────────────────────────────────────────
    if let Some(v) = env.string("SYLLABUS_TOKEN_ENV") {
        settings.auth.token_env = v;
    }

    // ── Reorder settings ────────────────────────────────────────────
    if let Some(v) = env.usize("SYLLABUS_MAX_CONCURRENT_UPDATES", 1, 64) {
        settings.reorder.max_concurrent_updates = v;
    }
    if let Some(v) = env.bool("SYLLABUS_PERSIST_UNCHANGED") {
        settings.reorder.persist_unchanged = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = env.string("SYLLABUS_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (min..=max).contains(&n).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (min..=max).contains(&n).then_some(n)
}

// ── Env lookup ──────────────────────────────────────────────────────────────

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-empty value of `name`.
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    /// Value of `name` run through `parse`; rejected values are logged and
    /// treated as unset.
    fn parsed<T>(
        &self,
        name: &str,
        expected: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = self.string(name)?;
        let value = parse(raw.trim());
        if value.is_none() {
            tracing::warn!(key = name, value = %raw, expected, "ignoring invalid env override");
        }
        value
    }

    fn bool(&self, name: &str) -> Option<bool> {
        self.parsed(name, "boolean", parse_bool)
    }

    fn u64(&self, name: &str, min: u64, max: u64) -> Option<u64> {
        self.parsed(name, "integer in range", |v| parse_u64_range(v, min, max))
    }

    fn usize(&self, name: &str, min: usize, max: usize) -> Option<usize> {
        self.parsed(name, "integer in range", |v| parse_usize_range(v, min, max))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
