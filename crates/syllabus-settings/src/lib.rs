//! # syllabus-settings
//!
//! Configuration with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`SyllabusSettings::default()`]
//! 2. **User file**: `~/.syllabus/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `SYLLABUS_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use syllabus_settings::load_settings;
//!
//! let settings = load_settings().unwrap_or_default();
//! println!("API: {}", settings.api.classrooms_url());
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_env_overrides_with, deep_merge, load_settings,
    load_settings_from_path, settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
