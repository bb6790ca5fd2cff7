//! # syllabus-auth
//!
//! Bearer token sources for the classroom API.
//!
//! Token issuance lives elsewhere; this crate only hands a token to each
//! request. Every provider implements [`TokenProvider`], whose
//! [`token`](TokenProvider::token) may suspend (e.g. while a refresh is in
//! flight).
//!
//! - [`StaticTokenProvider`]: a fixed token
//! - [`EnvTokenProvider`]: re-reads an environment variable on every call
//! - [`CachedTokenProvider`]: caches the result of an async refresh function
//!   until shortly before it expires

#![deny(unsafe_code)]

pub mod errors;
pub mod providers;

pub use errors::AuthError;
pub use providers::{
    CachedTokenProvider, EnvTokenProvider, IssuedToken, StaticTokenProvider, TokenProvider,
};
