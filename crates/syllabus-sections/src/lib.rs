//! # syllabus-sections
//!
//! The section list controller: keeps the ordered sections of one classroom
//! in sync with the classroom API and applies drag-to-reorder moves.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use syllabus_api::HttpClassroomApi;
//! use syllabus_auth::StaticTokenProvider;
//! use syllabus_sections::SectionListController;
//!
//! let api = Arc::new(HttpClassroomApi::new("http://127.0.0.1:3000/api/v1/classrooms")?);
//! let tokens = Arc::new(StaticTokenProvider::new("token"));
//! let controller = SectionListController::new(api, tokens, "65f0c2".into())?;
//!
//! let _ = controller.load().await;
//! let report = controller.reorder(&"s3".into(), &"s1".into()).await?;
//! if !report.is_complete() {
//!     eprintln!("{}", controller.error().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod controller;
pub mod errors;
pub mod report;
pub mod state;

pub use controller::{ControllerOptions, SectionListController};
pub use errors::SectionListError;
pub use report::{FailedUpdate, ReorderReport};
pub use state::SectionListState;

#[cfg(test)]
mod fake;
