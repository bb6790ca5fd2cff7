//! # syllabus-core
//!
//! Foundation types shared by every Syllabus crate:
//!
//! - [`ids`]: branded ID newtypes ([`ClassroomId`], [`SectionId`])
//! - [`section`]: the [`Section`] record as sent by the classroom API
//! - [`collection`]: [`SectionCollection`], the ordered list of sections and
//!   the single-element move used by drag-to-reorder
//! - [`wire`]: JSON request/response envelopes for the classroom API
//! - [`errors`]: ordering errors

#![deny(unsafe_code)]

pub mod collection;
pub mod errors;
pub mod ids;
pub mod section;
pub mod wire;

pub use collection::{MoveOutcome, OrderChange, SectionCollection, move_item, sort_by_order};
pub use errors::OrderingError;
pub use ids::{ClassroomId, SectionId};
pub use section::Section;
