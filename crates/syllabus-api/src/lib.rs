//! # syllabus-api
//!
//! Client for the classroom REST API.
//!
//! [`ClassroomApi`] is the seam the section-list controller talks to;
//! [`HttpClassroomApi`] implements it with `reqwest`. Endpoints, relative to
//! the classrooms collection URL:
//!
//! | method | path | body |
//! |---|---|---|
//! | `GET` | `/{classroomId}?populate=sections` | (none) |
//! | `POST` | `/{classroomId}` | `{ "title": ... }` |
//! | `PUT` | `/{classroomId}/{sectionId}` | `{ "order": n }` |

#![deny(unsafe_code)]

pub mod client;
pub mod errors;

pub use client::{ClassroomApi, HttpClassroomApi};
pub use errors::{ApiError, Operation};
