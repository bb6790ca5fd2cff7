//! Display state owned by one controller.

use syllabus_core::{ClassroomId, Section, SectionCollection};

/// Everything a section list view renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionListState {
    /// Classroom whose sections are shown.
    pub classroom_id: ClassroomId,
    /// Sections in display order.
    pub sections: SectionCollection,
    /// A load is in flight.
    pub loading: bool,
    /// Last user-facing error, if any.
    pub error: Option<String>,
    /// The inline "add section" input is open.
    pub adding_section: bool,
    /// A create request is in flight.
    pub adding_in_flight: bool,
}

impl SectionListState {
    /// Empty state for `classroom_id`.
    pub fn new(classroom_id: ClassroomId) -> Self {
        Self {
            classroom_id,
            sections: SectionCollection::new(),
            loading: false,
            error: None,
            adding_section: false,
            adding_in_flight: false,
        }
    }

    /// Sections in display order.
    pub fn sections(&self) -> &[Section] {
        self.sections.as_slice()
    }
}
