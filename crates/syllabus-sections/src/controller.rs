//! Section list controller.
//!
//! Owns the [`SectionListState`] of one classroom and mediates every change
//! to it:
//!
//! - [`load`](SectionListController::load) replaces the sections wholesale
//!   with the server's, sorted by order.
//! - [`add_section`](SectionListController::add_section) creates a section
//!   and reloads on success.
//! - [`reorder`](SectionListController::reorder) applies a drag-and-drop move
//!   locally, then persists the new order of every renumbered section.
//!
//! # Concurrency
//!
//! State lives behind a mutex that is never held across an `.await`, so
//! operations can run concurrently on a shared controller. Each operation
//! captures the current generation before its first request;
//! [`set_classroom`](SectionListController::set_classroom) bumps the
//! generation, and any response that completes under an older generation is
//! discarded without touching state.
//!
//! Loads for the same classroom are also ordered: each one takes a sequence
//! number when it starts, and a snapshot older than the list already shown
//! is dropped. A local reorder counts as the newest snapshot, so a load
//! started before it cannot undo it.
//!
//! The `loading` and `adding_in_flight` flags are owned by an [`InFlight`]
//! guard, so an operation whose future is dropped mid-request still clears
//! them.

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use syllabus_api::{ApiError, ClassroomApi, Operation};
use syllabus_auth::TokenProvider;
use syllabus_core::{ClassroomId, MoveOutcome, Section, SectionCollection, SectionId};
use syllabus_settings::ReorderSettings;
use tracing::{debug, info, warn};

use crate::errors::SectionListError;
use crate::report::{FailedUpdate, ReorderReport};
use crate::state::SectionListState;

/// Tuning for reorder persistence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Maximum order updates in flight at once. Values below 1 are treated as 1.
    pub max_concurrent_updates: usize,
    /// Send an update for every section, not only those whose order changed.
    pub persist_unchanged: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&ReorderSettings::default())
    }
}

impl From<&ReorderSettings> for ControllerOptions {
    fn from(settings: &ReorderSettings) -> Self {
        Self {
            max_concurrent_updates: settings.max_concurrent_updates,
            persist_unchanged: settings.persist_unchanged,
        }
    }
}

struct Inner {
    state: SectionListState,
    generation: u64,
    loads_in_flight: usize,
    /// Last sequence number handed out to a load or a local reorder.
    seq: u64,
    /// Sequence number of the snapshot the list currently shows.
    shown_seq: u64,
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Whether a load that started at `seq` is older than what is shown.
    fn is_superseded(&self, seq: u64) -> bool {
        seq < self.shown_seq
    }

    fn finish(&mut self, kind: InFlightKind, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        match kind {
            InFlightKind::Load => {
                self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
                self.state.loading = self.loads_in_flight > 0;
            }
            InFlightKind::Add => self.state.adding_in_flight = false,
        }
    }

    fn record_error(&mut self, err: &SectionListError) {
        self.state.error = Some(err.user_message());
    }
}

#[derive(Clone, Copy, Debug)]
enum InFlightKind {
    Load,
    Add,
}

/// Holds an in-flight flag for one request and clears it when released or
/// dropped. A guard from an older generation leaves state alone.
struct InFlight<'a> {
    lock: &'a Mutex<Inner>,
    kind: InFlightKind,
    generation: u64,
    released: bool,
}

impl<'a> InFlight<'a> {
    fn begin(lock: &'a Mutex<Inner>, inner: &mut Inner, kind: InFlightKind) -> Self {
        match kind {
            InFlightKind::Load => {
                inner.loads_in_flight += 1;
                inner.state.loading = true;
            }
            InFlightKind::Add => inner.state.adding_in_flight = true,
        }
        Self {
            lock,
            kind,
            generation: inner.generation,
            released: false,
        }
    }

    /// Clear the flag while the caller already holds the lock.
    fn release(&mut self, inner: &mut Inner) {
        if !self.released {
            self.released = true;
            inner.finish(self.kind, self.generation);
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.lock.lock().finish(self.kind, self.generation);
        }
    }
}

/// Keeps one classroom's sections in sync with the classroom API.
pub struct SectionListController {
    api: Arc<dyn ClassroomApi>,
    tokens: Arc<dyn TokenProvider>,
    options: ControllerOptions,
    inner: Mutex<Inner>,
}

impl SectionListController {
    /// Create a controller for `classroom_id`. Nothing is fetched until
    /// [`load`](Self::load) is called.
    pub fn new(
        api: Arc<dyn ClassroomApi>,
        tokens: Arc<dyn TokenProvider>,
        classroom_id: ClassroomId,
    ) -> Result<Self, SectionListError> {
        if classroom_id.is_blank() {
            return Err(SectionListError::EmptyClassroomId);
        }
        Ok(Self {
            api,
            tokens,
            options: ControllerOptions::default(),
            inner: Mutex::new(Inner {
                state: SectionListState::new(classroom_id),
                generation: 0,
                loads_in_flight: 0,
                seq: 0,
                shown_seq: 0,
            }),
        })
    }

    /// Replace the reorder persistence options.
    #[must_use]
    pub fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Snapshot of the whole display state.
    pub fn state(&self) -> SectionListState {
        self.inner.lock().state.clone()
    }

    /// Sections in display order.
    pub fn sections(&self) -> Vec<Section> {
        self.inner.lock().state.sections.as_slice().to_vec()
    }

    /// Current classroom.
    pub fn classroom_id(&self) -> ClassroomId {
        self.inner.lock().state.classroom_id.clone()
    }

    /// Last user-facing error.
    pub fn error(&self) -> Option<String> {
        self.inner.lock().state.error.clone()
    }

    /// Dismiss the current error.
    pub fn clear_error(&self) {
        self.inner.lock().state.error = None;
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.lock().state.loading
    }

    /// Whether the inline add input is open.
    pub fn is_adding(&self) -> bool {
        self.inner.lock().state.adding_section
    }

    // ── Classroom switching ─────────────────────────────────────────────

    /// Switch to another classroom.
    ///
    /// Clears sections, error and add state. Responses still in flight for
    /// the previous classroom will be discarded. Call [`load`](Self::load)
    /// afterwards to fetch the new classroom.
    pub fn set_classroom(&self, classroom_id: ClassroomId) -> Result<(), SectionListError> {
        if classroom_id.is_blank() {
            return Err(SectionListError::EmptyClassroomId);
        }
        let mut inner = self.inner.lock();
        debug!(from = %inner.state.classroom_id, to = %classroom_id, "switching classroom");
        inner.generation += 1;
        inner.loads_in_flight = 0;
        inner.state = SectionListState::new(classroom_id);
        Ok(())
    }

    /// Capture the classroom and generation an operation runs against.
    fn snapshot(&self) -> (ClassroomId, u64) {
        let inner = self.inner.lock();
        (inner.state.classroom_id.clone(), inner.generation)
    }

    async fn token(&self) -> Result<String, SectionListError> {
        Ok(self.tokens.token().await?)
    }

    // ── Load ────────────────────────────────────────────────────────────

    /// Fetch the classroom's sections and replace the local list.
    ///
    /// Returns the number of sections loaded. On failure the previous
    /// sections are kept and the error is recorded for display.
    ///
    /// If a newer load or a local reorder has already updated the list by
    /// the time this one finishes, its snapshot is dropped: success returns
    /// the current section count, and a failure is returned without being
    /// recorded.
    #[tracing::instrument(skip_all, fields(classroom_id))]
    pub async fn load(&self) -> Result<usize, SectionListError> {
        let (mut in_flight, classroom, seq) = {
            let mut inner = self.inner.lock();
            let seq = inner.next_seq();
            let in_flight = InFlight::begin(&self.inner, &mut inner, InFlightKind::Load);
            (in_flight, inner.state.classroom_id.clone(), seq)
        };
        let _ = tracing::Span::current().record("classroom_id", classroom.as_str());

        let result = self.fetch_sections(&classroom).await;

        let mut inner = self.inner.lock();
        in_flight.release(&mut inner);
        if !inner.is_current(in_flight.generation) {
            warn!(classroom_id = %classroom, "discarding stale classroom response");
            return Err(SectionListError::Stale(classroom));
        }
        if inner.is_superseded(seq) {
            debug!(seq, shown = inner.shown_seq, "discarding superseded load");
            return result.map(|_| inner.state.sections.len());
        }

        match result {
            Ok(sections) => {
                inner.shown_seq = seq;
                let count = sections.len();
                inner.state.sections = sections;
                inner.state.error = None;
                debug!(count, "sections loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "failed to load sections");
                inner.record_error(&err);
                Err(err)
            }
        }
    }

    /// Same as [`load`](Self::load); call after anything that changed the
    /// classroom server-side.
    pub async fn reload(&self) -> Result<usize, SectionListError> {
        self.load().await
    }

    async fn fetch_sections(
        &self,
        classroom: &ClassroomId,
    ) -> Result<SectionCollection, SectionListError> {
        let token = self.token().await?;
        let data = self
            .api
            .fetch_classroom(classroom, &token)
            .await
            .map_err(SectionListError::api(Operation::FetchClassroom))?;
        Ok(SectionCollection::from_unsorted(data.sections))
    }

    // ── Add ─────────────────────────────────────────────────────────────

    /// Open the inline add input.
    pub fn begin_adding(&self) {
        self.inner.lock().state.adding_section = true;
    }

    /// Close the inline add input without adding anything.
    pub fn cancel_adding(&self) {
        self.inner.lock().state.adding_section = false;
    }

    /// Create a section titled `title`, then reload.
    ///
    /// Blank titles are rejected without a request. On failure the add input
    /// stays open and no reload happens. Returns the section count after the
    /// reload.
    #[tracing::instrument(skip_all, fields(classroom_id))]
    pub async fn add_section(&self, title: &str) -> Result<usize, SectionListError> {
        let title = title.trim();
        if title.is_empty() {
            let err = SectionListError::EmptyTitle;
            self.inner.lock().record_error(&err);
            return Err(err);
        }

        let (mut in_flight, classroom) = {
            let mut inner = self.inner.lock();
            let in_flight = InFlight::begin(&self.inner, &mut inner, InFlightKind::Add);
            (in_flight, inner.state.classroom_id.clone())
        };
        let _ = tracing::Span::current().record("classroom_id", classroom.as_str());

        let result = self.create_section(&classroom, title).await;

        {
            let mut inner = self.inner.lock();
            in_flight.release(&mut inner);
            if !inner.is_current(in_flight.generation) {
                warn!(classroom_id = %classroom, "discarding stale create response");
                return Err(SectionListError::Stale(classroom));
            }
            if let Err(err) = result {
                warn!(error = %err, "failed to add section");
                inner.record_error(&err);
                return Err(err);
            }
            inner.state.adding_section = false;
        }

        info!(title, "section added");
        self.reload().await
    }

    async fn create_section(
        &self,
        classroom: &ClassroomId,
        title: &str,
    ) -> Result<(), SectionListError> {
        let token = self.token().await?;
        self.api
            .create_section(classroom, title, &token)
            .await
            .map_err(SectionListError::api(Operation::CreateSection))
    }

    // ── Reorder ─────────────────────────────────────────────────────────

    /// Move `source` onto `target`'s position and persist the new order.
    ///
    /// The local list is updated before any request is sent and is not
    /// rolled back if persistence fails. Dropping a section onto itself is a
    /// no-op. Unknown IDs are rejected without changing the list.
    ///
    /// Persistence failures do not make this return `Err`; they are listed
    /// in the returned [`ReorderReport`] and summarized as the display error.
    #[tracing::instrument(skip_all, fields(classroom_id, source = %source, target = %target))]
    pub async fn reorder(
        &self,
        source: &SectionId,
        target: &SectionId,
    ) -> Result<ReorderReport, SectionListError> {
        if source == target {
            return Ok(ReorderReport::unchanged());
        }

        let (classroom, generation, moved, updates) = {
            let mut inner = self.inner.lock();
            let outcome = match inner.state.sections.move_section(source, target) {
                Ok(outcome) => outcome,
                Err(e) => {
                    let err = SectionListError::from(e);
                    warn!(error = %err, "rejected reorder");
                    inner.record_error(&err);
                    return Err(err);
                }
            };
            let MoveOutcome::Moved { from, to, ref changes } = outcome else {
                return Ok(ReorderReport::unchanged());
            };
            let updates: Vec<(SectionId, i64)> = changes
                .iter()
                .filter(|c| self.options.persist_unchanged || c.is_changed())
                .map(|c| (c.id.clone(), c.order))
                .collect();
            inner.shown_seq = inner.next_seq();
            (
                inner.state.classroom_id.clone(),
                inner.generation,
                (from, to),
                updates,
            )
        };
        let _ = tracing::Span::current().record("classroom_id", classroom.as_str());
        debug!(from = moved.0, to = moved.1, updates = updates.len(), "section moved");

        let mut report = self.persist_order(&classroom, updates).await;
        report.moved = Some(moved);

        if let Some(message) = report.failure_message() {
            let mut inner = self.inner.lock();
            if inner.is_current(generation) {
                warn!(
                    failed = report.failed.len(),
                    attempted = report.attempted(),
                    "failed to persist section order"
                );
                inner.state.error = Some(message);
            } else {
                debug!("classroom switched during reorder, not surfacing failures");
            }
        }
        Ok(report)
    }

    /// Send one order update per entry, joined with bounded concurrency.
    async fn persist_order(
        &self,
        classroom: &ClassroomId,
        updates: Vec<(SectionId, i64)>,
    ) -> ReorderReport {
        let mut report = ReorderReport::default();
        if updates.is_empty() {
            return report;
        }

        let token = match self.token().await {
            Ok(token) => token,
            Err(err) => {
                let message = err.user_message();
                report.failed = updates
                    .into_iter()
                    .map(|(id, order)| FailedUpdate {
                        id,
                        order,
                        message: message.clone(),
                    })
                    .collect();
                return report;
            }
        };

        let api = &self.api;
        let token = token.as_str();
        let limit = self.options.max_concurrent_updates.max(1);
        let mut results: Vec<(SectionId, i64, Result<(), ApiError>)> =
            futures::stream::iter(updates)
                .map(move |(id, order)| async move {
                    let result = api.update_section_order(classroom, &id, order, token).await;
                    (id, order, result)
                })
                .buffer_unordered(limit)
                .collect()
                .await;
        results.sort_by_key(|(_, order, _)| *order);

        for (id, order, result) in results {
            match result {
                Ok(()) => report.updated.push(id),
                Err(e) => {
                    debug!(section_id = %id, error = %e, category = e.category(), "order update failed");
                    report.failed.push(FailedUpdate {
                        id,
                        order,
                        message: e.user_message(Operation::UpdateOrder),
                    });
                }
            }
        }
        report
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
