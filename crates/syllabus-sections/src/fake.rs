//! In-memory [`ClassroomApi`] for controller tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use syllabus_api::{ApiError, ClassroomApi};
use syllabus_core::wire::Classroom;
use syllabus_core::{ClassroomId, Section, SectionId};
use tokio::sync::Notify;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Fetch(ClassroomId),
    Create(ClassroomId, String),
    Update(ClassroomId, SectionId, i64),
}

#[derive(Default)]
struct Inner {
    classrooms: HashMap<ClassroomId, Vec<Section>>,
    fetch_error: Option<(u16, String)>,
    create_error: Option<(u16, String)>,
    failing_updates: HashSet<SectionId>,
    calls: Vec<Call>,
    tokens: Vec<String>,
    created: usize,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    inner: Mutex<Inner>,
    fetch_gate: Mutex<Option<Arc<Notify>>>,
    create_gate: Mutex<Option<Arc<Notify>>>,
}

fn status(code: u16, message: &str) -> ApiError {
    ApiError::Status {
        status: code,
        message: message.to_string(),
    }
}

impl FakeApi {
    pub(crate) fn with_sections(classroom: &str, sections: Vec<Section>) -> Self {
        let api = Self::default();
        let _ = api
            .inner
            .lock()
            .classrooms
            .insert(ClassroomId::from(classroom), sections);
        api
    }

    pub(crate) fn set_sections(&self, classroom: &str, sections: Vec<Section>) {
        let _ = self
            .inner
            .lock()
            .classrooms
            .insert(ClassroomId::from(classroom), sections);
    }

    pub(crate) fn fail_fetch(&self, code: u16, message: &str) {
        self.inner.lock().fetch_error = Some((code, message.to_string()));
    }

    pub(crate) fn clear_fetch_error(&self) {
        self.inner.lock().fetch_error = None;
    }

    pub(crate) fn fail_create(&self, code: u16, message: &str) {
        self.inner.lock().create_error = Some((code, message.to_string()));
    }

    pub(crate) fn fail_update(&self, id: &str) {
        let _ = self.inner.lock().failing_updates.insert(SectionId::from(id));
    }

    /// Hold every fetch until the returned `Notify` fires. The response is
    /// taken before waiting, as if it were delayed in transit.
    pub(crate) fn gate_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.fetch_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Let fetches started from now on answer immediately.
    pub(crate) fn ungate_fetches(&self) {
        *self.fetch_gate.lock() = None;
    }

    /// Hold every create until the returned `Notify` fires.
    pub(crate) fn gate_creates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.create_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub(crate) fn tokens(&self) -> Vec<String> {
        self.inner.lock().tokens.clone()
    }

    pub(crate) fn update_calls(&self) -> Vec<(SectionId, i64)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Update(_, id, order) => Some((id.clone(), *order)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn stored_order(&self, classroom: &str, id: &str) -> Option<i64> {
        self.inner
            .lock()
            .classrooms
            .get(&ClassroomId::from(classroom))?
            .iter()
            .find(|s| s.id.as_str() == id)
            .map(|s| s.order)
    }
}

#[async_trait]
impl ClassroomApi for FakeApi {
    async fn fetch_classroom(
        &self,
        classroom: &ClassroomId,
        token: &str,
    ) -> Result<Classroom, ApiError> {
        let response = {
            let mut inner = self.inner.lock();
            inner.calls.push(Call::Fetch(classroom.clone()));
            inner.tokens.push(token.to_string());
            match &inner.fetch_error {
                Some((code, message)) => Err(status(*code, message)),
                None => inner
                    .classrooms
                    .get(classroom)
                    .cloned()
                    .map(|sections| Classroom {
                        title: None,
                        sections,
                    })
                    .ok_or_else(|| status(404, "Classroom not found")),
            }
        };
        let gate = self.fetch_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        response
    }

    async fn create_section(
        &self,
        classroom: &ClassroomId,
        title: &str,
        token: &str,
    ) -> Result<(), ApiError> {
        let gate = self.create_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(Call::Create(classroom.clone(), title.to_string()));
        inner.tokens.push(token.to_string());
        if let Some((code, message)) = &inner.create_error {
            return Err(status(*code, message));
        }
        inner.created += 1;
        let id = format!("new-{}", inner.created);
        let sections = inner.classrooms.entry(classroom.clone()).or_default();
        let order = i64::try_from(sections.len()).unwrap_or(i64::MAX) + 1;
        sections.push(Section::new(id, title, order));
        Ok(())
    }

    async fn update_section_order(
        &self,
        classroom: &ClassroomId,
        section: &SectionId,
        order: i64,
        token: &str,
    ) -> Result<(), ApiError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(Call::Update(classroom.clone(), section.clone(), order));
        inner.tokens.push(token.to_string());
        if inner.failing_updates.contains(section) {
            return Err(status(500, &format!("could not save {section}")));
        }
        if let Some(s) = inner
            .classrooms
            .get_mut(classroom)
            .and_then(|list| list.iter_mut().find(|s| &s.id == section))
        {
            s.order = order;
        }
        Ok(())
    }
}
