//! [`ClassroomApi`] trait and its `reqwest` implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, Url};
use syllabus_core::wire::{Classroom, Envelope, ErrorBody, NewSection, OrderUpdate};
use syllabus_core::{ClassroomId, SectionId};
use syllabus_settings::ApiSettings;
use tracing::debug;

use crate::errors::{ApiError, Operation};

/// Calls the controller makes against the classroom backend.
///
/// Every call takes the bearer token explicitly; acquiring it is the
/// caller's job.
#[async_trait]
pub trait ClassroomApi: Send + Sync {
    /// Fetch a classroom with its sections populated.
    async fn fetch_classroom(
        &self,
        classroom: &ClassroomId,
        token: &str,
    ) -> Result<Classroom, ApiError>;

    /// Create a section titled `title` in `classroom`.
    async fn create_section(
        &self,
        classroom: &ClassroomId,
        title: &str,
        token: &str,
    ) -> Result<(), ApiError>;

    /// Persist a new `order` for one section.
    async fn update_section_order(
        &self,
        classroom: &ClassroomId,
        section: &SectionId,
        order: i64,
        token: &str,
    ) -> Result<(), ApiError>;
}

/// HTTP client for the classroom API.
#[derive(Clone, Debug)]
pub struct HttpClassroomApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpClassroomApi {
    /// Build a client from settings (base URL, timeout, user agent).
    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .user_agent(settings.user_agent.clone())
            .default_headers(json_headers())
            .build()?;
        Self::with_client(client, &settings.classrooms_url())
    }

    /// Build a client with default settings against `classrooms_url`.
    pub fn new(classrooms_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .default_headers(json_headers())
            .build()?;
        Self::with_client(client, classrooms_url)
    }

    /// Use an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client, classrooms_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(classrooms_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{classrooms_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{classrooms_url}: not a base URL"
            )));
        }
        Ok(Self { client, base })
    }

    /// The classrooms collection URL requests are built from.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?;
            let _ = path.pop_if_empty();
            let _ = path.extend(segments);
        }
        Ok(url)
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Turn a non-success response into [`ApiError::Status`].
async fn ensure_success(resp: Response, op: Operation) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = ErrorBody::message_from(&body)
        .unwrap_or_else(|| op.fallback_message().to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ClassroomApi for HttpClassroomApi {
    #[tracing::instrument(skip_all, fields(classroom_id = %classroom))]
    async fn fetch_classroom(
        &self,
        classroom: &ClassroomId,
        token: &str,
    ) -> Result<Classroom, ApiError> {
        let mut url = self.url(&[classroom.as_str()])?;
        let _ = url.query_pairs_mut().append_pair("populate", "sections");

        let resp = self.client.get(url).bearer_auth(token).send().await?;
        let resp = ensure_success(resp, Operation::FetchClassroom).await?;
        let body = resp.text().await?;
        let envelope: Envelope<Classroom> = serde_json::from_str(&body)?;
        debug!(sections = envelope.data.sections.len(), "fetched classroom");
        Ok(envelope.data)
    }

    #[tracing::instrument(skip_all, fields(classroom_id = %classroom))]
    async fn create_section(
        &self,
        classroom: &ClassroomId,
        title: &str,
        token: &str,
    ) -> Result<(), ApiError> {
        let url = self.url(&[classroom.as_str()])?;
        let resp = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&NewSection { title })
            .send()
            .await?;
        let _ = ensure_success(resp, Operation::CreateSection).await?;
        debug!("created section");
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(classroom_id = %classroom, section_id = %section, order = order))]
    async fn update_section_order(
        &self,
        classroom: &ClassroomId,
        section: &SectionId,
        order: i64,
        token: &str,
    ) -> Result<(), ApiError> {
        let url = self.url(&[classroom.as_str(), section.as_str()])?;
        let resp = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&OrderUpdate { order })
            .send()
            .await?;
        let _ = ensure_success(resp, Operation::UpdateOrder).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
