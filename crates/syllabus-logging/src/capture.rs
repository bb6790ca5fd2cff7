//! In-memory capture of tracing output for assertions in tests.
//!
//! Spans keep their fields up to date, including fields declared empty and
//! filled in later with `Span::record`, so tests can check what an
//! instrumented operation attached to its span.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Field name to rendered value. `&str` values are stored without quotes.
pub type Fields = BTreeMap<String, String>;

/// An event emitted while capturing.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Module path the event came from.
    pub target: String,
    /// Rendered message.
    pub message: String,
    /// Structured fields other than the message.
    pub fields: Fields,
    /// Name of the innermost span the event was emitted in.
    pub span: Option<String>,
}

impl CapturedEvent {
    /// Value of a recorded field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A span created while capturing.
#[derive(Clone, Debug)]
pub struct CapturedSpan {
    /// Span name (the function name for `#[instrument]`).
    pub name: String,
    /// Module path the span came from.
    pub target: String,
    /// Fields recorded on the span so far.
    pub fields: Fields,
}

/// Handle to everything captured by [`capture_logs`].
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl CapturedLogs {
    /// Snapshot of captured events.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    /// Snapshot of captured spans, in creation order.
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().clone()
    }

    /// Whether any event at `level` has a message containing `needle`.
    pub fn has_event(&self, level: Level, needle: &str) -> bool {
        self.events
            .lock()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    /// Whether a span named `name` was created.
    pub fn has_span(&self, name: &str) -> bool {
        self.spans.lock().iter().any(|s| s.name == name)
    }

    /// Value of `field` on the most recent span named `span`.
    pub fn span_field(&self, span: &str, field: &str) -> Option<String> {
        self.spans
            .lock()
            .iter()
            .rev()
            .find(|s| s.name == span)
            .and_then(|s| s.fields.get(field).cloned())
    }

    /// Number of events at `level`.
    pub fn count_at_level(&self, level: Level) -> usize {
        self.events.lock().iter().filter(|e| e.level == level).count()
    }

    /// Forget everything captured so far.
    pub fn clear(&self) {
        self.events.lock().clear();
        self.spans.lock().clear();
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Fields,
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            let _ = self.fields.insert(field.name().to_owned(), value.to_owned());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = rendered;
        } else {
            let _ = self.fields.insert(field.name().to_owned(), rendered);
        }
    }
}

/// Position of a span in [`CapturedLogs::spans`], kept in span extensions.
struct SpanSlot(usize);

struct CaptureLayer {
    logs: CapturedLogs,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        attrs.record(&mut collector);
        let metadata = attrs.metadata();

        let slot = {
            let mut spans = self.logs.spans.lock();
            spans.push(CapturedSpan {
                name: metadata.name().to_owned(),
                target: metadata.target().to_owned(),
                fields: collector.fields,
            });
            spans.len() - 1
        };
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanSlot(slot));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let Some(slot) = span.extensions().get::<SpanSlot>().map(|s| s.0) else {
            return;
        };
        let mut collector = FieldCollector::default();
        values.record(&mut collector);
        if let Some(captured) = self.logs.spans.lock().get_mut(slot) {
            captured.fields.extend(collector.fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        let metadata = event.metadata();

        self.logs.events.lock().push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_owned(),
            message: collector.message,
            fields: collector.fields,
            span: ctx.event_span(event).map(|s| s.name().to_owned()),
        });
    }
}

/// Install a capturing subscriber for the current thread.
///
/// Keep the guard alive for the whole test. `#[tokio::test]` runs on a
/// current-thread runtime by default, so async code is captured too.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let guard = tracing_subscriber::registry()
        .with(CaptureLayer { logs: logs.clone() })
        .with(LevelFilter::TRACE)
        .set_default();
    (logs, guard)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
