//! Capture `tracing` events so tests can assert on what was logged.
//!
//! [`LogCapture::install`] sets a thread-local default subscriber. Use it from
//! a current-thread runtime (the `#[tokio::test]` default) so every event
//! emitted by the code under test lands on the same thread.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a failed test

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One captured log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLog {
    /// Level the event was emitted at
    pub level: Level,
    /// Module path / target of the event
    pub target: String,
    /// The formatted `message` field
    pub message: String,
    /// All other fields, formatted with `Debug` (strings unquoted)
    pub fields: BTreeMap<String, String>,
}

/// A `tracing_subscriber` layer that stores every event it sees.
///
/// Clones share the same record list.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<CapturedLog>>>,
}

impl LogCapture {
    /// Install a capturing subscriber as the thread's default.
    ///
    /// Events are captured until the returned guard is dropped.
    #[must_use]
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    /// Every captured record, in emission order
    #[must_use]
    pub fn records(&self) -> Vec<CapturedLog> {
        self.records.lock().unwrap().clone()
    }

    /// Captured records at exactly `level`
    #[must_use]
    pub fn at_level(&self, level: Level) -> Vec<CapturedLog> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.level == level)
            .cloned()
            .collect()
    }

    /// Captured records at `ERROR` level
    #[must_use]
    pub fn errors(&self) -> Vec<CapturedLog> {
        self.at_level(Level::ERROR)
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.records.lock().unwrap().push(CapturedLog {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl FieldVisitor {
    fn store(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.store(field, format!("{value:?}"));
    }
}
