//! Monitoring event records and delivery sinks
//!
//! The monitoring core emits a record when a flagged condition ends (with
//! the duration it held) and when an escalation alarm is raised (duration
//! null). Delivery is fire-and-forget: a sink must never block the frame
//! pass, and delivery guarantees are the sink implementation's problem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// One emitted monitoring event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Condition or alarm name, e.g. "distraction", "sleeping"
    pub kind: String,
    /// Emission time
    pub timestamp: DateTime<Utc>,
    /// How long the condition held; `None` for alarm raises
    pub duration_s: Option<f64>,
}

impl EventRecord {
    pub fn new(kind: impl Into<String>, duration_s: Option<f64>) -> Self {
        Self {
            kind: kind.into(),
            timestamp: Utc::now(),
            duration_s,
        }
    }
}

/// Fire-and-forget event consumer
pub trait EventSink: Send + Sync {
    fn emit(&self, record: EventRecord);
}

/// Sink that writes records to the tracing log
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, record: EventRecord) {
        match serde_json::to_string(&record) {
            Ok(json) => info!(target: "monitor_events", event = %json, "monitor event"),
            Err(e) => info!(
                target: "monitor_events",
                kind = %record.kind,
                duration_s = ?record.duration_s,
                error = %e,
                "monitor event (serialization failed)"
            ),
        }
    }
}

/// Sink that forwards records over an unbounded channel, e.g. to a
/// reporting task. A dropped receiver discards records silently.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<EventRecord>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EventRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, record: EventRecord) {
        if self.tx.send(record).is_err() {
            debug!("event receiver dropped; record discarded");
        }
    }
}

/// Sink that drops everything, for tests and headless runs
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _record: EventRecord) {}
}
