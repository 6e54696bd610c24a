//! Audit stream for per-rule decisions.
//!
//! Every meaningful rule action emits one structured line carrying the rule's
//! priority, name, and description. Lines always reach the `tracing`
//! subscriber; the process-wide debug flag only selects the severity they are
//! emitted at. An optional sink additionally captures records for inspection.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::util::clock::now_ms;

use super::rule::RuleMeta;

/// One audited rule action.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    /// Record identifier.
    pub event_id: String,
    /// Priority of the emitting rule.
    pub priority: u32,
    /// Name of the emitting rule.
    pub rule: String,
    /// Description of the emitting rule.
    pub description: String,
    /// Formatted message describing the action taken.
    pub message: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit entry.
    fn record(&mut self, record: AuditRecord);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    records: VecDeque<AuditRecord>,
    max_records: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_records: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_records),
            max_records,
        }
    }

    /// Retrieve a snapshot of stored records.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, record: AuditRecord) {
        if self.records.len() >= self.max_records {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }
}

/// Handle through which rules emit audit lines.
///
/// Cheap to clone; the optional sink is shared behind a mutex so concurrent
/// submissions can record without further coordination.
#[derive(Clone, Default)]
pub struct AuditLog {
    sink: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
    verbose: bool,
}

impl AuditLog {
    /// Create a log handle. `verbose` selects `info` over `debug` severity
    /// for emitted lines; content is identical either way.
    pub fn new(verbose: bool) -> Self {
        Self {
            sink: None,
            verbose,
        }
    }

    /// Attach a sink that captures every record.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.sink = Some(Arc::new(Mutex::new(sink)));
        self
    }

    /// Emit one audit line on behalf of a rule.
    pub fn record(&self, rule: &RuleMeta, message: &str) {
        if self.verbose {
            tracing::info!(
                priority = rule.priority,
                rule = %rule.name,
                description = %rule.description,
                "{message}"
            );
        } else {
            tracing::debug!(
                priority = rule.priority,
                rule = %rule.name,
                description = %rule.description,
                "{message}"
            );
        }
        if let Some(sink) = &self.sink {
            let mut sink = sink.lock();
            sink.record(AuditRecord {
                event_id: uuid::Uuid::new_v4().to_string(),
                priority: rule.priority,
                rule: rule.name.clone(),
                description: rule.description.clone(),
                message: message.to_string(),
                created_at_ms: now_ms(),
            });
        }
    }
}
