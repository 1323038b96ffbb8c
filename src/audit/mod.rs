//! Observability sink handed to every transform
//!
//! Transforms never reach for a global logger. The caller passes a
//! `&dyn AuditSink`; production code uses [`TracingSink`], tests use
//! [`MemorySink`] to assert on what was reported.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

/// Severity of an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Debug,
    Info,
    Warn,
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditLevel::Debug => write!(f, "debug"),
            AuditLevel::Info => write!(f, "info"),
            AuditLevel::Warn => write!(f, "warn"),
        }
    }
}

/// Receiver for audit events raised while transforming a table
pub trait AuditSink {
    /// Record one event for `stage`
    fn emit(&self, level: AuditLevel, stage: &str, message: &str);

    fn debug(&self, stage: &str, message: &str) {
        self.emit(AuditLevel::Debug, stage, message);
    }

    fn info(&self, stage: &str, message: &str) {
        self.emit(AuditLevel::Info, stage, message);
    }

    fn warn(&self, stage: &str, message: &str) {
        self.emit(AuditLevel::Warn, stage, message);
    }
}

/// Forwards audit events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn emit(&self, level: AuditLevel, stage: &str, message: &str) {
        match level {
            AuditLevel::Debug => tracing::debug!(target: "festival_archive::audit", stage, "{message}"),
            AuditLevel::Info => tracing::info!(target: "festival_archive::audit", stage, "{message}"),
            AuditLevel::Warn => tracing::warn!(target: "festival_archive::audit", stage, "{message}"),
        }
    }
}

/// One recorded event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub level: AuditLevel,
    pub stage: String,
    pub message: String,
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: RefCell<Vec<AuditRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.borrow().clone()
    }

    /// Events for one stage at or above `level`
    pub fn count(&self, stage: &str, level: AuditLevel) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.stage == stage && r.level >= level)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl AuditSink for MemorySink {
    fn emit(&self, level: AuditLevel, stage: &str, message: &str) {
        self.records.borrow_mut().push(AuditRecord {
            level,
            stage: stage.to_string(),
            message: message.to_string(),
        });
    }
}

/// Sends each event to two sinks
pub struct TeeSink<'a> {
    first: &'a dyn AuditSink,
    second: &'a dyn AuditSink,
}

impl<'a> TeeSink<'a> {
    pub fn new(first: &'a dyn AuditSink, second: &'a dyn AuditSink) -> Self {
        Self { first, second }
    }
}

impl AuditSink for TeeSink<'_> {
    fn emit(&self, level: AuditLevel, stage: &str, message: &str) {
        self.first.emit(level, stage, message);
        self.second.emit(level, stage, message);
    }
}
