//! Test utilities for code that uses allowfail.
//!
//! - [`CapturedLogs`] is a `log::Log` implementation that keeps records in
//!   memory, for injecting into a [`Logger`](crate::Logger) or installing
//!   as the global logger.
//! - [`RecordingHandler`] is an error handler that keeps a [`Report`] for
//!   every failure it receives.

use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::handler::{ErrorHandler, Report};
use crate::logging::Logger;
use crate::outcome::{BoxError, DynError};

/// One captured log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// An in-memory log sink. Clones share the same buffer.
#[derive(Debug, Clone)]
pub struct CapturedLogs {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
    level: LevelFilter,
}

impl CapturedLogs {
    /// Captures records at every level.
    #[must_use]
    pub fn new() -> Self {
        Self::with_level(LevelFilter::Trace)
    }

    /// Captures records at `level` or more severe.
    #[must_use]
    pub fn with_level(level: LevelFilter) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            level,
        }
    }

    /// Returns this sink as a shareable `Log` for [`Logger::with_sink`].
    #[must_use]
    pub fn sink(&self) -> Arc<dyn Log> {
        Arc::new(self.clone())
    }

    /// All captured records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Messages of all captured records.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    /// Records written under `target`.
    #[must_use]
    pub fn for_target(&self, target: &str) -> Vec<CapturedRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.target == target)
            .collect()
    }

    /// Returns `true` if any captured message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|r| r.message.contains(needle))
    }

    /// Drops all captured records.
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl Default for CapturedLogs {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for CapturedLogs {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut records) = self.records.lock() {
            records.push(CapturedRecord {
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            });
        }
    }

    fn flush(&self) {}
}

/// An error handler that records every failure. Clones share the same
/// buffer, so keep one clone to inspect after handing another to a guard.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    reports: Arc<Mutex<Vec<Report>>>,
    fail_with: Option<String>,
}

impl RecordingHandler {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder that records, then fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reports: Arc::default(),
            fail_with: Some(message.into()),
        }
    }

    /// All recorded reports, oldest first.
    #[must_use]
    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of recorded reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorHandler for RecordingHandler {
    fn on_error(&self, label: &str, error: &DynError, _logger: &Logger) -> Result<(), BoxError> {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(Report::new(label, error));
        }
        match &self.fail_with {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}
