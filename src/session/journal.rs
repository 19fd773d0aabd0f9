//! Append-only, timestamped session log.
//!
//! Entries are kept in memory for display and mirrored to the `log` facade,
//! which `main` routes to the session log file.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};
use log::Level;

/// Destination for the progress messages an action emits while it runs.
///
/// Actions only ever see this trait, never the session itself, so they can run
/// on a worker thread while the session stays with the interactive thread.
pub trait ActionLog: Send + Sync {
    fn record(&self, level: Level, message: String);

    fn info(&self, message: &str) {
        self.record(Level::Info, message.to_string());
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message.to_string());
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
        }
    }

    /// `[HH:MM:SS] message`
    pub fn formatted(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

#[derive(Debug, Default)]
pub struct CaseLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl CaseLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry produced elsewhere (e.g. on a worker thread)
    pub fn push(&self, entry: LogEntry) {
        log::log!(target: "session", entry.level, "{}", entry.message);
        self.lock().push(entry);
    }

    /// Snapshot of every entry, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Entries appended after the first `start`
    pub fn entries_since(&self, start: usize) -> Vec<LogEntry> {
        self.lock().iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|e| e.message.contains(needle))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // A panic while holding the lock cannot leave a Vec half-pushed
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ActionLog for CaseLog {
    fn record(&self, level: Level, message: String) {
        self.push(LogEntry::new(level, message));
    }
}
