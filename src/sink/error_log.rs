//! In-memory error-log collector keyed by the originating process.

use super::ErrorLogCollector;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Accumulates the lines a process printed, for later inspection.
#[derive(Debug, Default)]
pub struct ErrorLog {
    /// Name of the process the messages came from.
    source: String,
    messages: Mutex<Vec<String>>,
}

impl ErrorLog {
    /// Create an empty log for the named process.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// The process this log belongs to.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Snapshot of the recorded messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic elsewhere while holding the lock leaves the Vec intact.
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ErrorLogCollector for ErrorLog {
    fn record(&self, text: &str) {
        self.lock().push(text.to_owned());
    }
}
