//! Stream Monitor: one worker per monitored stream.
//!
//! The monitor drives a [`LineSplitter`] to exhaustion and turns every
//! non-empty line into exactly one [`Mutation`] posted to the UI:
//! terminated lines append, partial lines replace the last entry. When the
//! stream ends (cleanly or not) it posts a single [`UiEvent::Finished`].
//!
//! The worker only blocks on the stream read. Posting is one-way, so it
//! keeps parsing while the UI is still draining earlier mutations.

use super::messages::{Mutation, SinkOp, UiEvent, UiSender};
use crate::config::MonitorConfig;
use crate::error::StreamError;
use crate::split::LineSplitter;
use std::io::Read;
use std::thread::{self, JoinHandle};

/// Summary of a finished monitor session.
#[derive(Debug, Default)]
pub struct MonitorReport {
    /// Logical lines read, including empty ones.
    pub lines: usize,
    /// Append mutations produced.
    pub appended: usize,
    /// Replace-last mutations produced.
    pub replaced: usize,
    /// Empty lines dropped without a mutation.
    pub skipped: usize,
    /// Bytes consumed from the stream.
    pub bytes: u64,
    /// The error that ended the session, if it did not end cleanly.
    ///
    /// The monitor treats this exactly like end of stream; it is kept here
    /// only so callers can inspect it.
    pub error: Option<StreamError>,
    /// Whether the dispatcher went away before the stream ended.
    pub ui_disconnected: bool,
}

impl MonitorReport {
    /// Total mutations produced.
    pub const fn mutations(&self) -> usize {
        self.appended + self.replaced
    }

    /// Whether the stream ended without error.
    pub const fn is_clean(&self) -> bool {
        self.error.is_none()
    }
}

/// Watches one byte stream and feeds a dispatcher pane.
pub struct StreamMonitor<R> {
    /// Name used in logs and as the thread name suffix.
    label: String,
    splitter: LineSplitter<R>,
    ui: UiSender,
    config: MonitorConfig,
}

impl<R: Read> StreamMonitor<R> {
    /// Create a monitor over `reader` posting to `ui`.
    pub fn new(reader: R, ui: UiSender, config: MonitorConfig) -> Self {
        Self::with_splitter(LineSplitter::new(reader), ui, config)
    }

    /// Create a monitor over an existing splitter.
    pub fn with_splitter(splitter: LineSplitter<R>, ui: UiSender, config: MonitorConfig) -> Self {
        Self {
            label: "stream".to_string(),
            splitter,
            ui,
            config,
        }
    }

    /// Set the label used in logs and the worker thread name.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// The monitor's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the monitor on the current thread until the stream ends.
    ///
    /// Consumes the monitor: once the loop exits it cannot be re-entered,
    /// which is what makes the completion event fire exactly once.
    pub fn run(mut self) -> MonitorReport {
        let pane = self.ui.pane();
        tracing::debug!(stream = %self.label, %pane, "monitor started");

        let mut report = MonitorReport::default();
        let mut ui_open = true;

        loop {
            let line = match self.splitter.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(error) => {
                    tracing::warn!(stream = %self.label, %pane, %error, "stream ended with error");
                    report.error = Some(error);
                    break;
                }
            };

            report.lines += 1;
            if line.is_empty() {
                report.skipped += 1;
                continue;
            }

            let op = if line.is_terminated() {
                report.appended += 1;
                SinkOp::Append
            } else {
                report.replaced += 1;
                SinkOp::ReplaceLast
            };

            // Keep reading after the UI goes away so the writer never
            // blocks on a full pipe.
            if !ui_open {
                continue;
            }
            tracing::trace!(stream = %self.label, ?op, ending = %line.ending, "posting mutation");
            ui_open = self.ui.post(UiEvent::Mutation(Mutation {
                pane,
                op,
                text: line.into_text(),
                scroll_to_end: self.config.auto_scroll,
                error_log: self.config.error_log.clone(),
            }));
            if !ui_open {
                tracing::debug!(stream = %self.label, "dispatcher gone, draining stream");
            }
        }

        report.bytes = self.splitter.bytes_read();
        if ui_open {
            ui_open = self.ui.post(UiEvent::Finished {
                pane,
                close_view: self.config.auto_close_view,
            });
        }
        report.ui_disconnected = !ui_open;

        tracing::debug!(
            stream = %self.label,
            %pane,
            lines = report.lines,
            appended = report.appended,
            replaced = report.replaced,
            "monitor finished"
        );
        report
    }
}

impl<R: Read + Send + 'static> StreamMonitor<R> {
    /// Spawn the monitor on a dedicated thread.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the thread.
    pub fn spawn(self) -> MonitorHandle {
        let label = self.label.clone();
        let handle = thread::Builder::new()
            .name(format!("procwatch-{label}"))
            .spawn(move || self.run())
            .expect("Failed to spawn monitor thread");

        MonitorHandle { label, handle }
    }
}

/// Handle to a monitor running on its own thread.
#[derive(Debug)]
pub struct MonitorHandle {
    label: String,
    handle: JoinHandle<MonitorReport>,
}

impl MonitorHandle {
    /// The monitor's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the worker has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return its report.
    ///
    /// Returns `Err` with the panic payload if the worker panicked.
    pub fn join(self) -> thread::Result<MonitorReport> {
        self.handle.join()
    }
}
