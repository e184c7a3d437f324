//! Dispatcher: the single-threaded UI execution context.
//!
//! The dispatcher owns every pane (a sink plus an optional view) and is the
//! only place sinks are mutated. Workers never touch a sink; they post
//! [`UiEvent`]s into one ordered queue which the dispatcher drains, so no
//! lock is ever taken around a sink.

use super::messages::{Mutation, PaneId, SinkOp, UiEvent, UiSender};
use crate::config::DispatcherConfig;
use crate::sink::{LineBuffer, NoView, OutputSink, View};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

/// A sink, its optional view, and the bookkeeping for monitors feeding it.
#[derive(Debug)]
pub struct Pane<S, V> {
    sink: S,
    view: Option<V>,
    /// Monitors attached and not yet finished.
    running: usize,
    /// Set once any attached monitor has finished.
    finished: bool,
    /// Some finished monitor asked for the view to close.
    close_requested: bool,
    /// Set once the view has been closed.
    closed: bool,
}

impl<S: OutputSink, V: View> Pane<S, V> {
    const fn new(sink: S, view: Option<V>) -> Self {
        Self {
            sink,
            view,
            running: 0,
            finished: false,
            close_requested: false,
            closed: false,
        }
    }

    /// The pane's sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The pane's view, until it is closed.
    pub const fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// Whether every monitor attached to this pane has finished.
    pub const fn is_finished(&self) -> bool {
        self.finished && self.running == 0
    }

    /// Whether the view was closed on completion.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn apply(&mut self, mutation: &Mutation) {
        match mutation.op {
            SinkOp::Append => self.sink.append(&mutation.text),
            SinkOp::ReplaceLast => self.sink.replace_last(&mutation.text),
        }

        if let Some(log) = &mutation.error_log {
            log.record(&mutation.text);
        }

        if mutation.scroll_to_end {
            if let Some(view) = self.view.as_mut() {
                view.request_scroll_to(self.sink.len().saturating_sub(1));
            }
        }
    }

    fn finish(&mut self, close_view: bool) {
        self.running = self.running.saturating_sub(1);
        self.finished = true;
        self.close_requested |= close_view;

        // A view shared by several monitors closes after the last one.
        // Taking it releases it, so a later request finds nothing.
        if self.close_requested && self.running == 0 {
            if let Some(mut view) = self.view.take() {
                view.close();
                self.closed = true;
            }
        }
    }
}

/// Consumes monitor events in order and applies them to panes.
///
/// # Example
///
/// ```
/// use procwatch::{Dispatcher, LineBuffer, MonitorConfig, StreamMonitor};
///
/// let mut dispatcher: Dispatcher<LineBuffer> = Dispatcher::new();
/// let pane = dispatcher.add_buffer_pane(None);
///
/// let input: &[u8] = b"step 1\rstep 2\n";
/// StreamMonitor::new(input, dispatcher.sender(pane), MonitorConfig::default()).run();
///
/// dispatcher.drain();
/// let sink = dispatcher.sink(pane).unwrap();
/// assert_eq!(sink.iter().collect::<Vec<_>>(), ["step 1", "step 2"]);
/// ```
#[derive(Debug)]
pub struct Dispatcher<S, V = NoView> {
    config: DispatcherConfig,
    tx: Sender<UiEvent>,
    rx: Receiver<UiEvent>,
    panes: Vec<Pane<S, V>>,
}

impl<S: OutputSink, V: View> Default for Dispatcher<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: OutputSink, V: View> Dispatcher<S, V> {
    /// Create a dispatcher with an unbounded queue.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create a dispatcher with custom configuration.
    pub fn with_config(config: DispatcherConfig) -> Self {
        let (tx, rx) = match config.queue_capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };
        Self {
            config,
            tx,
            rx,
            panes: Vec::new(),
        }
    }

    /// The dispatcher's configuration.
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Register a pane and return its id.
    pub fn add_pane(&mut self, sink: S, view: Option<V>) -> PaneId {
        self.panes.push(Pane::new(sink, view));
        PaneId(self.panes.len() - 1)
    }

    /// Create a sender for one monitor writing to `pane`.
    ///
    /// Every sender counts as one monitor: the pane is finished once that
    /// many [`UiEvent::Finished`] events have arrived.
    pub fn sender(&mut self, pane: PaneId) -> UiSender {
        match self.panes.get_mut(pane.0) {
            Some(target) => target.running += 1,
            None => tracing::warn!(%pane, "sender created for unknown pane"),
        }
        UiSender::new(pane, self.tx.clone())
    }

    /// Number of panes.
    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    /// Look up a pane.
    pub fn pane(&self, pane: PaneId) -> Option<&Pane<S, V>> {
        self.panes.get(pane.0)
    }

    /// The sink of a pane.
    pub fn sink(&self, pane: PaneId) -> Option<&S> {
        self.pane(pane).map(Pane::sink)
    }

    /// Whether every monitor attached to `pane` has finished.
    pub fn is_finished(&self, pane: PaneId) -> bool {
        self.pane(pane).is_some_and(Pane::is_finished)
    }

    /// Whether no attached monitor is still running.
    pub fn all_finished(&self) -> bool {
        self.panes.iter().all(|pane| pane.running == 0)
    }

    /// Number of events waiting in the queue.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Apply the next queued event, if any (non-blocking).
    pub fn poll(&mut self) -> bool {
        match self.rx.try_recv() {
            Ok(event) => {
                self.dispatch(event);
                true
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
        }
    }

    /// Wait up to `timeout` for the next event and apply it.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.dispatch(event);
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Apply every queued event. Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.poll() {
            count += 1;
        }
        count
    }

    /// Apply events until every attached monitor has finished.
    ///
    /// Returns `false` if `timeout` elapses first.
    pub fn run_until_finished(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.all_finished() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.wait(remaining) {
                return self.all_finished();
            }
        }
        true
    }

    /// Apply one event.
    ///
    /// Events for unknown panes are dropped.
    pub fn dispatch(&mut self, event: UiEvent) {
        let pane_id = event.pane();
        let Some(pane) = self.panes.get_mut(pane_id.0) else {
            tracing::warn!(pane = %pane_id, "dropping event for unknown pane");
            return;
        };

        match event {
            UiEvent::Mutation(mutation) => {
                tracing::trace!(pane = %pane_id, op = ?mutation.op, "applying mutation");
                pane.apply(&mutation);
            }
            UiEvent::Finished { close_view, .. } => {
                tracing::debug!(pane = %pane_id, close_view, "stream finished");
                pane.finish(close_view);
            }
        }
    }
}

impl<V: View> Dispatcher<LineBuffer, V> {
    /// Register a pane backed by a [`LineBuffer`] sized from the config.
    pub fn add_buffer_pane(&mut self, view: Option<V>) -> PaneId {
        let sink = LineBuffer::new(self.config.max_lines);
        self.add_pane(sink, view)
    }
}
