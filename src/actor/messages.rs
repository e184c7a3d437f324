//! Message types for worker → UI communication.
//!
//! These types define the protocol between stream monitors and the
//! dispatcher. Each worker posts through its own [`UiSender`]; the queue is
//! FIFO, so the dispatcher applies a worker's events in the order they were
//! produced.

use crate::sink::ErrorLogCollector;
use crossbeam_channel::Sender;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

/// Identifies one pane (sink plus optional view) owned by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub(crate) usize);

impl PaneId {
    /// Position of the pane in the dispatcher.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

/// What a mutation does to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkOp {
    /// Grow the sink by one entry.
    Append,
    /// Overwrite the sink's most recent entry.
    ReplaceLast,
}

/// One sink mutation plus the notifications that follow it.
#[derive(Clone)]
pub struct Mutation {
    /// Target pane.
    pub pane: PaneId,
    /// Append or replace-last.
    pub op: SinkOp,
    /// The line text, terminator stripped.
    pub text: String,
    /// Whether the view should scroll to the last entry afterwards.
    pub scroll_to_end: bool,
    /// Collector notified with `text` afterwards.
    pub error_log: Option<Arc<dyn ErrorLogCollector>>,
}

impl fmt::Debug for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("pane", &self.pane)
            .field("op", &self.op)
            .field("text", &self.text)
            .field("scroll_to_end", &self.scroll_to_end)
            .field("error_log", &self.error_log.is_some())
            .finish()
    }
}

/// Events delivered to the UI execution context.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Apply a mutation to a pane.
    Mutation(Mutation),

    /// A monitor reached the end of its stream. Always the last event a
    /// monitor posts.
    Finished {
        /// Pane the monitor was writing to.
        pane: PaneId,
        /// Whether the pane's view should be closed.
        close_view: bool,
    },
}

impl UiEvent {
    /// The pane this event targets.
    pub const fn pane(&self) -> PaneId {
        match self {
            Self::Mutation(mutation) => mutation.pane,
            Self::Finished { pane, .. } => *pane,
        }
    }
}

/// A worker's handle for posting events to one pane.
///
/// Obtained from [`Dispatcher::sender`](crate::Dispatcher::sender); each
/// sender accounts for one monitor, so it is not `Clone`.
///
/// A sender dropped before posting [`UiEvent::Finished`] (a monitor that
/// never started, or one that panicked) posts it on drop, without closing
/// the view, so the pane's monitor count still reaches zero.
#[derive(Debug)]
pub struct UiSender {
    pane: PaneId,
    tx: Sender<UiEvent>,
    finished: Cell<bool>,
}

impl UiSender {
    pub(crate) const fn new(pane: PaneId, tx: Sender<UiEvent>) -> Self {
        Self {
            pane,
            tx,
            finished: Cell::new(false),
        }
    }

    /// The pane this sender posts to.
    #[inline]
    pub const fn pane(&self) -> PaneId {
        self.pane
    }

    /// Post an event. Returns `false` if the dispatcher is gone.
    pub fn post(&self, event: UiEvent) -> bool {
        if matches!(event, UiEvent::Finished { .. }) {
            self.finished.set(true);
        }
        self.tx.send(event).is_ok()
    }
}

impl Drop for UiSender {
    fn drop(&mut self) {
        if self.finished.get() {
            return;
        }
        tracing::debug!(pane = %self.pane, "sender dropped before finishing");
        let _ = self.tx.send(UiEvent::Finished {
            pane: self.pane,
            close_view: false,
        });
    }
}
