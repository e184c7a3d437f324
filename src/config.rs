//! Construction-time configuration for monitors and the dispatcher.

use crate::sink::{ErrorLogCollector, DEFAULT_MAX_LINES};
use std::fmt;
use std::sync::Arc;

/// Configuration for a [`StreamMonitor`](crate::StreamMonitor).
#[derive(Clone, Default)]
pub struct MonitorConfig {
    /// Close the pane's view once the stream finishes.
    pub auto_close_view: bool,
    /// Ask the view to scroll to the last entry after every mutation.
    pub auto_scroll: bool,
    /// Collector that receives every non-empty line.
    pub error_log: Option<Arc<dyn ErrorLogCollector>>,
}

impl MonitorConfig {
    /// Set whether the view closes on completion.
    #[must_use]
    pub fn with_auto_close(mut self, auto_close_view: bool) -> Self {
        self.auto_close_view = auto_close_view;
        self
    }

    /// Set whether the view follows new output.
    #[must_use]
    pub fn with_auto_scroll(mut self, auto_scroll: bool) -> Self {
        self.auto_scroll = auto_scroll;
        self
    }

    /// Attach an error-log collector.
    #[must_use]
    pub fn with_error_log(mut self, collector: Arc<dyn ErrorLogCollector>) -> Self {
        self.error_log = Some(collector);
        self
    }
}

impl fmt::Debug for MonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorConfig")
            .field("auto_close_view", &self.auto_close_view)
            .field("auto_scroll", &self.auto_scroll)
            .field("error_log", &self.error_log.is_some())
            .finish()
    }
}

/// Configuration for a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Capacity of the event queue. `None` means unbounded, so workers never
    /// wait on the UI.
    pub queue_capacity: Option<usize>,
    /// Scrollback limit used by [`Dispatcher::add_buffer_pane`](crate::Dispatcher::add_buffer_pane).
    pub max_lines: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: None,
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}
