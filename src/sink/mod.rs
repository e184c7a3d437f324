//! Output sinks, views and error-log collectors.
//!
//! These are the UI-side collaborators the [`Dispatcher`](crate::Dispatcher)
//! drives. [`LineBuffer`] and [`ErrorLog`] are in-memory implementations;
//! terminal-backed ones live in [`crate::terminal`].

mod error_log;
mod line_buffer;
mod traits;

pub use error_log::ErrorLog;
pub use line_buffer::{LineBuffer, DEFAULT_MAX_LINES};
pub use traits::{ErrorLogCollector, NoView, OutputSink, View};
