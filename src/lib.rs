//! # Procwatch
//!
//! Turns the output streams of external processes into display lines.
//!
//! Command-line tools mix three line-ending conventions: `\n`, `\r\n`, and a
//! bare `\r` that means "overwrite this line", which is how progress bars
//! redraw in place. Procwatch splits a byte stream on all three and turns
//! each line into an append or a replace-last on an output sink.
//!
//! ## Core Concepts
//!
//! - **Line splitting**: one character of lookahead, carried across reads,
//!   tells `\r`, `\r\n` and `\n` apart
//! - **Append vs. replace**: finished lines append, `\r` lines overwrite the
//!   most recent entry
//! - **Actor model**: one worker thread per stream, one UI-owned dispatcher
//!   applying mutations strictly in order
//!
//! ## Example
//!
//! ```rust,no_run
//! use procwatch::{Dispatcher, LineBuffer, MonitorConfig, MonitoredProcess, StreamTarget};
//! use std::process::Command;
//! use std::time::Duration;
//!
//! let mut dispatcher: Dispatcher<LineBuffer> = Dispatcher::new();
//! let out = dispatcher.add_buffer_pane(None);
//! let err = dispatcher.add_buffer_pane(None);
//!
//! let process = MonitoredProcess::spawn(
//!     Command::new("cargo").arg("build"),
//!     StreamTarget::new(dispatcher.sender(out), MonitorConfig::default()),
//!     StreamTarget::new(dispatcher.sender(err), MonitorConfig::default()),
//! )?;
//!
//! dispatcher.run_until_finished(Duration::from_secs(600));
//! let (status, _, _) = process.finish()?;
//! println!("{status}: {} lines", dispatcher.sink(err).map_or(0, |s| s.iter().count()));
//! # Ok::<(), procwatch::ProcessError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod error;
pub mod process;
pub mod sink;
pub mod split;
pub mod terminal;

// Re-exports for convenience
pub use actor::{
    Dispatcher, MonitorHandle, MonitorReport, Mutation, Pane, PaneId, SinkOp, StreamMonitor,
    UiEvent, UiSender,
};
pub use config::{DispatcherConfig, MonitorConfig};
pub use error::{ProcessError, StreamError};
pub use process::{MonitoredProcess, StreamTarget};
pub use sink::{ErrorLog, ErrorLogCollector, LineBuffer, NoView, OutputSink, View};
pub use split::{split_line, LineEnding, LineSplitter, LogicalLine, Lookahead, Utf8Chars};
pub use terminal::{ConsoleSink, ConsoleView};
