//! Actor Model: one worker per stream, one UI consumer.
//!
//! This module implements the dispatch layer using crossbeam channels:
//! - **Stream Monitor**: reads one stream on its own thread, posts mutations
//! - **Dispatcher**: single-threaded loop that owns the sinks and views
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐  UiEvent::Mutation   ┌──────────────┐
//! │ stdout monitor │ ───────────────────▶ │              │──▶ OutputSink
//! └────────────────┘                      │  Dispatcher  │──▶ ErrorLogCollector
//! ┌────────────────┐  UiEvent::Finished   │  (UI thread) │──▶ View
//! │ stderr monitor │ ───────────────────▶ │              │
//! └────────────────┘                      └──────────────┘
//! ```
//!
//! Each worker's events arrive in the order it posted them. A worker's
//! `Finished` event is always its last, so a view is closed only after the
//! final mutation and its notifications have been applied.

mod dispatcher;
mod messages;
mod monitor;

pub use dispatcher::{Dispatcher, Pane};
pub use messages::{Mutation, PaneId, SinkOp, UiEvent, UiSender};
pub use monitor::{MonitorHandle, MonitorReport, StreamMonitor};
