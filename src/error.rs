//! Error types for stream monitoring and process supervision.

use std::io;

/// Failure while turning a byte stream into lines.
///
/// Both variants are terminal for a monitor: the session ends exactly like a
/// clean end-of-stream, the error is logged and kept in the
/// [`MonitorReport`](crate::actor::MonitorReport).
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The stream contained a malformed or truncated UTF-8 sequence.
    #[error("invalid UTF-8 sequence at byte offset {offset}")]
    Decode {
        /// Offset of the first byte of the offending sequence.
        offset: u64,
    },

    /// The underlying reader failed.
    #[error("failed to read stream: {0}")]
    Read(#[from] io::Error),
}

impl StreamError {
    /// Returns true for decode failures.
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Failure while starting or waiting on a monitored child process.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The command could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// Program name as given to the command builder.
        command: String,
        /// The OS error.
        #[source]
        source: io::Error,
    },

    /// A stream that should have been piped was not.
    #[error("child process has no {stream} pipe")]
    MissingPipe {
        /// `"stdout"` or `"stderr"`.
        stream: &'static str,
    },

    /// Waiting on or signalling the child failed.
    #[error("failed to wait for child process: {0}")]
    Wait(#[source] io::Error),

    /// A monitor thread panicked before producing its report.
    #[error("monitor `{stream}` panicked")]
    MonitorPanicked {
        /// Label of the monitor.
        stream: String,
    },
}
