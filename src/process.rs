//! Spawn a child process with a monitor on each output stream.
//!
//! The caller owns the panes: stdout and stderr each get their own
//! [`UiSender`] and [`MonitorConfig`], and may target the same pane or
//! different ones.

use crate::actor::{MonitorHandle, MonitorReport, StreamMonitor, UiSender};
use crate::config::MonitorConfig;
use crate::error::ProcessError;
use std::process::{Child, Command, ExitStatus, Stdio};

/// Where one output stream of the child goes.
#[derive(Debug)]
pub struct StreamTarget {
    /// Sender for the pane receiving this stream.
    pub ui: UiSender,
    /// Monitor configuration for this stream.
    pub config: MonitorConfig,
}

impl StreamTarget {
    /// Target a pane with the given configuration.
    pub const fn new(ui: UiSender, config: MonitorConfig) -> Self {
        Self { ui, config }
    }
}

/// A running child process and the monitors reading its output.
#[derive(Debug)]
pub struct MonitoredProcess {
    child: Child,
    stdout: MonitorHandle,
    stderr: MonitorHandle,
}

impl MonitoredProcess {
    /// Spawn `command` with stdout and stderr piped into monitors.
    ///
    /// Stdin is left as configured on `command`.
    pub fn spawn(
        command: &mut Command,
        stdout: StreamTarget,
        stderr: StreamTarget,
    ) -> Result<Self, ProcessError> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                command: program.clone(),
                source,
            })?;

        let out = child.stdout.take().ok_or(ProcessError::MissingPipe { stream: "stdout" })?;
        let err = child.stderr.take().ok_or(ProcessError::MissingPipe { stream: "stderr" })?;

        tracing::debug!(command = %program, pid = child.id(), "spawned monitored process");

        let stdout = StreamMonitor::new(out, stdout.ui, stdout.config)
            .with_label(format!("{program}-stdout"))
            .spawn();
        let stderr = StreamMonitor::new(err, stderr.ui, stderr.config)
            .with_label(format!("{program}-stderr"))
            .spawn();

        Ok(Self {
            child,
            stdout,
            stderr,
        })
    }

    /// OS process id.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Kill the child. Its streams close, which ends both monitors.
    pub fn kill(&mut self) -> Result<(), ProcessError> {
        self.child.kill().map_err(ProcessError::Wait)
    }

    /// Check for exit without blocking.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>, ProcessError> {
        self.child.try_wait().map_err(ProcessError::Wait)
    }

    /// Wait for the child to exit.
    pub fn wait(&mut self) -> Result<ExitStatus, ProcessError> {
        self.child.wait().map_err(ProcessError::Wait)
    }

    /// Wait for the child and both monitors, returning the exit status and
    /// the `(stdout, stderr)` reports.
    pub fn finish(mut self) -> Result<(ExitStatus, MonitorReport, MonitorReport), ProcessError> {
        let status = self.wait()?;
        let stdout = join_report(self.stdout)?;
        let stderr = join_report(self.stderr)?;
        Ok((status, stdout, stderr))
    }
}

fn join_report(handle: MonitorHandle) -> Result<MonitorReport, ProcessError> {
    let stream = handle.label().to_owned();
    handle.join().map_err(|_| {
        tracing::warn!(%stream, "monitor thread panicked");
        ProcessError::MonitorPanicked { stream }
    })
}
