//! Watch Command: Run a program and follow its output like a terminal would.
//!
//! Both stdout and stderr feed one console pane. Progress bars that redraw
//! with `\r` update in place instead of scrolling.
//!
//! Usage: `cargo run --example watch_command -- curl -o /dev/null https://example.com`
//!
//! Set `RUST_LOG=procwatch=debug` to see monitor lifecycle on stderr.

use procwatch::{
    ConsoleSink, ConsoleView, Dispatcher, ErrorLog, MonitorConfig, MonitoredProcess, StreamTarget,
};
use std::io;
use std::process::{Command, ExitCode};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(program) = args.next() else {
        eprintln!("usage: watch_command <program> [args...]");
        return ExitCode::from(2);
    };

    let mut dispatcher: Dispatcher<_, _> = Dispatcher::new();
    let pane = dispatcher.add_pane(
        ConsoleSink::for_terminal(io::stdout()),
        Some(ConsoleView::new(io::stdout(), program.clone())),
    );

    let warnings = Arc::new(ErrorLog::new(program.clone()));
    let config = MonitorConfig::default()
        .with_auto_close(true)
        .with_auto_scroll(true);

    let process = match MonitoredProcess::spawn(
        Command::new(&program).args(args),
        StreamTarget::new(dispatcher.sender(pane), config.clone()),
        StreamTarget::new(dispatcher.sender(pane), config.with_error_log(warnings.clone())),
    ) {
        Ok(process) => process,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    while !dispatcher.run_until_finished(Duration::from_millis(250)) {
        tracing::trace!(pending = dispatcher.pending(), "still waiting on output");
    }

    match process.finish() {
        Ok((status, stdout, stderr)) => {
            eprintln!(
                "{program}: {status}, {} stdout lines, {} stderr lines ({} bytes)",
                stdout.lines,
                warnings.len(),
                stdout.bytes + stderr.bytes,
            );
            if status.success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
