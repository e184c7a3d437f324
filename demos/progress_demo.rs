//! Progress Demo: Simulates a download tool that redraws a progress bar.
//!
//! The fake tool writes a heading, then a bar terminated by bare `\r` many
//! times per second, then a summary line. Each redraw replaces the most
//! recent entry, so the console pane shows the bar updating on one line.

use procwatch::{ConsoleSink, ConsoleView, Dispatcher, MonitorConfig, OutputSink, StreamMonitor};
use std::collections::VecDeque;
use std::io::{self, Read};
use std::thread;
use std::time::Duration;

const BAR_WIDTH: usize = 40;

/// Reader that hands out one chunk per read, pausing before each.
struct SlowReader {
    chunks: VecDeque<Vec<u8>>,
    delay: Duration,
}

impl Read for SlowReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        thread::sleep(self.delay);
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.chunks.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

fn bar(percent: usize) -> String {
    let filled = BAR_WIDTH * percent / 100;
    format!(
        "[{}{}] {percent:>3}%",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled)
    )
}

fn fake_download(file: &str) -> Vec<Vec<u8>> {
    let mut chunks = vec![format!("Fetching {file}\n").into_bytes()];
    chunks.extend((0..=100).step_by(5).map(|p| format!("{}\r", bar(p)).into_bytes()));
    // Windows tools end the bar with \r\n; it must not leave a blank line
    chunks.push(format!("{} done\r\n", bar(100)).into_bytes());
    chunks
}

fn main() {
    println!("Procwatch Progress Demo");
    println!("=======================");

    let mut dispatcher = Dispatcher::new();
    let pane = dispatcher.add_pane(
        ConsoleSink::for_terminal(io::stdout()),
        Some(ConsoleView::new(io::stdout(), "download")),
    );

    let chunks = ["index.json", "pkg-1.0.tar.gz"]
        .iter()
        .flat_map(|file| fake_download(file))
        .collect();
    let reader = SlowReader {
        chunks,
        delay: Duration::from_millis(60),
    };

    let config = MonitorConfig::default().with_auto_close(true);
    let handle = StreamMonitor::new(reader, dispatcher.sender(pane), config)
        .with_label("download")
        .spawn();

    dispatcher.run_until_finished(Duration::from_secs(30));

    let lines = dispatcher.sink(pane).map_or(0, OutputSink::len);
    match handle.join() {
        Ok(report) => println!(
            "{lines} lines kept from {} appended and {} replaced",
            report.appended, report.replaced
        ),
        Err(_) => eprintln!("monitor panicked"),
    }
}
