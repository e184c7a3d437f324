use procwatch::{
    Dispatcher, ErrorLog, LineBuffer, MonitorConfig, OutputSink, PaneId, SinkOp, StreamError,
    StreamMonitor, View,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Sink that keeps the lines and a log of every operation with the size
/// after it.
#[derive(Debug, Default)]
struct RecordingSink {
    lines: LineBuffer,
    ops: Vec<(SinkOp, String, usize)>,
}

impl OutputSink for RecordingSink {
    fn append(&mut self, text: &str) {
        self.lines.append(text);
        self.ops.push((SinkOp::Append, text.to_owned(), self.lines.len()));
    }

    fn replace_last(&mut self, text: &str) {
        self.lines.replace_last(text);
        self.ops.push((SinkOp::ReplaceLast, text.to_owned(), self.lines.len()));
    }

    fn len(&self) -> usize {
        self.lines.len()
    }
}

/// View that logs into a buffer shared with the test.
struct LoggingView {
    log: Rc<RefCell<Vec<String>>>,
}

impl View for LoggingView {
    fn request_scroll_to(&mut self, index: usize) {
        self.log.borrow_mut().push(format!("scroll {index}"));
    }

    fn close(&mut self) {
        self.log.borrow_mut().push("close".to_owned());
    }
}

/// One chunk per `read` call.
struct ChunkedReader {
    chunks: VecDeque<Vec<u8>>,
}

impl ChunkedReader {
    fn new(chunks: &[&[u8]]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.chunks.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

/// A finished single-pane run.
struct Run {
    dispatcher: Dispatcher<RecordingSink, LoggingView>,
    pane: PaneId,
    view_log: Rc<RefCell<Vec<String>>>,
}

impl Run {
    fn sink(&self) -> &RecordingSink {
        self.dispatcher.sink(self.pane).unwrap()
    }

    fn ops(&self) -> Vec<(SinkOp, String, usize)> {
        self.sink().ops.clone()
    }

    fn view_log(&self) -> Vec<String> {
        self.view_log.borrow().clone()
    }
}

fn run_through<R: Read + Send + 'static>(reader: R, config: MonitorConfig) -> Run {
    let view_log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = Dispatcher::new();
    let pane = dispatcher.add_pane(
        RecordingSink::default(),
        Some(LoggingView {
            log: view_log.clone(),
        }),
    );
    StreamMonitor::new(reader, dispatcher.sender(pane), config)
        .with_label("test")
        .spawn();
    assert!(dispatcher.run_until_finished(Duration::from_secs(5)));
    Run {
        dispatcher,
        pane,
        view_log,
    }
}

#[test]
fn progress_redraws_replace_the_last_entry() {
    let run = run_through(
        &b"progress: 10%\rprogress: 50%\rprogress: 100%\n"[..],
        MonitorConfig::default(),
    );

    assert_eq!(
        run.ops(),
        vec![
            (SinkOp::ReplaceLast, "progress: 10%".to_owned(), 1),
            (SinkOp::ReplaceLast, "progress: 50%".to_owned(), 1),
            (SinkOp::Append, "progress: 100%".to_owned(), 2),
        ]
    );
    assert_eq!(run.sink().lines.last(), Some("progress: 100%"));
}

#[test]
fn progress_after_a_heading_overwrites_the_heading() {
    let run = run_through(&b"Compiling\n 10%\r 50%\r100%\r"[..], MonitorConfig::default());

    // A bare '\r' line always targets the current last entry
    assert_eq!(
        run.ops(),
        vec![
            (SinkOp::Append, "Compiling".to_owned(), 1),
            (SinkOp::ReplaceLast, " 10%".to_owned(), 1),
            (SinkOp::ReplaceLast, " 50%".to_owned(), 1),
            (SinkOp::ReplaceLast, "100%".to_owned(), 1),
        ]
    );
    assert_eq!(run.sink().lines.iter().collect::<Vec<_>>(), ["100%"]);
}

#[test]
fn mixed_endings_map_to_append_and_replace() {
    let run = run_through(&b"a\nb\r\nc\rd"[..], MonitorConfig::default());

    let kinds: Vec<_> = run.ops().into_iter().map(|(op, text, _)| (op, text)).collect();
    assert_eq!(
        kinds,
        vec![
            (SinkOp::Append, "a".to_owned()),
            (SinkOp::Append, "b".to_owned()),
            (SinkOp::ReplaceLast, "c".to_owned()),
            (SinkOp::ReplaceLast, "d".to_owned()),
        ]
    );
    assert_eq!(run.sink().lines.iter().collect::<Vec<_>>(), ["a", "d"]);
}

#[test]
fn blank_lines_produce_no_mutations() {
    let config = MonitorConfig::default().with_auto_scroll(true);
    let run = run_through(&b"\n\n\r\n"[..], config);

    assert!(run.ops().is_empty());
    assert!(run.view_log().is_empty());
    assert!(run.dispatcher.is_finished(run.pane));
}

#[test]
fn trailing_text_is_the_final_replace() {
    let run = run_through(&b"first\ntail"[..], MonitorConfig::default());
    assert_eq!(
        run.ops().last(),
        Some(&(SinkOp::ReplaceLast, "tail".to_owned(), 1))
    );
}

#[test]
fn crlf_split_across_reads_is_one_terminator() {
    let reader = ChunkedReader::new(&[b"line one\r", b"\nline two\r", b"\n"]);
    let run = run_through(reader, MonitorConfig::default());

    assert_eq!(
        run.ops(),
        vec![
            (SinkOp::Append, "line one".to_owned(), 1),
            (SinkOp::Append, "line two".to_owned(), 2),
        ]
    );
}

#[test]
fn auto_close_fires_once_after_last_notification() {
    let config = MonitorConfig::default()
        .with_auto_close(true)
        .with_auto_scroll(true);
    let run = run_through(&b"one\ntwo\rthree\n"[..], config);

    assert_eq!(run.view_log(), ["scroll 0", "scroll 0", "scroll 1", "close"]);
    let pane = run.dispatcher.pane(run.pane).unwrap();
    assert!(pane.is_closed());
    assert!(pane.view().is_none());
}

#[test]
fn without_auto_close_the_view_stays_open() {
    let run = run_through(&b"only\n"[..], MonitorConfig::default());

    assert!(run.view_log().is_empty());
    assert!(run.dispatcher.pane(run.pane).unwrap().view().is_some());
    assert!(run.dispatcher.is_finished(run.pane));
}

#[test]
fn error_log_sees_every_non_empty_line() {
    let collector = Arc::new(ErrorLog::new("locate"));
    let config = MonitorConfig::default().with_error_log(collector.clone());
    run_through(&b"warn 1\n\nstep\rwarn 2\r\n"[..], config);

    assert_eq!(collector.messages(), ["warn 1", "step", "warn 2"]);
}

#[test]
fn decode_error_ends_session_like_end_of_stream() {
    let config = MonitorConfig::default().with_auto_close(true);
    let run = run_through(&b"kept\nbad \xC3\x28 line\nnever\n"[..], config);

    let texts: Vec<_> = run.ops().into_iter().map(|(_, text, _)| text).collect();
    assert_eq!(texts, ["kept"]);
    assert_eq!(run.view_log(), ["close"]);
}

#[test]
fn decode_error_is_visible_in_report() {
    let mut dispatcher: Dispatcher<LineBuffer> = Dispatcher::new();
    let pane = dispatcher.add_buffer_pane(None);
    let input: &[u8] = b"ok\n\xF5";
    let report = StreamMonitor::new(input, dispatcher.sender(pane), MonitorConfig::default()).run();

    assert!(matches!(report.error, Some(StreamError::Decode { offset: 3 })));
    assert_eq!(report.appended, 1);
    assert_eq!(dispatcher.drain(), 2);
    assert!(dispatcher.is_finished(pane));
}

#[test]
fn many_lines_arrive_in_order() {
    let input: String = (0..2_000).map(|i| format!("line {i}\n")).collect();
    let run = run_through(io::Cursor::new(input.into_bytes()), MonitorConfig::default());

    let ops = run.ops();
    assert_eq!(ops.len(), 2_000);
    for (i, (op, text, len)) in ops.iter().enumerate() {
        assert_eq!(*op, SinkOp::Append);
        assert_eq!(text, &format!("line {i}"));
        assert_eq!(*len, i + 1);
    }
}

#[test]
fn two_monitors_share_one_pane() {
    let view_log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = Dispatcher::new();
    let pane = dispatcher.add_pane(
        RecordingSink::default(),
        Some(LoggingView {
            log: view_log.clone(),
        }),
    );
    let config = MonitorConfig::default().with_auto_close(true);

    let a = StreamMonitor::new(&b"a1\na2\n"[..], dispatcher.sender(pane), config.clone()).spawn();
    let b = StreamMonitor::new(&b"b1\nb2\n"[..], dispatcher.sender(pane), config).spawn();

    assert!(dispatcher.run_until_finished(Duration::from_secs(5)));
    assert!(a.join().unwrap().is_clean());
    assert!(b.join().unwrap().is_clean());

    let sink = dispatcher.sink(pane).unwrap();
    let lines: Vec<_> = sink.lines.iter().collect();
    assert_eq!(lines.len(), 4);
    // Each stream keeps its own order
    let pos = |s: &str| lines.iter().position(|l| *l == s).unwrap();
    assert!(pos("a1") < pos("a2"));
    assert!(pos("b1") < pos("b2"));

    // Closed once, after both streams
    assert_eq!(*view_log.borrow(), ["close"]);
    assert!(dispatcher.pane(pane).unwrap().is_closed());
}

#[test]
fn replaying_a_stream_gives_identical_results() {
    let input: &[u8] = b"x\r\ny\rz\n\nw";
    let first = run_through(input, MonitorConfig::default()).ops();
    let second = run_through(input, MonitorConfig::default()).ops();
    assert_eq!(first, second);
}
