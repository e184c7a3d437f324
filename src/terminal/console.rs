//! Console front end: a sink and view that draw straight to a terminal.
//!
//! The cursor always stays on the most recent line, so replace-last is a
//! rewind-and-clear of the current line followed by the new text. This is
//! the same trick the monitored programs use with `\r`, replayed on our
//! side once their output has been split into lines.

use super::OutputBuffer;
use crate::sink::{LineBuffer, OutputSink, View, DEFAULT_MAX_LINES};
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

/// Longest prefix of `text` that fits in `width` terminal columns.
pub fn fit_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (index, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &text[..index];
        }
    }
    text
}

/// [`OutputSink`] that renders to a writer as well as keeping the lines.
pub struct ConsoleSink<W: Write> {
    writer: W,
    out: OutputBuffer,
    lines: LineBuffer,
    /// Columns available; lines are cut to fit when set.
    width: Option<usize>,
}

impl<W: Write> ConsoleSink<W> {
    /// Render to `writer` without truncating lines.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            out: OutputBuffer::new(),
            lines: LineBuffer::new(DEFAULT_MAX_LINES),
            width: None,
        }
    }

    /// Render to `writer`, cutting lines to the current terminal width.
    ///
    /// Falls back to no truncation when the size cannot be queried (for
    /// example when output is redirected).
    pub fn for_terminal(writer: W) -> Self {
        let width = crossterm::terminal::size().ok().map(|(cols, _)| usize::from(cols));
        Self {
            width,
            ..Self::new(writer)
        }
    }

    /// Cut lines to `width` columns.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Lines shown so far (untruncated).
    pub const fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    /// The underlying writer.
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the sink and return the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn visible<'a>(&self, text: &'a str) -> &'a str {
        match self.width {
            Some(width) => fit_width(text, width),
            None => text,
        }
    }

    fn render(&mut self, text: &str, rewind: bool) -> io::Result<()> {
        if rewind {
            self.out.rewind_line()?;
        } else if !self.lines.is_empty() {
            self.out.line_break();
        }
        let visible = self.visible(text);
        self.out.write_str(visible);
        self.out.flush_to(&mut self.writer)
    }

    fn report(result: io::Result<()>) {
        if let Err(error) = result {
            tracing::warn!(%error, "console write failed");
        }
    }
}

impl<W: Write> OutputSink for ConsoleSink<W> {
    fn append(&mut self, text: &str) {
        let result = self.render(text, false);
        Self::report(result);
        self.lines.append(text);
    }

    fn replace_last(&mut self, text: &str) {
        let rewind = !self.lines.is_empty();
        let result = self.render(text, rewind);
        Self::report(result);
        self.lines.replace_last(text);
    }

    fn len(&self) -> usize {
        self.lines.len()
    }
}

/// [`View`] for a console pane.
///
/// A console always shows its newest line, so scroll requests are only
/// recorded. Closing ends the current line and prints a dimmed marker.
pub struct ConsoleView<W: Write> {
    writer: W,
    title: String,
    last_scroll: Option<usize>,
    closed: bool,
}

impl<W: Write> ConsoleView<W> {
    /// Create a view that announces `title` when it closes.
    pub fn new(writer: W, title: impl Into<String>) -> Self {
        Self {
            writer,
            title: title.into(),
            last_scroll: None,
            closed: false,
        }
    }

    /// The most recent scroll target.
    pub const fn last_scroll(&self) -> Option<usize> {
        self.last_scroll
    }

    /// Whether the view has been closed.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn write_footer(&mut self) -> io::Result<()> {
        let mut out = OutputBuffer::new();
        out.line_break();
        out.write_dim(&format!("[{} finished]", self.title))?;
        out.line_break();
        out.flush_to(&mut self.writer)
    }
}

impl<W: Write> View for ConsoleView<W> {
    fn request_scroll_to(&mut self, index: usize) {
        self.last_scroll = Some(index);
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(error) = self.write_footer() {
            tracing::warn!(%error, title = %self.title, "failed to close console view");
        }
    }
}
