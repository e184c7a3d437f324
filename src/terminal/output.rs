//! `OutputBuffer`: Single-syscall output buffer for line redraws.

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

/// Pre-allocated buffer for building terminal output.
///
/// Each sink operation is accumulated here, then flushed in a single
/// `write()` so a progress redraw never shows a half-cleared line.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a few lines of output (1KB).
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Move to the start of a fresh line.
    ///
    /// Uses `\r\n` so it behaves the same with and without raw mode.
    #[inline]
    pub fn line_break(&mut self) {
        self.data.extend_from_slice(b"\r\n");
    }

    /// Return to column 0 and erase the current line.
    pub fn rewind_line(&mut self) -> io::Result<()> {
        queue!(self.data, MoveToColumn(0), Clear(ClearType::CurrentLine))
    }

    /// Write `text` dimmed.
    pub fn write_dim(&mut self, text: &str) -> io::Result<()> {
        queue!(
            self.data,
            SetAttribute(Attribute::Dim),
            Print(text),
            SetAttribute(Attribute::Reset)
        )
    }

    /// Flush to a writer in a single syscall and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails. The buffer is
    /// cleared either way.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        let result = writer.write_all(&self.data).and_then(|()| writer.flush());
        self.data.clear();
        result
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewind_line_sequence() {
        let mut out = OutputBuffer::new();
        out.rewind_line().unwrap();
        // CSI 1 G (column 1), CSI 2 K (erase line)
        assert_eq!(out.as_bytes(), b"\x1b[1G\x1b[2K");
    }

    #[test]
    fn test_flush_clears_buffer() {
        let mut out = OutputBuffer::new();
        out.write_str("hello");
        out.line_break();
        assert_eq!(out.len(), 7);

        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello\r\n");
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_dim_resets() {
        let mut out = OutputBuffer::new();
        out.write_dim("done").unwrap();
        let text = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        assert!(text.contains("done"));
        assert!(text.ends_with("\x1b[0m"));
    }
}
