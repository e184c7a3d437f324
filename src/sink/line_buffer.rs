//! Line buffer: bounded scrollback of display lines.
//!
//! The in-memory [`OutputSink`]. Old lines fall off the front once the
//! buffer reaches capacity; append and replace-last are O(1).

use super::OutputSink;
use std::collections::VecDeque;

/// Default number of lines retained.
pub const DEFAULT_MAX_LINES: usize = 10_000;

/// Bounded list of display lines.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    /// Lines stored in the buffer, oldest first.
    lines: VecDeque<String>,
    /// Maximum number of lines to retain.
    max_lines: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl LineBuffer {
    /// Create a buffer that keeps at most `max_lines` lines.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(max_lines: usize) -> Self {
        let max_lines = max_lines.max(1);
        Self {
            lines: VecDeque::with_capacity(max_lines.min(1024)),
            max_lines,
        }
    }

    /// Maximum number of lines retained.
    pub const fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Get a line by index from the top of the buffer.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// The most recent line.
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    /// Iterate over all lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl OutputSink for LineBuffer {
    fn append(&mut self, text: &str) {
        // Trim excess lines if at capacity
        while self.lines.len() >= self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(text.to_owned());
    }

    fn replace_last(&mut self, text: &str) {
        match self.lines.back_mut() {
            Some(last) => text.clone_into(last),
            None => self.lines.push_back(text.to_owned()),
        }
    }

    fn len(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer_new() {
        let buf = LineBuffer::new(100);
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert!(buf.last().is_none());
    }

    #[test]
    fn test_line_buffer_append_and_replace() {
        let mut buf = LineBuffer::new(100);
        buf.append("compiling");
        buf.append("10%");
        buf.replace_last("55%");
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.get(0), Some("compiling"));
        assert_eq!(buf.last(), Some("55%"));
    }

    #[test]
    fn test_replace_last_on_empty_appends() {
        let mut buf = LineBuffer::new(100);
        buf.replace_last("first");
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.last(), Some("first"));
    }

    #[test]
    fn test_line_buffer_capacity() {
        let mut buf = LineBuffer::new(3);
        for i in 1..=4 {
            buf.append(&format!("Line {i}"));
        }

        assert_eq!(buf.len(), 3);
        // Line 1 should have been discarded
        assert_eq!(buf.get(0), Some("Line 2"));
        assert_eq!(buf.last(), Some("Line 4"));
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let mut buf = LineBuffer::new(0);
        buf.append("a");
        buf.append("b");
        assert_eq!(buf.iter().collect::<Vec<_>>(), ["b"]);
    }
}
