//! The streaming line splitter.
//!
//! A single character of lookahead is enough to tell the three line-ending
//! conventions apart: after a `\r` we peek at the next character, and if it
//! is not `\n` we hold on to it for the next line. That held character must
//! survive between calls, otherwise a `\r\n` pair split across two reads
//! would come out as a partial line followed by an empty one.

use super::decoder::Utf8Chars;
use super::line::{LineEnding, LogicalLine};
use crate::error::StreamError;
use std::io::Read;
use std::iter::FusedIterator;

/// One character read past the end of the previous line.
///
/// Either empty, or holding exactly one decoded character that was consumed
/// from the stream but not yet emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookahead(Option<char>);

impl Lookahead {
    /// An empty slot.
    pub const fn empty() -> Self {
        Self(None)
    }

    /// The held character, if any.
    #[inline]
    pub const fn peek(&self) -> Option<char> {
        self.0
    }

    /// Whether the slot is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Remove and return the held character.
    #[inline]
    pub fn take(&mut self) -> Option<char> {
        self.0.take()
    }

    #[inline]
    fn hold(&mut self, c: char) {
        debug_assert!(self.0.is_none(), "lookahead already holds a character");
        self.0 = Some(c);
    }
}

/// Read the next logical line from `chars`, threading `lookahead` between calls.
///
/// Returns `Ok(None)` once the stream is exhausted and nothing is pending.
/// Text left over at end of stream comes out as an [`LineEnding::Eof`] line
/// first; the following call returns `Ok(None)`.
pub fn split_line<R: Read>(
    chars: &mut Utf8Chars<R>,
    lookahead: &mut Lookahead,
) -> Result<Option<LogicalLine>, StreamError> {
    let mut text = String::new();

    loop {
        // The held character goes through the same classification as a fresh
        // one so a pending '\r' still acts as a terminator.
        let next = match lookahead.take() {
            Some(c) => Some(c),
            None => chars.next_char()?,
        };

        match next {
            Some('\r') => {
                let ending = match chars.next_char()? {
                    Some('\n') => LineEnding::CrLf,
                    Some(c) => {
                        lookahead.hold(c);
                        LineEnding::Cr
                    }
                    None => LineEnding::Cr,
                };
                return Ok(Some(LogicalLine::new(text, ending)));
            }
            Some('\n') => return Ok(Some(LogicalLine::new(text, LineEnding::Lf))),
            Some(c) => text.push(c),
            None if text.is_empty() => return Ok(None),
            None => return Ok(Some(LogicalLine::new(text, LineEnding::Eof))),
        }
    }
}

/// Splits a byte stream into [`LogicalLine`]s.
///
/// Owns the decoder and the lookahead for one stream. After end of stream or
/// the first error the splitter is finished and keeps returning `Ok(None)`.
///
/// # Example
///
/// ```
/// use procwatch::{LineEnding, LineSplitter};
///
/// let mut splitter = LineSplitter::from_bytes(b"50%\r100%\n");
/// let first = splitter.next_line().unwrap().unwrap();
/// assert_eq!((first.text.as_str(), first.ending), ("50%", LineEnding::Cr));
/// let second = splitter.next_line().unwrap().unwrap();
/// assert_eq!((second.text.as_str(), second.ending), ("100%", LineEnding::Lf));
/// assert!(splitter.next_line().unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct LineSplitter<R> {
    chars: Utf8Chars<R>,
    lookahead: Lookahead,
    finished: bool,
}

impl<R: Read> LineSplitter<R> {
    /// Create a splitter over a reader.
    pub fn new(reader: R) -> Self {
        Self::from_chars(Utf8Chars::new(reader))
    }

    /// Create a splitter over an existing decoder.
    pub const fn from_chars(chars: Utf8Chars<R>) -> Self {
        Self {
            chars,
            lookahead: Lookahead::empty(),
            finished: false,
        }
    }

    /// Produce the next line, `Ok(None)` at end of stream.
    ///
    /// Errors are not retried: the first one ends the session.
    pub fn next_line(&mut self) -> Result<Option<LogicalLine>, StreamError> {
        if self.finished {
            return Ok(None);
        }
        let result = split_line(&mut self.chars, &mut self.lookahead);
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    /// The current lookahead state.
    #[inline]
    pub const fn lookahead(&self) -> Lookahead {
        self.lookahead
    }

    /// Bytes consumed from the underlying stream.
    #[inline]
    pub const fn bytes_read(&self) -> u64 {
        self.chars.offset()
    }

    /// Whether end of stream (or an error) has been reached.
    #[inline]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<'a> LineSplitter<&'a [u8]> {
    /// Create a splitter over an in-memory byte slice.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R: Read> Iterator for LineSplitter<R> {
    type Item = Result<LogicalLine, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

impl<R: Read> FusedIterator for LineSplitter<R> {}
