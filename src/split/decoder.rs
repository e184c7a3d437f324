//! Incremental UTF-8 decoder over any [`Read`].
//!
//! Bytes are pulled on demand, so a multi-byte character (or a `\r\n`
//! pair) that straddles two underlying reads decodes exactly like one that
//! arrived in a single read.

use crate::error::StreamError;
use std::io::{self, BufRead, BufReader, Read};

/// Default read buffer size.
const DEFAULT_CAPACITY: usize = 8 * 1024;

/// Decodes a byte stream into `char`s one at a time.
#[derive(Debug)]
pub struct Utf8Chars<R> {
    reader: BufReader<R>,
    /// Bytes consumed so far.
    offset: u64,
}

impl<R: Read> Utf8Chars<R> {
    /// Wrap a reader with the default buffer size.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, reader)
    }

    /// Wrap a reader with a custom buffer size.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity.max(1), reader),
            offset: 0,
        }
    }

    /// Number of bytes consumed from the stream.
    #[inline]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Decode the next character.
    ///
    /// Returns `Ok(None)` at end of stream. A malformed sequence, or one cut
    /// short by end of stream, is a [`StreamError::Decode`] carrying the
    /// offset of its first byte.
    pub fn next_char(&mut self) -> Result<Option<char>, StreamError> {
        let start = self.offset;
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };

        let width = sequence_width(lead);
        match width {
            0 => return Err(StreamError::Decode { offset: start }),
            1 => return Ok(Some(char::from(lead))),
            _ => {}
        }

        let mut bytes = [lead, 0, 0, 0];
        for slot in &mut bytes[1..width] {
            match self.next_byte()? {
                Some(byte) if byte & 0xC0 == 0x80 => *slot = byte,
                _ => return Err(StreamError::Decode { offset: start }),
            }
        }

        // from_utf8 rejects overlong forms and surrogates the width table lets through
        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(StreamError::Decode { offset: start })
    }

    fn next_byte(&mut self) -> Result<Option<u8>, StreamError> {
        loop {
            let byte = match self.reader.fill_buf() {
                Ok(buf) => buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamError::Read(e)),
            };
            if byte.is_some() {
                self.reader.consume(1);
                self.offset += 1;
            }
            return Ok(byte);
        }
    }
}

/// Length of the sequence introduced by `lead`, or 0 if it cannot start one.
const fn sequence_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}
