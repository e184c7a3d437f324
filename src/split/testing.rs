//! Readers with controlled read boundaries for unit tests.

use std::collections::VecDeque;
use std::io::{self, Read};

/// Hands out one chunk per `read` call, then EOF (or an error).
pub struct ChunkedReader {
    chunks: VecDeque<Vec<u8>>,
    fail_at_end: bool,
}

impl ChunkedReader {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into(),
            fail_at_end: false,
        }
    }

    /// Return `BrokenPipe` instead of EOF once the chunks run out.
    pub fn fail_after(mut self) -> Self {
        self.fail_at_end = true;
        self
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            if self.fail_at_end {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"));
            }
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
