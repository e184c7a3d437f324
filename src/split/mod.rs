//! Line splitting: bytes in, tagged logical lines out.
//!
//! This module contains:
//! - [`Utf8Chars`]: incremental UTF-8 decoder over any reader
//! - [`LineSplitter`]: the stateful `\n` / `\r\n` / `\r` splitter
//! - [`Lookahead`]: the one character of state carried between lines
//! - [`LogicalLine`] and [`LineEnding`]: what the splitter produces

mod decoder;
mod line;
mod splitter;
#[cfg(test)]
pub(crate) mod testing;

pub use decoder::Utf8Chars;
pub use line::{LineEnding, LogicalLine};
pub use splitter::{split_line, LineSplitter, Lookahead};
