//! Logical lines and their terminator classification.

use std::fmt;

/// How a logical line ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// A bare `\n`.
    Lf,
    /// A `\r\n` pair.
    CrLf,
    /// A bare `\r`: the line is meant to be overwritten in place.
    Cr,
    /// The stream ended before any terminator.
    Eof,
}

impl LineEnding {
    /// Whether this ending finishes a line (`\n` or `\r\n`).
    ///
    /// `Cr` and `Eof` lines are partial and overwrite the previous entry.
    #[inline]
    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Lf | Self::CrLf)
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lf => "\\n",
            Self::CrLf => "\\r\\n",
            Self::Cr => "\\r",
            Self::Eof => "<eof>",
        })
    }
}

/// One unit of output text plus how it ended.
///
/// The terminator is never part of `text`, and `text` never contains `\r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Line content with its terminator stripped.
    pub text: String,
    /// The terminator that ended the line.
    pub ending: LineEnding,
}

impl LogicalLine {
    /// Create a line.
    pub fn new(text: impl Into<String>, ending: LineEnding) -> Self {
        Self {
            text: text.into(),
            ending,
        }
    }

    /// Whether the line ended in `\n` or `\r\n`.
    #[inline]
    pub const fn is_terminated(&self) -> bool {
        self.ending.is_terminated()
    }

    /// Whether the line has no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Take the text out of the line.
    pub fn into_text(self) -> String {
        self.text
    }
}
