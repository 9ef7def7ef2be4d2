//! Source spans and locations

use miette::SourceSpan;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Offset of the first byte
    pub start: u32,
    /// Offset one past the last byte
    pub end: u32,
}

impl Span {
    /// Creates a span from byte offsets
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a span covering `len` bytes starting at `start`
    #[must_use]
    pub fn at(start: usize, len: usize) -> Self {
        Self::new(start as u32, (start + len) as u32)
    }

    /// Byte range of the span
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Length in bytes
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len() as usize).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_at() {
        let span = Span::at(3, 4);
        assert_eq!(span, Span::new(3, 7));
        assert_eq!(span.range(), 3..7);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_to() {
        let joined = Span::new(4, 6).to(Span::new(1, 2));
        assert_eq!(joined, Span::new(1, 6));
    }

    #[test]
    fn test_source_span_conversion() {
        let source: SourceSpan = Span::new(2, 5).into();
        assert_eq!(source.offset(), 2);
        assert_eq!(source.len(), 3);
    }
}
