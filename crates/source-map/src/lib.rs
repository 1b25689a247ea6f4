//! Source spans and line/column lookup for react2ng.
//!
//! Every recognised construct (component declaration, state declaration,
//! handler, markup fragment) carries a [`Span`] into the original component
//! file so errors and warnings can point back at the JSX source.

use std::ops::Range;

/// A half-open byte range `[start, end)` in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a span from a byte range.
    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift the span right by `delta` bytes.
    ///
    /// Used when a sub-slice of a file was scanned on its own and the
    /// resulting spans must be expressed relative to the whole file.
    #[inline]
    pub const fn offset_by(self, delta: u32) -> Span {
        Span {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Slice the source text covered by this span.
    ///
    /// Returns an empty string when the span falls outside `source` or does
    /// not land on character boundaries.
    pub fn slice(self, source: &str) -> &str {
        source.get(self.to_range()).unwrap_or("")
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::from_range(range)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.to_range()
    }
}

/// Converts byte offsets into line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets of the start of each line.
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    /// Build the index for a source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Get the 0-indexed line and column for a byte offset.
    ///
    /// Offsets past the end of the text clamp to the end.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        LineCol {
            line: line as u32,
            col: offset - self.line_starts[line],
        }
    }
}

/// A 0-indexed line and column (byte offset within the line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Convert to 1-indexed for display.
    #[inline]
    pub const fn to_display(self) -> (u32, u32) {
        (self.line + 1, self.col + 1)
    }
}
