// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Byte ranges into the source buffer.
//!
//! Tokens, AST nodes, and diagnostics all carry a `Span`: the byte offset of
//! the first byte of a construct plus its length. Offsets are `u32`;
//! buffers larger than 4 GiB are not supported.

use std::ops::Range;

/// A contiguous byte range in the source buffer, stored as offset + length.
///
/// # Examples
///
/// ```
/// use skarn_core::source_analysis::Span;
///
/// let span = Span::new(4, 7);
/// assert_eq!(span.start(), 4);
/// assert_eq!(span.len(), 3);
/// assert_eq!(span.merge(Span::new(0, 2)), Span::new(0, 7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    start: u32,
    len: u32,
}

impl Span {
    /// Creates a span from start and end byte offsets (end exclusive).
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    /// Offset of the first byte.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Offset one past the last byte.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.start + self.len
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.len
    }

    /// Returns `true` for a zero-width span.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// The smallest span covering both `self` and `other`, in either order.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Self {
            start,
            len: end - start,
        }
    }

    /// The span as a `Range<usize>`, ready to index the source text.
    #[must_use]
    pub fn as_range(self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        // Offsets saturate at u32::MAX; 4 GiB buffers are out of scope.
        let start = u32::try_from(range.start).unwrap_or(u32::MAX);
        let end = u32::try_from(range.end).unwrap_or(u32::MAX);
        Self::new(start, end)
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len as usize).into()
    }
}
