//! Line index: sorted line-start offsets for O(log L) offset-to-line lookup.
//!
//! Built once per haystack, independent of dispatch, and consulted by the
//! reporter after the match offsets come back.

use memchr::memchr_iter;

/// Strictly increasing line-start byte offsets. The first entry is always 0;
/// length = (number of `\n` bytes) + 1.
pub struct LineIndex {
    starts: Vec<u32>,
    haystack_len: u32,
}

/// A resolved line: 1-based number plus the byte span of the line text
/// (trailing newline excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub line_number: usize,
    pub start: usize,
    pub end: usize,
}

impl LineIndex {
    /// Scan the haystack once and record every line start.
    ///
    /// An empty haystack still has one (empty) line: `[0]`.
    pub fn build(haystack: &[u8]) -> Self {
        let mut starts = Vec::with_capacity(128);
        starts.push(0u32);
        for nl in memchr_iter(b'\n', haystack) {
            starts.push(nl as u32 + 1);
        }
        Self {
            starts,
            haystack_len: haystack.len() as u32,
        }
    }

    /// Number of lines in the haystack.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Resolve a byte offset to the line containing it.
    ///
    /// Upper-bound binary search: greatest k with starts[k] <= offset. A
    /// match spanning a newline is attributed to the line containing its
    /// START offset.
    pub fn locate(&self, offset: u32) -> LineSpan {
        debug_assert!(offset <= self.haystack_len);
        let k = self.starts.partition_point(|&s| s <= offset) - 1;
        let start = self.starts[k] as usize;
        let end = match self.starts.get(k + 1) {
            Some(&next_start) => next_start as usize - 1, // strip '\n'
            None => self.haystack_len as usize,
        };
        LineSpan {
            line_number: k + 1,
            start,
            end,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_haystack_single_line() {
        let idx = LineIndex::build(b"");
        assert_eq!(idx.line_count(), 1);
        assert_eq!(
            idx.locate(0),
            LineSpan { line_number: 1, start: 0, end: 0 }
        );
    }

    #[test]
    fn test_no_trailing_newline() {
        let idx = LineIndex::build(b"abc");
        assert_eq!(idx.line_count(), 1);
        assert_eq!(
            idx.locate(2),
            LineSpan { line_number: 1, start: 0, end: 3 },
            "last line without newline runs to end of haystack"
        );
    }

    #[test]
    fn test_multi_line_spans() {
        // offsets: foo=0..3 \n=3 bar=4..7 \n=7 foobar=8..14 \n=14
        let haystack = b"foo\nbar\nfoobar\n";
        let idx = LineIndex::build(haystack);
        assert_eq!(idx.line_count(), 4, "trailing newline opens a final empty line");

        assert_eq!(idx.locate(0), LineSpan { line_number: 1, start: 0, end: 3 });
        assert_eq!(idx.locate(5), LineSpan { line_number: 2, start: 4, end: 7 });
        assert_eq!(idx.locate(8), LineSpan { line_number: 3, start: 8, end: 14 });
        // First byte of a line belongs to that line, not the previous one.
        assert_eq!(idx.locate(4).line_number, 2);
    }

    #[test]
    fn test_line_text_excludes_newline() {
        let haystack = b"foo\nbar\n";
        let idx = LineIndex::build(haystack);
        let span = idx.locate(1);
        assert_eq!(&haystack[span.start..span.end], b"foo");
    }

    #[test]
    fn test_match_spanning_newline_attributed_to_start() {
        // "b\nc" starting at offset 1 crosses the line boundary.
        let haystack = b"ab\ncd";
        let idx = LineIndex::build(haystack);
        let span = idx.locate(1);
        assert_eq!(span.line_number, 1);
        assert_eq!(&haystack[span.start..span.end], b"ab");
    }

    #[test]
    fn test_consecutive_newlines() {
        let idx = LineIndex::build(b"\n\n");
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.locate(0), LineSpan { line_number: 1, start: 0, end: 0 });
        assert_eq!(idx.locate(1), LineSpan { line_number: 2, start: 1, end: 1 });
    }
}
