//! Positions, spans, and edits
//!
//! Columns are byte offsets into a line's UTF-8 text. Spans never cross a
//! line boundary: every replacement this engine produces stays within the
//! line the token was found on.

/// A zero-based (line, column) position in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Zero-based line index
    pub line: usize,
    /// Byte offset into the line's text
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open byte range within a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Zero-based line index
    pub line: usize,
    /// Start column (inclusive)
    pub start: usize,
    /// End column (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub const fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    /// Byte length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single pending replacement: swap the text under `span` for `replacement`
///
/// Produced by a scan strategy, consumed once by the applicator, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Document range to replace
    pub span: Span,
    /// Replacement text
    pub replacement: String,
}

impl Edit {
    /// Create a new edit
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

/// Bounds of the text examined by a bounded scan
///
/// Derived from an insertion's end position minus the configured scan limit,
/// clamped to the line start and backed off to a character boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    /// Zero-based line index
    pub line: usize,
    /// Window start column (inclusive)
    pub start: usize,
    /// Window end column (exclusive)
    pub end: usize,
}

impl ScanWindow {
    /// Compute the window trailing `end_col` on `line_text`.
    ///
    /// The start is `end_col` minus `scan_limit` bytes, clamped to the line
    /// start; both bounds are walked back to UTF-8 character boundaries so a
    /// multi-byte character at the edge can never be split.
    pub fn trailing(line: usize, line_text: &str, end_col: usize, scan_limit: usize) -> Self {
        let mut end = end_col.min(line_text.len());
        while end > 0 && !line_text.is_char_boundary(end) {
            end -= 1;
        }
        let mut start = end.saturating_sub(scan_limit);
        while start > 0 && !line_text.is_char_boundary(start) {
            start -= 1;
        }
        Self { line, start, end }
    }
}
