//! Line-based text buffer with atomic batch edits

use crate::text::{Edit, Span};
use thiserror::Error;

/// Error applying an edit batch to a buffer
#[derive(Debug, Error)]
pub enum EditError {
    /// Edit targets a line past the end of the buffer
    #[error("line {0} out of range")]
    LineOutOfRange(usize),
    /// Edit span extends past the end of its line
    #[error("span {span:?} out of range for line of {len} bytes")]
    SpanOutOfRange {
        /// Offending span
        span: Span,
        /// Byte length of the target line
        len: usize,
    },
    /// Edit span splits a multi-byte character
    #[error("span {0:?} does not fall on character boundaries")]
    NotCharBoundary(Span),
    /// Two edits in the batch overlap
    #[error("overlapping spans {0:?} and {1:?}")]
    Overlap(Span, Span),
}

/// An in-memory document held as lines
///
/// Lines are stored without their terminators; `to_text` joins with `\n`, so
/// a trailing newline round-trips as a final empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl TextBuffer {
    /// Build a buffer from document text
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// A single line's text, without terminator
    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// Iterate over the lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Reassemble the document text
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Apply a batch of edits as one atomic mutation
    ///
    /// Every span is validated before anything is touched; on any error the
    /// buffer is left exactly as it was. Edits are applied within each line
    /// in descending column order so earlier spans stay valid.
    pub fn apply(&mut self, edits: &[Edit]) -> Result<usize, EditError> {
        let mut ordered: Vec<&Edit> = edits.iter().collect();
        ordered.sort_by_key(|e| (e.span.line, e.span.start));

        for pair in ordered.windows(2) {
            let (a, b) = (pair[0].span, pair[1].span);
            if a.line == b.line && a.end > b.start {
                return Err(EditError::Overlap(a, b));
            }
        }

        for edit in &ordered {
            let span = edit.span;
            let line = self
                .lines
                .get(span.line)
                .ok_or(EditError::LineOutOfRange(span.line))?;
            if span.start > span.end || span.end > line.len() {
                return Err(EditError::SpanOutOfRange {
                    span,
                    len: line.len(),
                });
            }
            if !line.is_char_boundary(span.start) || !line.is_char_boundary(span.end) {
                return Err(EditError::NotCharBoundary(span));
            }
        }

        for edit in ordered.iter().rev() {
            let span = edit.span;
            self.lines[span.line].replace_range(span.start..span.end, &edit.replacement);
        }
        Ok(edits.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_trailing_newline() {
        for text in ["a\nb", "a\nb\n", "", "single"] {
            assert_eq!(TextBuffer::from_text(text).to_text(), text);
        }
    }

    #[test]
    fn test_apply_multiple_edits_on_one_line() {
        let mut buf = TextBuffer::from_text("a->b->c");
        let edits = vec![
            Edit::new(Span::new(0, 1, 3), "."),
            Edit::new(Span::new(0, 4, 6), "."),
        ];
        assert_eq!(buf.apply(&edits).unwrap(), 2);
        assert_eq!(buf.to_text(), "a.b.c");
    }

    #[test]
    fn test_apply_is_atomic_on_invalid_span() {
        let mut buf = TextBuffer::from_text("a->b");
        let edits = vec![
            Edit::new(Span::new(0, 1, 3), "."),
            Edit::new(Span::new(5, 0, 1), "x"),
        ];
        assert!(matches!(
            buf.apply(&edits),
            Err(EditError::LineOutOfRange(5))
        ));
        assert_eq!(buf.to_text(), "a->b");
    }

    #[test]
    fn test_apply_rejects_overlap() {
        let mut buf = TextBuffer::from_text("abcdef");
        let edits = vec![
            Edit::new(Span::new(0, 0, 3), "x"),
            Edit::new(Span::new(0, 2, 4), "y"),
        ];
        assert!(matches!(buf.apply(&edits), Err(EditError::Overlap(_, _))));
        assert_eq!(buf.to_text(), "abcdef");
    }

    #[test]
    fn test_apply_rejects_split_character() {
        let mut buf = TextBuffer::from_text("a\u{00A0}b");
        let edits = vec![Edit::new(Span::new(0, 2, 3), "x")];
        assert!(matches!(
            buf.apply(&edits),
            Err(EditError::NotCharBoundary(_))
        ));
    }

    #[test]
    fn test_apply_unsorted_batch() {
        let mut buf = TextBuffer::from_text("size_t n = obj->x;");
        // Applicator input order is scan order; the buffer must not depend
        // on it.
        let edits = vec![
            Edit::new(Span::new(0, 14, 16), "."),
            Edit::new(Span::new(0, 0, 6), "int"),
        ];
        buf.apply(&edits).unwrap();
        assert_eq!(buf.to_text(), "int n = obj.x;");
    }
}
