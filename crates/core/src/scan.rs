//! Scan strategies
//!
//! Two ways of turning token matches into pending edits: a full-document
//! scan used by the manual commands, and a bounded-window scan used on the
//! live-typing path. Both strip single-line comments the same naive way —
//! everything at or after the first `//` on a line is off limits. String
//! literals and multi-line comments are not understood; that is the
//! documented contract, not an oversight.

use crate::rules::RuleSet;
use crate::text::{Edit, ScanWindow, Span};

/// Byte offset of the first `//` on the line, if any
pub fn comment_start(line: &str) -> Option<usize> {
    line.find("//")
}

/// Append `edit` unless an edit for the same exact span is already queued
pub fn push_unique(edits: &mut Vec<Edit>, edit: Edit) {
    if !edits.iter().any(|e| e.span == edit.span) {
        edits.push(edit);
    }
}

/// Scan every line and collect all edits
///
/// Cost is linear in document size; this runs only on explicit command,
/// never per keystroke.
pub fn full_scan<'a, I>(rules: &RuleSet, lines: I) -> Vec<Edit>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut edits = Vec::new();
    for (line_no, text) in lines.into_iter().enumerate() {
        let code = match comment_start(text) {
            Some(idx) => &text[..idx],
            None => text,
        };
        for m in rules.matches(code) {
            if m.replacement.is_empty() {
                continue;
            }
            push_unique(&mut edits, Edit::new(Span::new(line_no, m.start, m.end), m.replacement));
        }
    }
    edits
}

/// Scan the window trailing an insertion point on one line
///
/// The window spans the last `scan_limit` bytes before `end_col`, so the
/// per-keystroke cost is constant regardless of document length. Matches are
/// translated back to absolute line coordinates; anything starting at or
/// after the line's first `//` is discarded. Tokens whose span lies further
/// back than `scan_limit` are legitimately missed — the full scan or a later
/// edit will catch them.
pub fn window_scan(
    rules: &RuleSet,
    line_no: usize,
    line_text: &str,
    end_col: usize,
    scan_limit: usize,
) -> Vec<Edit> {
    let window = ScanWindow::trailing(line_no, line_text, end_col, scan_limit);
    let comment = comment_start(line_text);

    let mut edits = Vec::new();
    for m in rules.matches(&line_text[window.start..window.end]) {
        let start = window.start + m.start;
        let end = window.start + m.end;
        if comment.is_some_and(|idx| start >= idx) {
            continue;
        }
        if m.replacement.is_empty() {
            continue;
        }
        push_unique(&mut edits, Edit::new(Span::new(line_no, start, end), m.replacement));
    }
    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    fn std_rules() -> &'static RuleSet {
        RuleSet::standard()
    }

    #[test]
    fn test_full_scan_skips_matches_after_comment() {
        let edits = full_scan(std_rules(), ["a->b // c->d"]);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].span, Span::new(0, 1, 3));
        assert_eq!(edits[0].replacement, ".");
    }

    #[test]
    fn test_full_scan_is_blind_to_block_comments() {
        // Known limitation: /* */ is not comment syntax to this scanner.
        let edits = full_scan(std_rules(), ["/* a->b */"]);
        assert_eq!(edits.len(), 1);
    }

    #[test]
    fn test_full_scan_collects_across_lines() {
        let edits = full_scan(std_rules(), ["obj->x", "size_t n;", "// size_t m;"]);
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].span.line, 0);
        assert_eq!(edits[1].span.line, 1);
    }

    #[test]
    fn test_full_scan_end_to_end_document() {
        let mut buf = TextBuffer::from_text("int x = obj->value; size_t n = C   'red';");
        let edits = full_scan(std_rules(), buf.lines());
        assert_eq!(edits.len(), 3);
        buf.apply(&edits).unwrap();
        assert_eq!(buf.to_text(), "int x = obj.value; int n = C'red';");
    }

    #[test]
    fn test_full_scan_is_idempotent() {
        let mut buf = TextBuffer::from_text("int x = obj->value; size_t n = C   'red';");
        let edits = full_scan(std_rules(), buf.lines());
        buf.apply(&edits).unwrap();
        let second = full_scan(std_rules(), buf.lines());
        assert!(second.is_empty(), "second pass found {second:?}");
    }

    #[test]
    fn test_window_scan_translates_offsets() {
        let line = "int x = obj->value;";
        let edits = window_scan(std_rules(), 4, line, line.len(), 100);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].span, Span::new(4, 11, 13));
    }

    #[test]
    fn test_window_scan_misses_tokens_beyond_limit() {
        // The arrow sits more than `scan_limit` bytes before the insertion
        // point, so the bounded scan legitimately does not see it.
        let line = format!("a->b{}x", " ".repeat(120));
        let edits = window_scan(std_rules(), 0, &line, line.len(), 100);
        assert!(edits.is_empty());
    }

    #[test]
    fn test_window_scan_is_subset_of_full_scan() {
        let line = "obj->a; size_t n; C  'x'";
        let full = full_scan(std_rules(), [line]);
        let windowed = window_scan(std_rules(), 0, line, line.len(), 100);
        assert_eq!(windowed, full);

        let narrow = window_scan(std_rules(), 0, line, line.len(), 10);
        for edit in &narrow {
            assert!(full.contains(edit));
        }
    }

    #[test]
    fn test_window_scan_respects_comment() {
        let line = "x = a->b; // c->d";
        let edits = window_scan(std_rules(), 0, line, line.len(), 100);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].span.start, 5);
    }

    #[test]
    fn test_window_scan_partial_token_at_window_edge() {
        // Window starts between `-` and `>`: the truncated token cannot
        // match, and nothing blows up.
        let line = "ab->cd";
        let edits = window_scan(std_rules(), 0, line, line.len(), 3);
        assert!(edits.is_empty());
    }

    #[test]
    fn test_push_unique_dedups_exact_span() {
        let mut edits = Vec::new();
        push_unique(&mut edits, Edit::new(Span::new(0, 1, 3), "."));
        push_unique(&mut edits, Edit::new(Span::new(0, 1, 3), "."));
        push_unique(&mut edits, Edit::new(Span::new(0, 4, 6), "."));
        assert_eq!(edits.len(), 2);
    }
}
