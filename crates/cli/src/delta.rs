//! Change detection between document snapshots
//!
//! The watch daemon has no editor telling it what changed, only "the file
//! was rewritten". A line-level diff of the previous snapshot against the
//! new text recovers insertion fragments good enough for the bounded scan:
//! every inserted or rewritten line becomes one fragment at its position in
//! the new text. Deletions produce nothing — they cannot introduce a
//! matchable token — and identical texts produce an event with no changes,
//! which the session filter drops.

use engine::events::{ChangeEvent, ContentChange};
use mqlfix_core::{Position, TextBuffer};
use similar::{ChangeTag, TextDiff};

/// Build a change event describing `old` → `new`
pub fn change_event(old: &TextBuffer, new: &TextBuffer) -> ChangeEvent {
    let old_text = old.to_text();
    let new_text = new.to_text();
    let diff = TextDiff::from_lines(&old_text, &new_text);

    let mut changes = Vec::new();
    for change in diff.iter_all_changes() {
        if change.tag() != ChangeTag::Insert {
            continue;
        }
        let Some(line) = change.new_index() else {
            continue;
        };
        let text = change.value().trim_end_matches('\n');
        if text.is_empty() {
            continue;
        }
        changes.push(ContentChange::new(Position::new(line, 0), text));
    }
    ChangeEvent::edit(changes)
}
