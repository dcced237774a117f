//! Host change notifications

use mqlfix_core::Position;

/// Why the host reported a text change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// A normal edit (typing, paste, programmatic mutation)
    Edit,
    /// Undo navigation
    Undo,
    /// Redo navigation
    Redo,
}

/// One contiguous content change within a change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    /// Position the inserted text starts at
    pub start: Position,
    /// Inserted text; empty for a pure deletion
    pub text: String,
}

impl ContentChange {
    /// Create a content change
    pub fn new(start: Position, text: impl Into<String>) -> Self {
        Self {
            start,
            text: text.into(),
        }
    }

    /// Whether this fragment inserted any text
    ///
    /// Pure deletions cannot introduce a matchable token and are skipped by
    /// the bounded scan.
    pub fn is_insertion(&self) -> bool {
        !self.text.is_empty()
    }

    /// Position immediately after the inserted text
    ///
    /// Fragments may span lines; the end lands on the last inserted line.
    pub fn end_position(&self) -> Position {
        match self.text.rfind('\n') {
            Some(idx) => Position::new(
                self.start.line + self.text.matches('\n').count(),
                self.text.len() - idx - 1,
            ),
            None => Position::new(self.start.line, self.start.column + self.text.len()),
        }
    }
}

/// A document change notification from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// What caused the change
    pub reason: ChangeReason,
    /// The individual content changes, host order
    pub changes: Vec<ContentChange>,
}

impl ChangeEvent {
    /// Create a change event
    pub fn new(reason: ChangeReason, changes: Vec<ContentChange>) -> Self {
        Self { reason, changes }
    }

    /// Convenience constructor for a plain edit event
    pub fn edit(changes: Vec<ContentChange>) -> Self {
        Self::new(ChangeReason::Edit, changes)
    }
}
