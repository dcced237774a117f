//! Common utilities for engine integration tests

use async_trait::async_trait;
use engine::host::{DocumentHost, HostError, LanguageId};
use mqlfix_core::{Edit, TextBuffer};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory document host with scriptable failure modes
pub struct MemoryHost {
    name: String,
    file_backed: bool,
    language: Mutex<LanguageId>,
    buffer: Mutex<TextBuffer>,
    /// Decline every transaction (`apply_edits` returns `Ok(false)`)
    pub reject_edits: AtomicBool,
    /// Fail every transaction with a host error
    pub fail_edits: AtomicBool,
    /// Number of transactions that reached the host
    pub transactions: AtomicUsize,
}

impl MemoryHost {
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            file_backed: true,
            language: Mutex::new(LanguageId::Other("plaintext".to_string())),
            buffer: Mutex::new(TextBuffer::from_text(text)),
            reject_edits: AtomicBool::new(false),
            fail_edits: AtomicBool::new(false),
            transactions: AtomicUsize::new(0),
        }
    }

    /// An unsaved scratch document (not file-backed)
    pub fn scratch(name: &str, text: &str) -> Self {
        Self {
            file_backed: false,
            ..Self::new(name, text)
        }
    }

    pub fn text(&self) -> String {
        self.buffer.lock().to_text()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentHost for MemoryHost {
    fn is_file_backed(&self) -> bool {
        self.file_backed
    }

    fn file_name(&self) -> String {
        self.name.clone()
    }

    fn language(&self) -> LanguageId {
        self.language.lock().clone()
    }

    async fn set_language(&self, language: LanguageId) -> Result<(), HostError> {
        *self.language.lock() = language;
        Ok(())
    }

    fn snapshot(&self) -> TextBuffer {
        self.buffer.lock().clone()
    }

    async fn apply_edits(&self, edits: &[Edit]) -> Result<bool, HostError> {
        self.transactions.fetch_add(1, Ordering::SeqCst);
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(HostError::Other("synthetic host failure".to_string()));
        }
        if self.reject_edits.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let mut staged = self.buffer.lock().clone();
        if staged.apply(edits).is_err() {
            return Ok(false);
        }
        *self.buffer.lock() = staged;
        Ok(true)
    }
}
