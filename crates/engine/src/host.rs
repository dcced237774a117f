//! The document surface the engine drives
//!
//! The engine never touches a document directly; everything goes through
//! `DocumentHost`. One implementor per host kind: the CLI's filesystem
//! documents, an editor adapter, or the in-memory host the tests use.

use async_trait::async_trait;
use mqlfix_core::{Edit, TextBuffer};
use thiserror::Error;

/// Language identifier the host tags a document with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageId {
    /// The C-family tag the language-intelligence tooling activates on
    Cpp,
    /// Any other tag, by host-specific name
    Other(String),
}

impl LanguageId {
    /// The tag name as the host spells it
    pub fn as_str(&self) -> &str {
        match self {
            LanguageId::Cpp => "cpp",
            LanguageId::Other(name) => name,
        }
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error reported by a host operation
#[derive(Debug, Error)]
pub enum HostError {
    /// Underlying I/O failure
    #[error("host i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Host-specific failure
    #[error("{0}")]
    Other(String),
}

/// Async access to one document owned by the host
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Whether the document is backed by a live file
    fn is_file_backed(&self) -> bool;

    /// Name (or path) of the backing file
    fn file_name(&self) -> String;

    /// Current language tag
    fn language(&self) -> LanguageId;

    /// Retag the document
    async fn set_language(&self, language: LanguageId) -> Result<(), HostError>;

    /// Snapshot of the current text
    fn snapshot(&self) -> TextBuffer;

    /// Apply the batch as one atomic transaction
    ///
    /// `Ok(false)` means the host declined the whole transaction, for
    /// example because the document changed concurrently. Partial
    /// application is not allowed.
    async fn apply_edits(&self, edits: &[Edit]) -> Result<bool, HostError>;

    /// Re-read the document after an out-of-band mutation
    ///
    /// Hosts whose snapshot is always live (editors) keep the default
    /// no-op; the filesystem host re-reads the file.
    async fn reload(&self) -> Result<(), HostError> {
        Ok(())
    }
}
