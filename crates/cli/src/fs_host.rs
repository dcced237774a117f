//! Filesystem-backed document host

use async_trait::async_trait;
use engine::host::{DocumentHost, HostError, LanguageId};
use mqlfix_core::{Edit, TextBuffer};
use parking_lot::RwLock;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A document whose source of truth is a file on disk
///
/// The buffer mirrors the file; `apply_edits` stages the whole batch in
/// memory and only then rewrites the file atomically, so the on-disk text is
/// never a half-applied batch.
pub struct FsDocument {
    path: PathBuf,
    buffer: RwLock<TextBuffer>,
    language: RwLock<LanguageId>,
}

impl FsDocument {
    /// Load the document from disk
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            buffer: RwLock::new(TextBuffer::from_text(&text)),
            language: RwLock::new(LanguageId::Other("plaintext".to_string())),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, returning the buffer as it was before
    ///
    /// The previous snapshot is what the watch loop diffs against to build
    /// change events.
    pub fn refresh_from_disk(&self) -> std::io::Result<TextBuffer> {
        let text = std::fs::read_to_string(&self.path)?;
        let mut buffer = self.buffer.write();
        Ok(std::mem::replace(&mut *buffer, TextBuffer::from_text(&text)))
    }

    /// Write `text` to the backing file via temp file + rename
    fn write_atomic(&self, text: &str) -> std::io::Result<()> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut staged = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
        staged.write_all(text.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentHost for FsDocument {
    fn is_file_backed(&self) -> bool {
        true
    }

    fn file_name(&self) -> String {
        self.path.display().to_string()
    }

    fn language(&self) -> LanguageId {
        self.language.read().clone()
    }

    async fn set_language(&self, language: LanguageId) -> Result<(), HostError> {
        *self.language.write() = language;
        Ok(())
    }

    fn snapshot(&self) -> TextBuffer {
        self.buffer.read().clone()
    }

    async fn apply_edits(&self, edits: &[Edit]) -> Result<bool, HostError> {
        let mut staged = self.buffer.read().clone();
        if let Err(err) = staged.apply(edits) {
            // The document moved under the batch; decline the transaction
            // and let the next scan re-detect.
            debug!(file = %self.path.display(), error = %err, "edit batch no longer fits");
            return Ok(false);
        }
        self.write_atomic(&staged.to_text())?;
        *self.buffer.write() = staged;
        Ok(true)
    }

    async fn reload(&self) -> Result<(), HostError> {
        self.refresh_from_disk()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mqlfix_core::Span;

    #[tokio::test]
    async fn test_apply_edits_rewrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expert.mq4");
        std::fs::write(&path, "x = obj->value;\n").unwrap();

        let doc = FsDocument::open(&path).unwrap();
        let applied = doc
            .apply_edits(&[Edit::new(Span::new(0, 7, 9), ".")])
            .await
            .unwrap();
        assert!(applied);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = obj.value;\n");
        assert_eq!(doc.snapshot().to_text(), "x = obj.value;\n");
    }

    #[tokio::test]
    async fn test_stale_batch_is_declined_and_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expert.mq4");
        std::fs::write(&path, "short\n").unwrap();

        let doc = FsDocument::open(&path).unwrap();
        let applied = doc
            .apply_edits(&[Edit::new(Span::new(7, 0, 2), ".")])
            .await
            .unwrap();
        assert!(!applied);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[tokio::test]
    async fn test_refresh_returns_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expert.mq4");
        std::fs::write(&path, "before").unwrap();

        let doc = FsDocument::open(&path).unwrap();
        std::fs::write(&path, "after").unwrap();

        let previous = doc.refresh_from_disk().unwrap();
        assert_eq!(previous.to_text(), "before");
        assert_eq!(doc.snapshot().to_text(), "after");
    }
}
