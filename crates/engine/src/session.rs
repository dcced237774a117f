//! Per-document session
//!
//! A session owns everything stateful about one document: the replacement
//! guard, the debounce scheduler, and the applicator. Guard and timers are
//! deliberately per-session — a process-wide flag would let one document's
//! cooldown suppress legitimate edits in another.

use crate::applicator::{ApplyOutcome, EditApplicator};
use crate::config::Config;
use crate::events::{ChangeEvent, ChangeReason};
use crate::format::{self, FormatError};
use crate::guard::ReplacementGuard;
use crate::host::DocumentHost;
use crate::mode;
use crate::scheduler::ChangeScheduler;
use crate::FORMAT_SETTLE;
use mqlfix_core::{scan, RuleSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// One document's wiring of guard, scheduler, and applicator
pub struct DocumentSession {
    host: Arc<dyn DocumentHost>,
    guard: Arc<ReplacementGuard>,
    applicator: Arc<EditApplicator>,
    scheduler: ChangeScheduler,
    rules: &'static RuleSet,
    config: Arc<Config>,
}

impl DocumentSession {
    /// Attach to a document: enforce the language mode and spawn the
    /// scheduler
    pub async fn attach(host: Arc<dyn DocumentHost>, config: Arc<Config>) -> Self {
        if let Err(err) = mode::ensure_cpp_mode(host.as_ref(), &config).await {
            warn!(file = %host.file_name(), error = %err, "language retag failed");
        }
        let guard = ReplacementGuard::new();
        let applicator = Arc::new(EditApplicator::new(Arc::clone(&guard)));
        let scheduler = ChangeScheduler::spawn(
            Arc::clone(&host),
            Arc::clone(&applicator),
            RuleSet::standard(),
            Arc::clone(&config),
        );
        Self {
            host,
            guard,
            applicator,
            scheduler,
            rules: RuleSet::standard(),
            config,
        }
    }

    /// The document host this session drives
    pub fn host(&self) -> &Arc<dyn DocumentHost> {
        &self.host
    }

    /// The session's replacement guard
    pub fn guard(&self) -> &Arc<ReplacementGuard> {
        &self.guard
    }

    /// Feed a host change notification into the debounce pipeline
    ///
    /// Dropped immediately, never debounced, when the document is not
    /// file-backed, the guard is set, the change is an undo/redo, or the
    /// event carries no content changes.
    pub fn notify_change(&self, event: ChangeEvent) {
        if !self.host.is_file_backed() {
            return;
        }
        if self.guard.is_set() {
            debug!("ignoring change while applying edits");
            return;
        }
        if matches!(event.reason, ChangeReason::Undo | ChangeReason::Redo) {
            debug!(reason = ?event.reason, "ignoring history navigation");
            return;
        }
        if event.changes.is_empty() {
            return;
        }
        self.scheduler.notify(event);
    }

    /// Full-document scan and apply — the "force apply replacements" path
    ///
    /// Silently skips documents that are not MQL files tagged as C++.
    pub async fn force_apply(&self) -> ApplyOutcome {
        if !mode::is_mql_as_cpp(self.host.as_ref()) {
            debug!(file = %self.host.file_name(), "not an mql document, nothing to do");
            return ApplyOutcome::Skipped;
        }
        let snapshot = self.host.snapshot();
        let edits = scan::full_scan(self.rules, snapshot.lines());
        debug!(count = edits.len(), "full scan finished");
        self.applicator.apply(self.host.as_ref(), &edits).await
    }

    /// Run the external formatter, settle, reload, then force-apply
    ///
    /// A formatter failure is logged and returned so the caller can show a
    /// one-line advisory; it never blocks the replacement step.
    pub async fn format_and_replace(&self) -> (Option<FormatError>, ApplyOutcome) {
        let file_name = self.host.file_name();
        let format_error = match format::format_document(Path::new(&file_name), &self.config).await
        {
            Ok(true) => {
                debug!(file = %file_name, "external formatter finished");
                None
            }
            Ok(false) => None,
            Err(err) => {
                warn!(file = %file_name, error = %err, "formatter failed, continuing with replacements");
                Some(err)
            }
        };

        // Let the formatter's mutation settle before scanning over it.
        tokio::time::sleep(FORMAT_SETTLE).await;
        if let Err(err) = self.host.reload().await {
            warn!(file = %file_name, error = %err, "reload after format failed");
        }

        let outcome = self.force_apply().await;
        (format_error, outcome)
    }

    /// Stop the scheduler task
    pub async fn shutdown(self) {
        self.scheduler.shutdown().await;
    }
}
