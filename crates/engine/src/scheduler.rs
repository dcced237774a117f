//! Debounce scheduling of change events
//!
//! One scheduler per document. The state machine has two states — idle and
//! debounce-pending — realized as a task blocking on its channel: the first
//! event enters debounce-pending, every newer event supersedes the held one
//! and restarts the deadline, and a quiescent gap fires exactly one bounded
//! scan, against the latest event.

use crate::applicator::EditApplicator;
use crate::config::Config;
use crate::events::ChangeEvent;
use crate::host::DocumentHost;
use crate::mode;
use crate::DEBOUNCE_INTERVAL;
use mqlfix_core::{scan, Edit, RuleSet, TextBuffer};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::debug;

/// Handle to a document's debounce task
pub struct ChangeScheduler {
    tx: mpsc::UnboundedSender<ChangeEvent>,
    task: JoinHandle<()>,
}

impl ChangeScheduler {
    /// Spawn the debounce task for one document
    pub fn spawn(
        host: Arc<dyn DocumentHost>,
        applicator: Arc<EditApplicator>,
        rules: &'static RuleSet,
        config: Arc<Config>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_loop(rx, host, applicator, rules, config));
        Self { tx, task }
    }

    /// Hand a change event to the debounce loop
    ///
    /// Returns `false` if the scheduler has already shut down.
    pub fn notify(&self, event: ChangeEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Stop the debounce task
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}

async fn run_loop(
    mut rx: mpsc::UnboundedReceiver<ChangeEvent>,
    host: Arc<dyn DocumentHost>,
    applicator: Arc<EditApplicator>,
    rules: &'static RuleSet,
    config: Arc<Config>,
) {
    while let Some(event) = rx.recv().await {
        let mut latest = event;
        loop {
            match timeout(DEBOUNCE_INTERVAL, rx.recv()).await {
                // A newer event supersedes the held one and restarts the
                // deadline.
                Ok(Some(next)) => latest = next,
                // Channel closed mid-debounce: the session is shutting
                // down, drop the pending event.
                Ok(None) => {
                    debug!("scheduler shutting down with a pending event");
                    return;
                }
                // Quiescent gap: fire.
                Err(_) => break,
            }
        }
        process(&latest, host.as_ref(), &applicator, rules, &config).await;
    }
}

/// Bounded scan for one debounced event, then the applicator
async fn process(
    event: &ChangeEvent,
    host: &dyn DocumentHost,
    applicator: &EditApplicator,
    rules: &RuleSet,
    config: &Config,
) {
    if !mode::is_mql_as_cpp(host) {
        debug!(file = %host.file_name(), "not an mql document, skipping scan");
        return;
    }
    let snapshot = host.snapshot();
    let edits = scan_event(rules, &snapshot, event, config.scan_limit);
    debug!(count = edits.len(), "bounded scan finished");
    applicator.apply(host, &edits).await;
}

/// Collect bounded-window edits for every insertion fragment in the event
///
/// Pure deletions are skipped — they cannot introduce a matchable token.
/// Duplicate spans across fragments collapse to one edit.
pub fn scan_event(
    rules: &RuleSet,
    snapshot: &TextBuffer,
    event: &ChangeEvent,
    scan_limit: usize,
) -> Vec<Edit> {
    let mut edits = Vec::new();
    for change in &event.changes {
        if !change.is_insertion() {
            continue;
        }
        let end = change.end_position();
        let Some(line_text) = snapshot.line(end.line) else {
            continue;
        };
        for edit in scan::window_scan(rules, end.line, line_text, end.column, scan_limit) {
            scan::push_unique(&mut edits, edit);
        }
    }
    edits
}
