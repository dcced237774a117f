//! Edit application under the replacement guard

use crate::guard::ReplacementGuard;
use crate::host::DocumentHost;
use crate::COOLDOWN_INTERVAL;
use mqlfix_core::Edit;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of one application attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// All edits landed in one transaction
    Applied(usize),
    /// The host declined or failed the transaction; not retried — the next
    /// scan cycle re-detects whatever is still unmatched
    Rejected,
    /// Nothing to do: empty batch, or another batch is in flight
    Skipped,
}

/// Applies edit batches as single host transactions
pub struct EditApplicator {
    guard: Arc<ReplacementGuard>,
    cooldown: Duration,
}

impl EditApplicator {
    /// Create an applicator sharing the session's guard
    pub fn new(guard: Arc<ReplacementGuard>) -> Self {
        Self {
            guard,
            cooldown: COOLDOWN_INTERVAL,
        }
    }

    /// The guard this applicator holds during batches
    pub fn guard(&self) -> &Arc<ReplacementGuard> {
        &self.guard
    }

    /// Apply `edits` as one atomic transaction
    ///
    /// No-op when the batch is empty or the guard is already held; in that
    /// case no cooldown timer is armed. Otherwise the guard is set for the
    /// transaction plus the cooldown, whatever the outcome: a declined
    /// transaction is logged, an error is logged and swallowed, and neither
    /// is surfaced to the user.
    pub async fn apply(&self, host: &dyn DocumentHost, edits: &[Edit]) -> ApplyOutcome {
        if edits.is_empty() {
            debug!("no edits to apply");
            return ApplyOutcome::Skipped;
        }
        if !self.guard.try_acquire() {
            debug!("edit application already in flight, dropping batch");
            return ApplyOutcome::Skipped;
        }

        debug!(count = edits.len(), "applying replacement batch");
        let outcome = match host.apply_edits(edits).await {
            Ok(true) => ApplyOutcome::Applied(edits.len()),
            Ok(false) => {
                warn!("host declined the edit batch; tokens stay for the next scan");
                ApplyOutcome::Rejected
            }
            Err(err) => {
                warn!(error = %err, "edit application failed");
                ApplyOutcome::Rejected
            }
        };

        self.guard.arm_cooldown(self.cooldown);
        outcome
    }
}
