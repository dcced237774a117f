//! Re-entrancy guard around edit application
//!
//! Set while a batch is being applied and through the cooldown that
//! follows, so the pipeline ignores the change events its own mutation
//! triggers (including "corrective" edits from other formatters reacting to
//! ours). One guard per document session; sharing a single flag across
//! documents would let one document's cooldown suppress edits in another.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// The guard flag plus its pending cooldown timer
pub struct ReplacementGuard {
    applying: AtomicBool,
    cooldown: Mutex<Option<JoinHandle<()>>>,
}

impl ReplacementGuard {
    /// Create a clear guard
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            applying: AtomicBool::new(false),
            cooldown: Mutex::new(None),
        })
    }

    /// Whether the guard is currently set
    pub fn is_set(&self) -> bool {
        self.applying.load(Ordering::SeqCst)
    }

    /// Set the guard if it is clear; `false` if it was already held
    pub fn try_acquire(&self) -> bool {
        self.applying
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Arm the cooldown timer that clears the guard after `after`
    ///
    /// Called once per batch after the transaction settles, whatever its
    /// outcome. A stale timer from a previous batch is cancelled first.
    pub fn arm_cooldown(self: &Arc<Self>, after: Duration) {
        let guard = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            guard.applying.store(false, Ordering::SeqCst);
            debug!("cooldown finished, ready for new events");
        });
        if let Some(previous) = self.cooldown.lock().replace(handle) {
            previous.abort();
        }
    }
}
