use tokio::sync::Notify;

/// Single-slot, non-blocking shutdown flag.
///
/// `raise` stores at most one pending wake. Redundant raises collapse into
/// that one wake instead of queueing, so raisers (signal tasks, manual
/// callers) never block, no matter how often or from how many threads the
/// trigger fires, and no matter whether anyone is waiting yet.
pub(crate) struct Trigger {
    wake: Notify,
}

impl Trigger {
    pub(crate) fn new() -> Self {
        Self { wake: Notify::new() }
    }

    /// Records that a shutdown was requested. Never blocks, never panics.
    pub(crate) fn raise(&self) {
        // notify_one stores a single permit when nobody is waiting;
        // further calls are absorbed until a waiter consumes it.
        self.wake.notify_one();
    }

    /// Suspends until `raise` has been called at least once since the last
    /// consumed wake (or since construction).
    pub(crate) async fn wait(&self) {
        self.wake.notified().await;
    }
}
