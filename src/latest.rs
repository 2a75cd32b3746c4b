use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Read-only handle to the most recent snapshot a consumer received.
///
/// Cloneable and `Send + Sync` when `S` is, so a persistence thread can take
/// a point-in-time copy without going through the handshake.
pub struct Latest<S> {
    slot: Arc<ArcSwapOption<S>>,
}

impl<S> Latest<S> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub(crate) fn store(&self, snapshot: Arc<S>) {
        self.slot.store(Some(snapshot));
    }

    /// Returns the most recent snapshot, if any has arrived yet
    pub fn load(&self) -> Option<Arc<S>> {
        self.slot.load_full()
    }

    pub fn is_set(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl<S> Clone for Latest<S> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}
