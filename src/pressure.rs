//! Memory-pressure notification channel.
//!
//! Handles returned by the factory are registered here weakly; when the
//! host signals memory pressure, every still-live handle gets a
//! [`Store::trim`] call. Registration is best-effort and fire-and-forget:
//! the channel never surfaces failures to the caller, never keeps a handle
//! alive, and never invalidates one.

use crate::store::{Handle, Store};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

static GLOBAL: Lazy<Arc<MemoryPressure>> = Lazy::new(|| Arc::new(MemoryPressure::new()));

/// Weak registry of handles to trim under memory pressure.
pub struct MemoryPressure {
    subscribers: Mutex<Vec<Weak<dyn Store>>>,
}

impl MemoryPressure {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// The process-global channel used by [`crate::create`].
    ///
    /// The host's pressure signal source should call [`MemoryPressure::notify`]
    /// on this instance.
    pub fn global() -> Arc<MemoryPressure> {
        GLOBAL.clone()
    }

    /// Register a handle for trimming. Best-effort; never fails.
    ///
    /// Only a weak reference is retained, so registration does not extend
    /// the handle's lifetime.
    pub fn subscribe(&self, handle: &Handle) {
        self.subscribers.lock().push(Arc::downgrade(handle));
        tracing::debug!("registered store handle for memory-pressure trimming");
    }

    /// Deliver a memory-pressure signal.
    ///
    /// Trims every live registered handle and prunes dead registrations.
    /// Safe to call concurrently with ongoing handle use; trim safety under
    /// concurrency is the engine's contract.
    pub fn notify(&self) {
        let subscribers: Vec<Weak<dyn Store>> = {
            let mut guard = self.subscribers.lock();
            guard.retain(|weak| weak.strong_count() > 0);
            guard.clone()
        };

        let mut trimmed = 0usize;
        for weak in subscribers {
            if let Some(store) = weak.upgrade() {
                store.trim();
                trimmed += 1;
            }
        }
        tracing::debug!(trimmed, "memory pressure notification delivered");
    }

    /// Number of live registrations. Prunes dead ones as a side effect.
    pub fn subscriber_count(&self) -> usize {
        let mut guard = self.subscribers.lock();
        guard.retain(|weak| weak.strong_count() > 0);
        guard.len()
    }
}

impl Default for MemoryPressure {
    fn default() -> Self {
        Self::new()
    }
}
