//! Value-changed listener registry.
//!
//! Process-wide registry mapping instance keys to listener callbacks. A
//! store notifies the registry after every mutating operation; callers hold
//! a [`Subscription`] whose drop removes the listener again.
//!
//! Listeners run while the registry lock is held: they must not add or
//! remove listeners, and they must not call back into a store operation
//! that notifies.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a registered listener, unique within the process.
pub type ListenerId = u64;

/// Callback invoked with the changed key.
pub type ValueChangedListener = Box<dyn Fn(&str) + Send + Sync>;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

static REGISTRY: Lazy<Mutex<HashMap<String, Vec<(ListenerId, ValueChangedListener)>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Register a listener for the given instance key.
pub(crate) fn add_listener(instance_key: &str, listener: ValueChangedListener) -> ListenerId {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let mut registry = REGISTRY.lock();
    registry
        .entry(instance_key.to_string())
        .or_default()
        .push((id, listener));
    id
}

/// Remove a previously registered listener. Idempotent.
pub(crate) fn remove_listener(instance_key: &str, id: ListenerId) {
    let mut registry = REGISTRY.lock();
    if let Some(listeners) = registry.get_mut(instance_key) {
        listeners.retain(|(listener_id, _)| *listener_id != id);
        if listeners.is_empty() {
            registry.remove(instance_key);
        }
    }
}

/// Notify all listeners of the given instance that `key` changed.
pub(crate) fn notify_value_changed(instance_key: &str, key: &str) {
    let registry = REGISTRY.lock();
    if let Some(listeners) = registry.get(instance_key) {
        for (_, listener) in listeners {
            listener(key);
        }
    }
}

/// RAII guard for a registered value-changed listener.
///
/// Dropping the subscription removes the listener. A detached subscription
/// (from stores without listener support) is a no-op.
#[must_use = "dropping a Subscription immediately removes the listener"]
pub struct Subscription {
    target: Option<(String, ListenerId)>,
}

impl Subscription {
    pub(crate) fn new(instance_key: impl Into<String>, id: ListenerId) -> Self {
        Self {
            target: Some((instance_key.into(), id)),
        }
    }

    /// A subscription bound to nothing.
    pub fn detached() -> Self {
        Self { target: None }
    }

    /// Remove the listener now instead of at drop time.
    pub fn cancel(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some((instance_key, id)) = self.target.take() {
            remove_listener(&instance_key, id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
