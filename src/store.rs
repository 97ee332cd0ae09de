//! The engine contract.
//!
//! [`Store`] is the operation surface every engine instance satisfies —
//! live instances produced by the host bridge and the in-memory
//! [`crate::MockStore`] alike. This layer treats the surface as opaque:
//! storage semantics, persistence, and cross-process coordination all
//! belong to the engine behind the trait.

use crate::config::Configuration;
use crate::error::Result;
use crate::listeners::{Subscription, ValueChangedListener};
use crate::value::Value;
use std::sync::Arc;

/// Opaque reference to a constructed store instance (live or mock).
///
/// Exactly one handle exists per factory invocation; handles are not pooled
/// or deduplicated by identifier. The caller owns the handle; the handle
/// layer retains only a weak registration for memory-pressure trimming and
/// never closes or invalidates it.
pub type Handle = Arc<dyn Store>;

/// Operation surface of a store instance.
///
/// Trim safety under concurrent use is the implementor's responsibility:
/// [`Store::trim`] may be invoked by the memory-pressure channel at any
/// time, concurrently with ongoing reads and writes.
pub trait Store: Send + Sync {
    /// Initialize the instance with a resolved configuration.
    ///
    /// Fails with [`crate::Error::Initialization`] if the engine rejects
    /// the configuration (empty identifier, inaccessible storage path,
    /// conflicting options).
    fn initialize(&self, config: &Configuration) -> Result<()>;

    /// Set a value.
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Get a value. Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Remove a key. Returns `true` if the key existed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Check if a key exists.
    fn contains(&self, key: &str) -> Result<bool>;

    /// List all keys.
    fn keys(&self) -> Result<Vec<String>>;

    /// Remove all keys.
    fn clear_all(&self) -> Result<()>;

    /// Approximate size of the stored data in bytes.
    fn size(&self) -> Result<u64>;

    /// Whether the instance was opened read-only.
    fn is_read_only(&self) -> bool;

    /// Re-encrypt the instance with a new key, or decrypt it with `None`.
    ///
    /// Fails with [`crate::Error::ReadOnly`] on a read-only instance; other
    /// failures are engine-defined.
    fn recrypt(&self, key: Option<&str>) -> Result<()>;

    /// Release cached/mapped memory under pressure.
    ///
    /// Idempotent and bounded; stored data is unaffected.
    fn trim(&self);

    /// Register a listener invoked with the key after every change.
    ///
    /// Implementations without listener support return a detached
    /// subscription.
    fn on_value_changed(&self, listener: ValueChangedListener) -> Subscription {
        let _ = listener;
        Subscription::detached()
    }

    /// Get a value if it is a `Bool`. No coercion across types.
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.get(key)?.and_then(|v| v.as_bool()))
    }

    /// Get a value if it is a `Number`. No coercion across types.
    fn get_number(&self, key: &str) -> Result<Option<f64>> {
        Ok(self.get(key)?.and_then(|v| v.as_number()))
    }

    /// Get a value if it is a `String`. No coercion across types.
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .get(key)?
            .and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    /// Get a value if it is `Bytes`. No coercion across types.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .get(key)?
            .and_then(|v| v.as_bytes().map(|b| b.to_vec())))
    }
}
