//! In-memory mock store for non-production environments.
//!
//! The mock satisfies the full [`Store`] contract without touching the
//! host bridge: data lives in a sharded in-process map and is gone at
//! process exit. Calling code cannot distinguish it from a live instance
//! for standard read/write operations.

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::listeners::{self, Subscription, ValueChangedListener};
use crate::store::Store;
use crate::value::Value;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
struct InitState {
    initialized: bool,
    id: String,
    read_only: bool,
    encryption_key: Option<String>,
}

/// In-memory, non-persistent store instance.
///
/// # Example
///
/// ```
/// use kvault::{MockStore, Store, Value};
///
/// let store = MockStore::new();
/// store.set("k", Value::from("v")).unwrap();
/// assert_eq!(store.get_string("k").unwrap().as_deref(), Some("v"));
/// ```
pub struct MockStore {
    /// Key under which this instance's listeners are registered.
    /// Unique per instance: two mocks never share data, so they must
    /// never share notifications either.
    registry_key: String,
    data: DashMap<String, Value>,
    state: RwLock<InitState>,
    trim_count: AtomicU64,
}

impl MockStore {
    /// Create an uninitialized mock store.
    ///
    /// All key-value operations work immediately; [`Store::initialize`]
    /// only validates and records the configuration.
    pub fn new() -> Self {
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        Self {
            registry_key: format!("kvault.mock.{instance}"),
            data: DashMap::new(),
            state: RwLock::new(InitState::default()),
            trim_count: AtomicU64::new(0),
        }
    }

    /// Number of times [`Store::trim`] has been invoked.
    pub fn trim_count(&self) -> u64 {
        self.trim_count.load(Ordering::Relaxed)
    }

    /// The encryption key currently recorded for this instance.
    ///
    /// The mock stores nothing encrypted; the key is tracked so
    /// [`Store::recrypt`] is observable.
    pub fn encryption_key(&self) -> Option<String> {
        self.state.read().encryption_key.clone()
    }

    fn display_id(&self) -> String {
        let state = self.state.read();
        if state.initialized {
            state.id.clone()
        } else {
            self.registry_key.clone()
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.state.read().read_only {
            return Err(Error::ReadOnly(self.display_id()));
        }
        Ok(())
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MockStore {
    fn initialize(&self, config: &Configuration) -> Result<()> {
        let mut state = self.state.write();
        if state.initialized {
            tracing::warn!(id = %state.id, "store instance already initialized");
            return Ok(());
        }
        if config.id.is_empty() {
            return Err(Error::Initialization("`id` cannot be empty".into()));
        }
        state.id = config.id.clone();
        state.read_only = config.read_only.unwrap_or(false);
        state.encryption_key = config.encryption_key.clone();
        state.initialized = true;
        Ok(())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.check_writable()?;
        self.data.insert(key.to_string(), value);
        listeners::notify_value_changed(&self.registry_key, key);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.check_writable()?;
        let existed = self.data.remove(key).is_some();
        if existed {
            listeners::notify_value_changed(&self.registry_key, key);
        }
        Ok(existed)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.data.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.data.iter().map(|entry| entry.key().clone()).collect())
    }

    fn clear_all(&self) -> Result<()> {
        self.check_writable()?;
        let removed: Vec<String> = self.data.iter().map(|entry| entry.key().clone()).collect();
        self.data.clear();
        for key in removed {
            listeners::notify_value_changed(&self.registry_key, &key);
        }
        Ok(())
    }

    fn size(&self) -> Result<u64> {
        let bytes: usize = self
            .data
            .iter()
            .map(|entry| entry.key().len() + entry.value().approximate_size())
            .sum();
        Ok(bytes as u64)
    }

    fn is_read_only(&self) -> bool {
        self.state.read().read_only
    }

    fn recrypt(&self, key: Option<&str>) -> Result<()> {
        self.check_writable()?;
        self.state.write().encryption_key = key.map(|k| k.to_string());
        Ok(())
    }

    fn trim(&self) {
        // Nothing cached to release; stored data must survive a trim.
        self.trim_count.fetch_add(1, Ordering::Relaxed);
        self.data.shrink_to_fit();
    }

    fn on_value_changed(&self, listener: ValueChangedListener) -> Subscription {
        let id = listeners::add_listener(&self.registry_key, listener);
        Subscription::new(self.registry_key.clone(), id)
    }
}
