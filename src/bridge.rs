//! Host bridge: construction of native engine instances by type name.
//!
//! The host environment registers a constructor for each native type it can
//! produce; the factory requests [`STORE_TYPE_NAME`] from it. The bridge is
//! an external collaborator — this module only defines the contract and a
//! registry implementation hosts can populate.

use crate::error::{Error, Result};
use crate::store::Handle;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered type name of the native store engine.
pub const STORE_TYPE_NAME: &str = "KvaultStore";

/// Produces live engine handles by registered type name.
pub trait HostBridge: Send + Sync {
    /// Construct an instance of the named native type.
    ///
    /// Fails with [`Error::BridgeUnavailable`] if the type is unregistered
    /// or construction fails. Fatal, not retried.
    fn construct_instance(&self, type_name: &str) -> Result<Handle>;
}

type Constructor = Box<dyn Fn() -> Result<Handle> + Send + Sync>;

/// Name-to-constructor registry implementing [`HostBridge`].
///
/// Hosts register engine constructors at startup:
///
/// ```
/// use std::sync::Arc;
/// use kvault::{BridgeRegistry, HostBridge, MockStore, STORE_TYPE_NAME};
///
/// let registry = BridgeRegistry::new();
/// registry.register(STORE_TYPE_NAME, || Ok(Arc::new(MockStore::new())));
/// assert!(registry.construct_instance(STORE_TYPE_NAME).is_ok());
/// ```
pub struct BridgeRegistry {
    constructors: RwLock<HashMap<String, Constructor>>,
}

static GLOBAL: Lazy<Arc<BridgeRegistry>> = Lazy::new(|| Arc::new(BridgeRegistry::new()));

impl BridgeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            constructors: RwLock::new(HashMap::new()),
        }
    }

    /// The process-global registry used by [`crate::create`].
    pub fn global() -> Arc<BridgeRegistry> {
        GLOBAL.clone()
    }

    /// Register a constructor for a type name, replacing any previous one.
    pub fn register<F>(&self, type_name: &str, constructor: F)
    where
        F: Fn() -> Result<Handle> + Send + Sync + 'static,
    {
        self.constructors
            .write()
            .insert(type_name.to_string(), Box::new(constructor));
    }

    /// Remove a registered constructor.
    pub fn unregister(&self, type_name: &str) {
        self.constructors.write().remove(type_name);
    }

    /// Check whether a type name has a registered constructor.
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.constructors.read().contains_key(type_name)
    }
}

impl Default for BridgeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBridge for BridgeRegistry {
    fn construct_instance(&self, type_name: &str) -> Result<Handle> {
        let constructors = self.constructors.read();
        let constructor = constructors.get(type_name).ok_or_else(|| {
            Error::BridgeUnavailable(format!("type not registered: {type_name}"))
        })?;
        constructor().map_err(|e| {
            Error::BridgeUnavailable(format!("construction of {type_name} failed: {e}"))
        })
    }
}
