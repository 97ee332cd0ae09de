//! Instance factory: environment dispatch and handle construction.
//!
//! [`StoreFactory::create`] is the single construction entry point. The
//! environment is checked first, before any engine interaction; the path
//! is then an explicit strategy — [`MockStoreProvider`] for tests,
//! [`RealStoreProvider`] for production — chosen once per call.
//!
//! A handle's lifecycle within one call is strictly sequential:
//! constructed, initialized, registered for trimming, returned. Any
//! failure before the final step aborts the call; a partially initialized
//! handle is never returned.

use crate::bridge::{HostBridge, STORE_TYPE_NAME};
use crate::config::{resolve, Configuration};
use crate::env::Environment;
use crate::error::Result;
use crate::mock::MockStore;
use crate::pressure::MemoryPressure;
use crate::store::Handle;
use std::sync::Arc;

/// A strategy that produces a store handle for one environment.
trait StoreProvider {
    fn provide(&self, config: Option<Configuration>) -> Result<Handle>;
}

/// Production strategy: resolve, construct via the bridge, initialize,
/// register for trimming.
struct RealStoreProvider<'a> {
    bridge: &'a dyn HostBridge,
    pressure: &'a MemoryPressure,
}

impl StoreProvider for RealStoreProvider<'_> {
    fn provide(&self, config: Option<Configuration>) -> Result<Handle> {
        let config = resolve(config);

        let handle = self.bridge.construct_instance(STORE_TYPE_NAME)?;
        handle.initialize(&config)?;

        tracing::info!(
            id = %config.id,
            encrypted = config.is_encrypted(),
            read_only = config.read_only.unwrap_or(false),
            "created store instance"
        );

        // Fire-and-forget: trimming is best-effort, never a reason to
        // withhold the handle.
        self.pressure.subscribe(&handle);
        Ok(handle)
    }
}

/// Test strategy: an in-memory mock, the bridge is never touched.
struct MockStoreProvider;

impl StoreProvider for MockStoreProvider {
    fn provide(&self, _config: Option<Configuration>) -> Result<Handle> {
        tracing::debug!("test environment, returning mock store");
        Ok(Arc::new(MockStore::new()))
    }
}

/// Factory for store handles.
///
/// Each [`StoreFactory::create`] call runs synchronously on the caller's
/// thread and yields an independent handle; handles with the same id are
/// not deduplicated here, their consistency is the engine's concern.
///
/// # Example
///
/// ```
/// use kvault::{Configuration, Environment, Store, StoreFactory, Value};
///
/// let factory = StoreFactory::builder()
///     .environment(Environment::Test)
///     .build();
///
/// let store = factory.create(Some(Configuration::new("user-storage")))?;
/// store.set("k", Value::from("v"))?;
/// # Ok::<(), kvault::Error>(())
/// ```
pub struct StoreFactory {
    environment: Environment,
    bridge: Arc<dyn HostBridge>,
    pressure: Arc<MemoryPressure>,
}

impl StoreFactory {
    /// Create a builder for factory configuration.
    pub fn builder() -> StoreFactoryBuilder {
        StoreFactoryBuilder::new()
    }

    /// Create a store handle.
    ///
    /// In the test environment this returns an in-memory mock immediately;
    /// the host bridge is never consulted. In production the optional
    /// configuration is resolved, a live instance is constructed and
    /// initialized, and the handle is registered for memory-pressure
    /// trimming before being returned.
    ///
    /// # Errors
    ///
    /// [`crate::Error::BridgeUnavailable`] if the host cannot produce a
    /// native instance, [`crate::Error::Initialization`] if the engine
    /// rejects the configuration. Both are fatal for this call and leave
    /// no registration behind.
    pub fn create(&self, config: Option<Configuration>) -> Result<Handle> {
        match self.environment {
            Environment::Test => MockStoreProvider.provide(config),
            Environment::Production => RealStoreProvider {
                bridge: self.bridge.as_ref(),
                pressure: self.pressure.as_ref(),
            }
            .provide(config),
        }
    }

    /// The environment this factory dispatches on.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// The memory-pressure channel handles are registered with.
    pub fn pressure(&self) -> &Arc<MemoryPressure> {
        &self.pressure
    }
}

/// Builder for [`StoreFactory`].
///
/// Unset fields fall back to process-wide defaults: the detected
/// [`Environment`], the global [`crate::BridgeRegistry`], and the global
/// [`MemoryPressure`] channel.
pub struct StoreFactoryBuilder {
    environment: Option<Environment>,
    bridge: Option<Arc<dyn HostBridge>>,
    pressure: Option<Arc<MemoryPressure>>,
}

impl StoreFactoryBuilder {
    /// Create a builder with no overrides.
    pub fn new() -> Self {
        Self {
            environment: None,
            bridge: None,
            pressure: None,
        }
    }

    /// Inject the environment instead of detecting it.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Use a specific host bridge.
    pub fn bridge(mut self, bridge: Arc<dyn HostBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Use a specific memory-pressure channel.
    pub fn pressure(mut self, pressure: Arc<MemoryPressure>) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Build the factory.
    pub fn build(self) -> StoreFactory {
        StoreFactory {
            environment: self.environment.unwrap_or_else(Environment::detect),
            bridge: self
                .bridge
                .unwrap_or_else(|| crate::bridge::BridgeRegistry::global() as Arc<dyn HostBridge>),
            pressure: self.pressure.unwrap_or_else(MemoryPressure::global),
        }
    }
}

impl Default for StoreFactoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a store handle with process-wide defaults.
///
/// Equivalent to `StoreFactory::builder().build().create(config)`: detected
/// environment, global bridge registry, global pressure channel. The
/// original call/`new` duality of the source ecosystem collapses to this
/// single function.
pub fn create(config: Option<Configuration>) -> Result<Handle> {
    StoreFactory::builder().build().create(config)
}
