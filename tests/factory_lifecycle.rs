//! Factory lifecycle tests.
//!
//! Exercises the construction entry point end to end with an injected
//! environment, a counting host bridge, and a recording engine stand-in:
//! environment dispatch, configuration resolution, error propagation, and
//! the trim registration that follows a successful create.

use kvault::prelude::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Test doubles
// ============================================================================

/// Shared observation point for bridge and engine interactions.
#[derive(Default)]
struct Probe {
    events: Mutex<Vec<&'static str>>,
    configs: Mutex<Vec<Configuration>>,
}

impl Probe {
    fn events(&self) -> Vec<&'static str> {
        self.events.lock().clone()
    }

    fn initialized_configs(&self) -> Vec<Configuration> {
        self.configs.lock().clone()
    }
}

/// Engine stand-in that records every call made against it.
struct RecordingStore {
    probe: Arc<Probe>,
    fail_initialize: bool,
}

impl RecordingStore {
    fn new(probe: Arc<Probe>, fail_initialize: bool) -> Self {
        Self {
            probe,
            fail_initialize,
        }
    }
}

impl Store for RecordingStore {
    fn initialize(&self, config: &Configuration) -> kvault::Result<()> {
        self.probe.events.lock().push("initialize");
        self.probe.configs.lock().push(config.clone());
        if self.fail_initialize {
            return Err(Error::Initialization("engine rejected configuration".into()));
        }
        Ok(())
    }

    fn set(&self, _key: &str, _value: Value) -> kvault::Result<()> {
        Ok(())
    }

    fn get(&self, _key: &str) -> kvault::Result<Option<Value>> {
        Ok(None)
    }

    fn remove(&self, _key: &str) -> kvault::Result<bool> {
        Ok(false)
    }

    fn contains(&self, _key: &str) -> kvault::Result<bool> {
        Ok(false)
    }

    fn keys(&self) -> kvault::Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn clear_all(&self) -> kvault::Result<()> {
        Ok(())
    }

    fn size(&self) -> kvault::Result<u64> {
        Ok(0)
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn recrypt(&self, _key: Option<&str>) -> kvault::Result<()> {
        Ok(())
    }

    fn trim(&self) {
        self.probe.events.lock().push("trim");
    }
}

/// Host bridge double that counts constructions.
struct CountingBridge {
    probe: Arc<Probe>,
    constructs: AtomicUsize,
    available: bool,
    fail_initialize: bool,
}

impl CountingBridge {
    fn new(probe: Arc<Probe>) -> Self {
        Self {
            probe,
            constructs: AtomicUsize::new(0),
            available: true,
            fail_initialize: false,
        }
    }

    fn unavailable(probe: Arc<Probe>) -> Self {
        Self {
            available: false,
            ..Self::new(probe)
        }
    }

    fn with_failing_initialize(probe: Arc<Probe>) -> Self {
        Self {
            fail_initialize: true,
            ..Self::new(probe)
        }
    }

    fn construct_count(&self) -> usize {
        self.constructs.load(Ordering::SeqCst)
    }
}

impl HostBridge for CountingBridge {
    fn construct_instance(&self, type_name: &str) -> kvault::Result<Handle> {
        self.constructs.fetch_add(1, Ordering::SeqCst);
        if !self.available {
            return Err(Error::BridgeUnavailable(format!(
                "type not registered: {type_name}"
            )));
        }
        self.probe.events.lock().push("construct");
        Ok(Arc::new(RecordingStore::new(
            self.probe.clone(),
            self.fail_initialize,
        )))
    }
}

fn production_factory(bridge: Arc<CountingBridge>) -> StoreFactory {
    StoreFactory::builder()
        .environment(Environment::Production)
        .bridge(bridge)
        .pressure(Arc::new(MemoryPressure::new()))
        .build()
}

// ============================================================================
// Environment dispatch
// ============================================================================

mod environment_dispatch {
    use super::*;

    #[test]
    fn test_environment_never_invokes_bridge() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe));
        let factory = StoreFactory::builder()
            .environment(Environment::Test)
            .bridge(bridge.clone())
            .pressure(Arc::new(MemoryPressure::new()))
            .build();

        let store = factory.create(None).unwrap();
        store.set("k", Value::from("v")).unwrap();

        assert_eq!(bridge.construct_count(), 0);
    }

    #[test]
    fn mock_satisfies_kv_contract_within_process() {
        let factory = StoreFactory::builder()
            .environment(Environment::Test)
            .build();

        let store = factory.create(None).unwrap();
        store.set("k", Value::from("v")).unwrap();
        assert_eq!(store.get_string("k").unwrap().as_deref(), Some("v"));
        assert!(store.contains("k").unwrap());
        assert!(store.remove("k").unwrap());
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn production_environment_uses_bridge() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe));
        let factory = production_factory(bridge.clone());

        factory.create(None).unwrap();
        assert_eq!(bridge.construct_count(), 1);
    }

    #[test]
    fn handles_are_not_pooled_by_identifier() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe));
        let factory = production_factory(bridge.clone());

        let config = Configuration::new("shared");
        factory.create(Some(config.clone())).unwrap();
        factory.create(Some(config)).unwrap();
        assert_eq!(bridge.construct_count(), 2);
    }
}

// ============================================================================
// Configuration resolution
// ============================================================================

mod configuration_resolution {
    use super::*;

    #[test]
    fn absent_configuration_resolves_to_default_id() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe.clone()));
        let factory = production_factory(bridge);

        factory.create(None).unwrap();

        let configs = probe.initialized_configs();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].id, DEFAULT_INSTANCE_ID);
        assert!(configs[0].encryption_key.is_none());
    }

    #[test]
    fn supplied_configuration_reaches_initialize_unchanged() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe.clone()));
        let factory = production_factory(bridge);

        let config = Configuration::new("a")
            .with_path("/data/a")
            .with_mode(Mode::MultiProcess)
            .read_only(true);
        factory.create(Some(config.clone())).unwrap();

        assert_eq!(probe.initialized_configs(), vec![config]);
    }

    #[test]
    fn partial_configuration_is_not_merged_with_defaults() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe.clone()));
        let factory = production_factory(bridge);

        factory.create(Some(Configuration::new("bare"))).unwrap();

        let configs = probe.initialized_configs();
        assert_eq!(configs[0].id, "bare");
        assert!(configs[0].path.is_none());
        assert!(configs[0].mode.is_none());
        assert!(configs[0].read_only.is_none());
    }
}

// ============================================================================
// Lifecycle ordering and trim registration
// ============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn initialize_runs_once_after_construction() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe.clone()));
        let factory = production_factory(bridge);

        factory.create(Some(Configuration::new("a"))).unwrap();

        assert_eq!(probe.events(), vec!["construct", "initialize"]);
    }

    #[test]
    fn returned_handle_is_registered_for_trimming() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe.clone()));
        let factory = production_factory(bridge);

        let handle = factory.create(Some(Configuration::new("a"))).unwrap();
        assert_eq!(factory.pressure().subscriber_count(), 1);

        factory.pressure().notify();
        assert_eq!(probe.events(), vec!["construct", "initialize", "trim"]);

        drop(handle);
        assert_eq!(factory.pressure().subscriber_count(), 0);
    }

    #[test]
    fn pressure_notification_trims_live_handles() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe));
        let factory = production_factory(bridge);

        let handle = factory.create(None).unwrap();
        factory.pressure().notify();
        factory.pressure().notify();

        // Data-path operations still work after trims.
        assert_eq!(handle.get("k").unwrap(), None);
    }

    #[test]
    fn registration_does_not_extend_handle_lifetime() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe));
        let factory = production_factory(bridge);

        let handle = factory.create(None).unwrap();
        let weak = Arc::downgrade(&handle);
        drop(handle);
        assert!(weak.upgrade().is_none());
    }
}

// ============================================================================
// Error propagation
// ============================================================================

mod error_propagation {
    use super::*;

    #[test]
    fn bridge_unavailable_propagates_and_skips_subscription() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::unavailable(probe.clone()));
        let factory = production_factory(bridge);

        let err = factory.create(None).err().unwrap();
        assert!(err.is_bridge_unavailable());
        assert!(probe.events().is_empty());
        assert_eq!(factory.pressure().subscriber_count(), 0);
    }

    #[test]
    fn initialization_error_propagates_and_skips_subscription() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::with_failing_initialize(probe.clone()));
        let factory = production_factory(bridge);

        let err = factory
            .create(Some(Configuration::new("bad")))
            .err()
            .unwrap();
        assert!(err.is_initialization());
        assert_eq!(probe.events(), vec!["construct", "initialize"]);
        assert_eq!(factory.pressure().subscriber_count(), 0);
    }

    #[test]
    fn failed_create_yields_no_handle_at_all() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::with_failing_initialize(probe));
        let factory = production_factory(bridge);

        assert!(factory.create(None).is_err());
    }
}

// ============================================================================
// Full scenario
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn production_create_walks_the_whole_lifecycle() {
        let probe = Arc::new(Probe::default());
        let bridge = Arc::new(CountingBridge::new(probe.clone()));
        let factory = production_factory(bridge.clone());

        let handle = factory.create(Some(Configuration::new("a"))).unwrap();

        assert_eq!(bridge.construct_count(), 1);
        assert_eq!(probe.events(), vec!["construct", "initialize"]);
        assert_eq!(probe.initialized_configs()[0].id, "a");
        assert_eq!(factory.pressure().subscriber_count(), 1);
        assert!(!handle.is_read_only());
    }

    #[test]
    fn test_create_yields_working_in_memory_store() {
        let factory = StoreFactory::builder()
            .environment(Environment::Test)
            .build();

        let store = factory.create(None).unwrap();
        store.set("k", Value::from("v")).unwrap();
        assert_eq!(store.get_string("k").unwrap().as_deref(), Some("v"));
    }
}
