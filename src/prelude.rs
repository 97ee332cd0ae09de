//! Convenient imports for Kvault.
//!
//! This module re-exports the most commonly used types so you can get
//! started with a single import:
//!
//! ```
//! use kvault::prelude::*;
//!
//! let factory = StoreFactory::builder().environment(Environment::Test).build();
//! let store = factory.create(None)?;
//! store.set("key", Value::from("value"))?;
//! # Ok::<(), Error>(())
//! ```

// Main entry point
pub use crate::factory::{create, StoreFactory, StoreFactoryBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Configuration
pub use crate::config::{resolve, Configuration, Mode, DEFAULT_INSTANCE_ID};

// Engine contract and values
pub use crate::store::{Handle, Store};
pub use crate::value::Value;

// Environment dispatch
pub use crate::env::Environment;

// Collaborators
pub use crate::bridge::{BridgeRegistry, HostBridge, STORE_TYPE_NAME};
pub use crate::mock::MockStore;
pub use crate::pressure::MemoryPressure;
