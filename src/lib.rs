//! # Kvault
//!
//! Handle layer for an embedded persistent key-value store.
//!
//! Kvault resolves a caller's configuration into a concrete store
//! instance, guarantees the instance is initialized before use,
//! substitutes an in-memory stand-in outside production hosts, and keeps
//! the store's footprint bounded under memory pressure.
//!
//! ## Quick Start
//!
//! ```
//! use kvault::{Configuration, Environment, Store, StoreFactory, Value};
//!
//! // Explicit test environment: in-memory mock, no host bridge needed.
//! let factory = StoreFactory::builder()
//!     .environment(Environment::Test)
//!     .build();
//!
//! let store = factory.create(Some(Configuration::new("user-storage")))?;
//! store.set("name", Value::from("Alice"))?;
//! assert_eq!(store.get_string("name")?.as_deref(), Some("Alice"));
//! # Ok::<(), kvault::Error>(())
//! ```
//!
//! ## Production hosts
//!
//! A production host registers the native engine constructor with the
//! bridge registry at startup; [`create`] then produces live, initialized
//! handles registered for memory-pressure trimming:
//!
//! ```ignore
//! use kvault::{create, BridgeRegistry, Configuration, STORE_TYPE_NAME};
//!
//! BridgeRegistry::global().register(STORE_TYPE_NAME, || Ok(engine_handle()?));
//!
//! let store = create(Some(Configuration::new("user-storage")))?;
//! ```
//!
//! The storage engine itself — persistence, encryption, multi-process
//! locking — lives behind the [`Store`] trait and is not implemented here.

#![warn(missing_docs)]

mod bridge;
mod config;
mod env;
mod error;
mod factory;
mod listeners;
mod mock;
mod pressure;
mod store;
mod value;

pub mod prelude;

// Re-export main entry points
pub use factory::{create, StoreFactory, StoreFactoryBuilder};

// Re-export error handling
pub use error::{Error, Result};

// Re-export configuration
pub use config::{resolve, Configuration, Mode, DEFAULT_INSTANCE_ID};

// Re-export the engine contract and collaborators
pub use bridge::{BridgeRegistry, HostBridge, STORE_TYPE_NAME};
pub use env::{Environment, ENV_VAR};
pub use listeners::{ListenerId, Subscription, ValueChangedListener};
pub use mock::MockStore;
pub use pressure::MemoryPressure;
pub use store::{Handle, Store};
pub use value::Value;
