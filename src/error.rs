//! Unified error types for Kvault.
//!
//! This module provides a clean error type that presents a consistent
//! interface to users. Both fatal kinds propagate unchanged to the caller;
//! nothing is caught and converted at this layer.

use thiserror::Error;

/// All Kvault errors.
///
/// This is the canonical error type for all handle-layer operations.
/// A `create` call either yields a fully initialized, registered handle
/// or fails with one of these; there is no partial handle state.
#[derive(Debug, Error)]
pub enum Error {
    /// The host bridge cannot locate or construct the native store type.
    ///
    /// Fatal for that call. Not retried; the caller must re-invoke after
    /// fixing host setup.
    #[error("host bridge unavailable: {0}")]
    BridgeUnavailable(String),

    /// The engine rejected the configuration.
    ///
    /// Fatal for that call. The caller must supply a corrected
    /// configuration (valid identifier, accessible storage path,
    /// non-conflicting options).
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// Write attempted on a read-only instance.
    #[error("instance is read-only: {0}")]
    ReadOnly(String),
}

/// Result type for Kvault operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error came from the host bridge.
    pub fn is_bridge_unavailable(&self) -> bool {
        matches!(self, Error::BridgeUnavailable(_))
    }

    /// Check if this is an engine initialization rejection.
    pub fn is_initialization(&self) -> bool {
        matches!(self, Error::Initialization(_))
    }

    /// Check if this error is fatal for the originating `create` call.
    ///
    /// Fatal errors are never retried internally.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::BridgeUnavailable(_) | Error::Initialization(_))
    }
}
