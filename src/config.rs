//! Instance configuration and the configuration resolver.
//!
//! A [`Configuration`] describes how a store instance should be created.
//! [`resolve`] turns an optional configuration into a complete one: absent
//! configurations get the default identifier, supplied configurations pass
//! through untouched. There is deliberately no field-level merging — a
//! caller who supplies any configuration owns every field of it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identifier used when no configuration is supplied.
pub const DEFAULT_INSTANCE_ID: &str = "kvault.default";

/// Process-sharing mode for a store instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Instance is accessed from a single process (default).
    SingleProcess,
    /// Instance may be shared across processes; locking is the engine's
    /// concern.
    MultiProcess,
}

/// Configuration for a store instance.
///
/// Immutable once handed to [`crate::StoreFactory::create`]. Only `id` is
/// required; every option is engine-defined and passed through opaquely.
///
/// # Example
///
/// ```
/// use kvault::Configuration;
///
/// let config = Configuration::new("user-storage")
///     .with_encryption_key("hunter2")
///     .read_only(false);
/// assert_eq!(config.id, "user-storage");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Unique instance identifier. A resolved configuration always has a
    /// non-empty id; an explicitly empty one is rejected by the engine at
    /// initialization.
    pub id: String,

    /// Base directory for the instance files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Encryption key for the instance contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<String>,

    /// Process-sharing mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    /// Open the instance read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

impl Configuration {
    /// Create a configuration with the given id and no options set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: None,
            encryption_key: None,
            mode: None,
            read_only: None,
        }
    }

    /// Set the base directory.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the encryption key.
    pub fn with_encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    /// Set the process-sharing mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the read-only flag.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    /// Check whether an encryption key is set.
    pub fn is_encrypted(&self) -> bool {
        self.encryption_key.is_some()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new(DEFAULT_INSTANCE_ID)
    }
}

/// Resolve an optional configuration into a complete one.
///
/// `None` yields [`Configuration::default`] (the sentinel id, no options).
/// `Some` passes through unchanged: partial configurations are not merged
/// with defaults, so supplying a configuration opts the caller fully out of
/// the default id unless they include it themselves.
///
/// Pure; no failure conditions.
pub fn resolve(config: Option<Configuration>) -> Configuration {
    config.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_none_yields_default_id() {
        let config = resolve(None);
        assert_eq!(config.id, DEFAULT_INSTANCE_ID);
        assert!(config.path.is_none());
        assert!(config.encryption_key.is_none());
        assert!(config.mode.is_none());
        assert!(config.read_only.is_none());
    }

    #[test]
    fn resolve_some_passes_through_unchanged() {
        let config = Configuration::new("user-storage")
            .with_path("/data/stores")
            .with_mode(Mode::MultiProcess);
        let resolved = resolve(Some(config.clone()));
        assert_eq!(resolved, config);
    }

    #[test]
    fn resolve_does_not_merge_defaults_into_partial_config() {
        // A supplied configuration with an empty id stays empty; the
        // default id is never merged in.
        let resolved = resolve(Some(Configuration::new("")));
        assert_eq!(resolved.id, "");
    }

    #[test]
    fn builder_sets_options() {
        let config = Configuration::new("secure")
            .with_encryption_key("0123456789abcdef")
            .read_only(true);
        assert!(config.is_encrypted());
        assert_eq!(config.read_only, Some(true));
    }

    #[test]
    fn serde_round_trip() {
        let config = Configuration::new("user-storage").with_mode(Mode::SingleProcess);
        let json = serde_json::to_string(&config).unwrap();
        let back: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn serde_id_only_leaves_options_unset() {
        let config: Configuration = serde_json::from_str(r#"{"id":"a"}"#).unwrap();
        assert_eq!(config.id, "a");
        assert!(config.path.is_none());
        assert!(config.read_only.is_none());
    }

    #[test]
    fn serde_rejects_missing_id() {
        assert!(serde_json::from_str::<Configuration>("{}").is_err());
    }
}
