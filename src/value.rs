//! Value types for Kvault.
//!
//! This module defines the canonical value type carried through the
//! key-value operation surface.
//!
//! ## Equality Rules
//!
//! - Different types are NEVER equal (no type coercion)
//! - `String("abc")` != `Bytes([97, 98, 99])`
//! - Number uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use serde::{Deserialize, Serialize};

/// Canonical Kvault value type.
///
/// The engine stores exactly these four shapes; typed getters on
/// [`crate::Store`] return `None` rather than coerce across them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean true or false
    Bool(bool),

    /// 64-bit IEEE-754 floating point
    /// Supports: NaN, +Inf, -Inf, -0.0, subnormals
    Number(f64),

    /// UTF-8 encoded string
    String(String),

    /// Arbitrary binary data
    /// NOT equivalent to String - distinct type
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as byte slice
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Approximate in-memory payload size in bytes.
    ///
    /// Used for size accounting; not a wire format.
    pub fn approximate_size(&self) -> usize {
        match self {
            Value::Bool(_) => 1,
            Value::Number(_) => 8,
            Value::String(s) => s.len(),
            Value::Bytes(b) => b.len(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}
