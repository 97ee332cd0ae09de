//! Execution environment detection.
//!
//! The environment flag decides whether the factory produces live engine
//! handles or in-memory mocks. Process-wide detection happens exactly once
//! and is read-only afterwards; factories also accept an explicitly
//! injected value so both paths stay testable without mutating process
//! state.

use once_cell::sync::Lazy;

/// Environment variable consulted by [`Environment::detect`].
///
/// The value `test` (case-insensitive) selects the test environment;
/// anything else, or an unset variable, selects production.
pub const ENV_VAR: &str = "KVAULT_ENV";

static DETECTED: Lazy<Environment> =
    Lazy::new(|| Environment::from_var(std::env::var(ENV_VAR).ok().as_deref()));

/// Execution environment of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production host: live engine instances via the host bridge.
    Production,
    /// Test context: in-memory mocks, the bridge is never touched.
    Test,
}

impl Environment {
    /// The process environment, detected once from [`ENV_VAR`].
    ///
    /// Side-effect free after the first call; later changes to the
    /// variable are not observed.
    pub fn detect() -> Environment {
        *DETECTED
    }

    fn from_var(value: Option<&str>) -> Environment {
        match value {
            Some(v) if v.eq_ignore_ascii_case("test") => Environment::Test,
            _ => Environment::Production,
        }
    }

    /// Check if this is the test environment.
    pub fn is_test(self) -> bool {
        self == Environment::Test
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_other_values_mean_production() {
        assert_eq!(Environment::from_var(None), Environment::Production);
        assert_eq!(Environment::from_var(Some("prod")), Environment::Production);
        assert_eq!(Environment::from_var(Some("")), Environment::Production);
    }

    #[test]
    fn test_value_is_case_insensitive() {
        assert_eq!(Environment::from_var(Some("test")), Environment::Test);
        assert_eq!(Environment::from_var(Some("TEST")), Environment::Test);
        assert!(Environment::from_var(Some("Test")).is_test());
    }
}
