//! Test Runner Detection
//!
//! Decides whether the mock should clean up after itself. This is the only
//! place the process environment is inspected for that purpose.

use serde::{Deserialize, Serialize};
use std::env;

/// Variables set by cargo-nextest for every test process
const WORKER_ID_VARS: [&str; 2] = ["NEXTEST_RUN_ID", "NEXTEST_TEST_GLOBAL_SLOT"];

/// Variables conventionally set to `test` when running a test suite
const TEST_MODE_VARS: [&str; 2] = ["RUST_ENV", "APP_ENV"];

/// How a test runner was detected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestRunner {
    /// A runner exposing a worker/run id
    Worker {
        /// Name of the variable that was found
        variable: String,
        /// Its value
        id: String,
    },
    /// A `*_ENV=test` style variable
    TestMode {
        /// Name of the variable that was found
        variable: String,
    },
}

impl TestRunner {
    /// Detect a test runner from the process environment
    #[must_use]
    pub fn detect() -> Option<Self> {
        Self::detect_with(|key| env::var(key).ok())
    }

    /// Detect a test runner using `lookup` to read variables
    pub fn detect_with<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        for variable in WORKER_ID_VARS {
            if let Some(id) = lookup(variable).filter(|id| !id.is_empty()) {
                return Some(Self::Worker {
                    variable: variable.to_string(),
                    id,
                });
            }
        }
        for variable in TEST_MODE_VARS {
            if lookup(variable).is_some_and(|mode| mode.eq_ignore_ascii_case("test")) {
                return Some(Self::TestMode {
                    variable: variable.to_string(),
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_nothing_detected() {
        assert_eq!(TestRunner::detect_with(env_of(&[])), None);
    }

    #[test]
    fn test_worker_id() {
        let runner = TestRunner::detect_with(env_of(&[("NEXTEST_RUN_ID", "abc-123")]));
        assert_eq!(
            runner,
            Some(TestRunner::Worker {
                variable: "NEXTEST_RUN_ID".to_string(),
                id: "abc-123".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_worker_id_ignored() {
        assert_eq!(TestRunner::detect_with(env_of(&[("NEXTEST_RUN_ID", "")])), None);
    }

    #[test]
    fn test_test_mode() {
        let runner = TestRunner::detect_with(env_of(&[("APP_ENV", "TEST")]));
        assert_eq!(
            runner,
            Some(TestRunner::TestMode {
                variable: "APP_ENV".to_string()
            })
        );
        assert_eq!(
            TestRunner::detect_with(env_of(&[("RUST_ENV", "production")])),
            None
        );
    }

    #[test]
    fn test_worker_id_takes_precedence() {
        let runner = TestRunner::detect_with(env_of(&[
            ("RUST_ENV", "test"),
            ("NEXTEST_TEST_GLOBAL_SLOT", "4"),
        ]));
        assert!(matches!(runner, Some(TestRunner::Worker { .. })));
    }
}
