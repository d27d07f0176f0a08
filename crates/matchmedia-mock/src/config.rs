//! Mock Configuration
//!
//! Configuration for [`MockMatchMedia`](crate::MockMatchMedia), either built
//! in code or read from the environment.

use crate::lifecycle::TestRunner;
use crate::result::{MediaError, MediaResult};
use crate::value::MediaValues;
use serde::{Deserialize, Serialize};
use std::env;

/// Overrides test runner detection (`1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`)
pub const AUTO_CLEANUP_ENV: &str = "MATCHMEDIA_MOCK_AUTO_CLEANUP";

/// JSON object of baseline feature values, e.g. `{"type": "screen"}`
pub const VALUES_ENV: &str = "MATCHMEDIA_MOCK_VALUES";

/// Configuration for the `matchMedia` mock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MockConfig {
    /// Restore the original binding when the mock is dropped
    pub auto_cleanup: bool,
    /// Values applied on install and again after every clear
    pub initial_values: MediaValues,
}

impl MockConfig {
    /// Create a config with no cleanup and no baseline values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment.
    ///
    /// `auto_cleanup` is on when a test runner is detected unless
    /// [`AUTO_CLEANUP_ENV`] says otherwise.
    pub fn from_env() -> MediaResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration using `lookup` to read variables
    pub fn from_lookup<F>(lookup: F) -> MediaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auto_cleanup = match lookup(AUTO_CLEANUP_ENV) {
            Some(flag) => parse_flag(AUTO_CLEANUP_ENV, &flag)?,
            None => TestRunner::detect_with(&lookup).is_some(),
        };
        let initial_values = match lookup(VALUES_ENV) {
            Some(json) => MediaValues::from_json(&json).map_err(|err| MediaError::Config {
                message: format!("{VALUES_ENV}: {err}"),
            })?,
            None => MediaValues::new(),
        };
        Ok(Self {
            auto_cleanup,
            initial_values,
        })
    }

    /// Enable/disable restoring on drop
    #[must_use]
    pub fn with_auto_cleanup(mut self, enabled: bool) -> Self {
        self.auto_cleanup = enabled;
        self
    }

    /// Set baseline values
    #[must_use]
    pub fn with_initial_values(mut self, values: MediaValues) -> Self {
        self.initial_values = values;
        self
    }
}

fn parse_flag(variable: &str, value: &str) -> MediaResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(MediaError::Config {
            message: format!("{variable}: expected a boolean, got {other:?}"),
        }),
    }
}
