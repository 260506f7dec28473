// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner configuration

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunable intervals for the engine and CI polling loops.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Upper bound on dispatch latency when no wakeup arrives.
    pub poll_interval_ms: u64,
    /// How often a CI run re-checks whether its jobs are still queued.
    pub ci_poll_interval_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            ci_poll_interval_ms: 5_000,
        }
    }
}

impl RunnerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn ci_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ci_poll_interval_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
