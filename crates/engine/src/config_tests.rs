// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults() {
    let config = RunnerConfig::default();
    assert_eq!(config.poll_interval_ms, 50);
    assert_eq!(config.ci_poll_interval_ms, 5_000);
}

#[test]
fn parses_toml_overrides() {
    let config = RunnerConfig::from_toml_str(
        "poll_interval_ms = 10\nci_poll_interval_ms = 100\n",
    )
    .unwrap();
    assert_eq!(config.poll_interval(), Duration::from_millis(10));
    assert_eq!(config.ci_poll_interval(), Duration::from_millis(100));
}

#[test]
fn empty_toml_keeps_defaults() {
    let config = RunnerConfig::from_toml_str("").unwrap();
    assert_eq!(config.poll_interval_ms, 50);
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(RunnerConfig::from_toml_str("pol_interval_ms = 10").is_err());
}
