// ABOUTME: Unit tests for logging configuration
// ABOUTME: Validates format selection, levels, and subscriber installation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use seek_chat::logging::{AppLogger, LogFormat, LoggingConfig};
use serial_test::serial;

const LOG_VARS: &[&str] = &[
    "RUST_LOG",
    "LOG_FORMAT",
    "ENVIRONMENT",
    "LOG_INCLUDE_LOCATION",
    "LOG_INCLUDE_SPANS",
    "SERVICE_NAME",
];

fn clear_env() {
    for var in LOG_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_are_quiet_and_compact() {
    clear_env();
    let config = LoggingConfig::from_env();

    assert_eq!(config.level, "warn");
    assert_eq!(config.format, LogFormat::Compact);
    assert!(!config.include_location);
    assert!(!config.include_spans);
    assert_eq!(config.service_name, "seek-chat");
    assert_eq!(config.environment, "development");
}

#[test]
#[serial]
fn test_log_format_selection() {
    clear_env();
    for (raw, expected) in [
        ("json", LogFormat::Json),
        ("pretty", LogFormat::Pretty),
        ("compact", LogFormat::Compact),
        ("something-else", LogFormat::Compact),
    ] {
        env::set_var("LOG_FORMAT", raw);
        assert_eq!(LoggingConfig::from_env().format, expected, "{raw}");
    }
    clear_env();
}

#[test]
#[serial]
fn test_production_includes_location() {
    clear_env();
    env::set_var("ENVIRONMENT", "production");
    env::set_var("RUST_LOG", "info");
    env::set_var("LOG_INCLUDE_SPANS", "1");
    let config = LoggingConfig::from_env();
    clear_env();

    assert!(config.include_location);
    assert!(config.include_spans);
    assert_eq!(config.level, "info");
}

#[test]
fn test_verbose_raises_level() {
    let config = LoggingConfig::default().verbose();
    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Compact);
}

#[test]
fn test_env_filter_quiets_http_internals() {
    let filter = LoggingConfig::default().env_filter().to_string();
    assert!(filter.contains("hyper=warn"));
    assert!(filter.contains("reqwest=warn"));
}

#[test]
fn test_subscriber_installs_once() {
    let config = LoggingConfig::default();
    assert!(config.init().is_ok());
    assert!(config.init().is_err());

    AppLogger::log_credential_event(Some("00ff"), true, None);
    AppLogger::log_stream_completed("conversation", 3, 1, 12, 40);
    AppLogger::log_storage_operation("write", "key", false, Some("disk full"));
}
