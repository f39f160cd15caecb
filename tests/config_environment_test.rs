// ABOUTME: Unit tests for environment-driven client configuration
// ABOUTME: Validates defaults, overrides, and rejection of invalid values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use seek_chat::config::{ClientConfig, Environment};
use seek_chat::constants::env_config;
use seek_chat::errors::ErrorCode;
use serial_test::serial;

const ALL_VARS: &[&str] = &[
    env_config::AUTH_URL,
    env_config::API_URL,
    env_config::DATA_DIR,
    env_config::STORAGE_KEY,
    env_config::APP_ID,
    env_config::USER_AGENT,
    env_config::DEVICE_DESCRIPTOR,
    env_config::CONNECT_TIMEOUT_SECS,
    env_config::REQUEST_TIMEOUT_SECS,
    env_config::ENVIRONMENT,
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ClientConfig::from_env().unwrap();

    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.storage.storage_key, "chatAppConversations_v3");
    assert_eq!(config.upstream.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.upstream.request_timeout, Duration::from_secs(30));
    assert!(config.upstream.auth_url.as_str().starts_with("http://localhost:8787/"));
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var(env_config::AUTH_URL, "https://auth.example.com/token");
    env::set_var(env_config::API_URL, "https://chat.example.com/api/");
    env::set_var(env_config::DATA_DIR, "/tmp/seek-chat-test");
    env::set_var(env_config::STORAGE_KEY, "otherKey");
    env::set_var(env_config::APP_ID, "my-app");
    env::set_var(env_config::USER_AGENT, "my-agent/1.0");
    env::set_var(env_config::DEVICE_DESCRIPTOR, "deviceType=test");
    env::set_var(env_config::CONNECT_TIMEOUT_SECS, "3");
    env::set_var(env_config::REQUEST_TIMEOUT_SECS, " 45 ");
    env::set_var(env_config::ENVIRONMENT, "production");

    let config = ClientConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.upstream.auth_url.as_str(), "https://auth.example.com/token");
    assert_eq!(
        config.upstream.endpoint("v3/chat/send").unwrap().as_str(),
        "https://chat.example.com/api/v3/chat/send"
    );
    assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/seek-chat-test"));
    assert_eq!(config.storage.storage_key, "otherKey");
    assert_eq!(config.profile.app_id, "my-app");
    assert_eq!(config.profile.user_agent, "my-agent/1.0");
    assert_eq!(config.profile.device_info("01"), "deviceType=test;androidId=01");
    assert_eq!(config.upstream.connect_timeout, Duration::from_secs(3));
    assert_eq!(config.upstream.request_timeout, Duration::from_secs(45));
    assert!(config.environment.is_production());
}

#[test]
#[serial]
fn test_base_url_without_trailing_slash_still_joins() {
    clear_env();
    env::set_var(env_config::API_URL, "https://chat.example.com/api");
    let config = ClientConfig::from_env().unwrap();
    clear_env();

    assert_eq!(
        config.upstream.endpoint("v1/chat/list_models").unwrap().as_str(),
        "https://chat.example.com/api/v1/chat/list_models"
    );
}

#[test]
#[serial]
fn test_invalid_url_is_config_error() {
    clear_env();
    env::set_var(env_config::AUTH_URL, "not a url");
    let err = ClientConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigError);
    assert!(err.message.contains(env_config::AUTH_URL));
}

#[test]
#[serial]
fn test_invalid_timeout_is_config_error() {
    clear_env();
    env::set_var(env_config::REQUEST_TIMEOUT_SECS, "soon");
    let err = ClientConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_empty_storage_key_is_rejected() {
    clear_env();
    env::set_var(env_config::STORAGE_KEY, "  ");
    let err = ClientConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
fn test_with_data_dir_overrides_only_storage_dir() {
    let config = ClientConfig::default().with_data_dir("/var/lib/chat");
    assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/chat"));
    assert_eq!(config.upstream, ClientConfig::default().upstream);
}
