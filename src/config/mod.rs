// ABOUTME: Configuration management module for the chat client
// ABOUTME: Re-exports the environment-driven client configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! All configuration comes from environment variables (see
//! [`seek_chat_core::constants::env_config`]); CLI flags override individual
//! values after loading.

/// Environment-driven client configuration
pub mod environment;

pub use environment::{
    default_data_dir, ClientConfig, ClientProfile, Environment, StorageConfig, UpstreamConfig,
};
