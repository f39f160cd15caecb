// ABOUTME: Environment configuration for upstream endpoints, client profile, and local storage
// ABOUTME: Parses and validates environment variables into a typed client configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration for the chat client

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use seek_chat_core::constants::{env_config, storage, upstream};
use seek_chat_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

/// Environment type for logging and diagnostics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Fixed descriptive values identifying this client to the chat service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// `User-Agent` header value
    pub user_agent: String,
    /// Application id header value
    pub app_id: String,
    /// Device descriptor; the device id field is appended per credential
    pub device_descriptor: String,
}

impl ClientProfile {
    /// Device-info header value for a credential issued to `device_id`
    #[must_use]
    pub fn device_info(&self, device_id: &str) -> String {
        let field = upstream::DEVICE_ID_FIELD;
        if self.device_descriptor.is_empty() {
            format!("{field}={device_id}")
        } else {
            format!("{};{field}={device_id}", self.device_descriptor)
        }
    }
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            user_agent: upstream::DEFAULT_USER_AGENT.to_owned(),
            app_id: upstream::DEFAULT_APP_ID.to_owned(),
            device_descriptor: upstream::DEFAULT_DEVICE_DESCRIPTOR.to_owned(),
        }
    }
}

/// Upstream endpoints and HTTP timeouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Credential endpoint
    pub auth_url: Url,
    /// Base URL for model listing and chat (always ends with `/`)
    pub api_base_url: Url,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Timeout for non-streaming requests
    pub request_timeout: Duration,
}

impl UpstreamConfig {
    /// Resolve `path` against the API base URL
    ///
    /// # Errors
    ///
    /// Returns a config error if the joined URL is invalid
    pub fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.api_base_url
            .join(path)
            .map_err(|e| AppError::config(format!("Invalid endpoint path {path}: {e}")))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            auth_url: constant_url(upstream::DEFAULT_AUTH_URL),
            api_base_url: constant_url(&format!("{}/", upstream::DEFAULT_API_URL)),
            connect_timeout: Duration::from_secs(upstream::DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(upstream::DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Location of the persistence slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding the storage files
    pub data_dir: PathBuf,
    /// Key of the conversation collection
    pub storage_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: storage::DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Upstream endpoints
    pub upstream: UpstreamConfig,
    /// Client profile headers
    pub profile: ClientProfile,
    /// Persistence slot
    pub storage: StorageConfig,
    /// Deployment environment
    pub environment: Environment,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if a URL or timeout variable is set but invalid
    pub fn from_env() -> AppResult<Self> {
        info!("Loading client configuration from environment variables");

        let config = Self {
            upstream: UpstreamConfig {
                auth_url: parse_url(env_config::AUTH_URL, upstream::DEFAULT_AUTH_URL)?,
                api_base_url: parse_base_url(env_config::API_URL, upstream::DEFAULT_API_URL)?,
                connect_timeout: Duration::from_secs(parse_secs(
                    env_config::CONNECT_TIMEOUT_SECS,
                    upstream::DEFAULT_CONNECT_TIMEOUT_SECS,
                )?),
                request_timeout: Duration::from_secs(parse_secs(
                    env_config::REQUEST_TIMEOUT_SECS,
                    upstream::DEFAULT_REQUEST_TIMEOUT_SECS,
                )?),
            },
            profile: ClientProfile {
                user_agent: env_var_or(env_config::USER_AGENT, upstream::DEFAULT_USER_AGENT),
                app_id: env_var_or(env_config::APP_ID, upstream::DEFAULT_APP_ID),
                device_descriptor: env_var_or(
                    env_config::DEVICE_DESCRIPTOR,
                    upstream::DEFAULT_DEVICE_DESCRIPTOR,
                ),
            },
            storage: StorageConfig {
                data_dir: env::var(env_config::DATA_DIR)
                    .map_or_else(|_| default_data_dir(), PathBuf::from),
                storage_key: env_var_or(env_config::STORAGE_KEY, storage::DEFAULT_STORAGE_KEY),
            },
            environment: Environment::from_str_or_default(&env_var_or(
                env_config::ENVIRONMENT,
                "development",
            )),
        };

        if config.storage.storage_key.trim().is_empty() {
            return Err(AppError::config(format!(
                "{} must not be empty",
                env_config::STORAGE_KEY
            )));
        }

        debug!(
            auth_url = %config.upstream.auth_url,
            api_base_url = %config.upstream.api_base_url,
            data_dir = %config.storage.data_dir.display(),
            environment = %config.environment,
            "Client configuration loaded"
        );

        Ok(config)
    }

    /// Override the storage directory (CLI flag)
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.storage.data_dir = data_dir.into();
        self
    }
}

/// Platform data directory, falling back to a directory under the working directory
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(storage::FALLBACK_DATA_DIR),
        |dir| dir.join(storage::DATA_DIR_NAME),
    )
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_url(key: &str, default: &str) -> AppResult<Url> {
    let raw = env_var_or(key, default);
    Url::parse(&raw).map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}")))
}

/// Base URLs must end with `/` so that `Url::join` appends instead of replacing
fn parse_base_url(key: &str, default: &str) -> AppResult<Url> {
    let mut raw = env_var_or(key, default);
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}")))
}

fn parse_secs(key: &str, default: u64) -> AppResult<u64> {
    env::var(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}")))
    })
}

fn constant_url(raw: &str) -> Url {
    // Only called with compile-time constants
    Url::parse(raw).unwrap_or_else(|e| unreachable!("invalid built-in URL {raw}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_appends_device_field() {
        let profile = ClientProfile {
            user_agent: "ua".to_owned(),
            app_id: "app".to_owned(),
            device_descriptor: "deviceType=desktop".to_owned(),
        };
        assert_eq!(
            profile.device_info("00ff"),
            "deviceType=desktop;androidId=00ff"
        );
    }

    #[test]
    fn test_device_info_without_descriptor() {
        let profile = ClientProfile {
            device_descriptor: String::new(),
            ..ClientProfile::default()
        };
        assert_eq!(profile.device_info("ab"), "androidId=ab");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("anything"),
            Environment::Development
        );
    }

    #[test]
    fn test_endpoint_joins_relative_path() {
        let upstream = UpstreamConfig {
            api_base_url: Url::parse("https://chat.example.com/api/").unwrap(),
            ..UpstreamConfig::default()
        };
        let url = upstream.endpoint("v3/chat/send").unwrap();
        assert_eq!(url.as_str(), "https://chat.example.com/api/v3/chat/send");
    }
}
