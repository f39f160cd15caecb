// ABOUTME: Identity provider obtaining a bearer credential and synthetic device id from the chat service
// ABOUTME: Every acquisition fabricates a fresh random secret and device identifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Identity Provider
//!
//! Acquisition is not idempotent: each call presents a new device to the
//! service. Callers cache the returned credential and call again only after a
//! dependent request fails.

use std::time::Duration;

use async_trait::async_trait;
use rand::RngCore;
use reqwest::Client;
use seek_chat_core::constants::upstream::{
    ACCESS_TOKEN_HEADER, APP_ID_HEADER, DEVICE_ID_BYTES, DEVICE_INFO_HEADER,
};
use seek_chat_core::errors::{AppError, AppResult};
use seek_chat_core::models::Credential;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::config::{ClientConfig, ClientProfile};
use crate::logging::AppLogger;

/// Source of credentials for the chat service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Obtain a new credential
    ///
    /// # Errors
    ///
    /// Returns `AuthUnavailable` when the handshake does not yield a usable token
    async fn acquire(&self) -> AppResult<Credential>;
}

#[derive(Serialize)]
struct SecretRequest<'a> {
    secret: &'a str,
}

#[derive(Deserialize)]
struct TokenEnvelope {
    data: Option<TokenData>,
}

#[derive(Deserialize)]
struct TokenData {
    token: Option<String>,
}

/// Identity provider performing the secret-for-token handshake over HTTP
pub struct DeviceIdentityProvider {
    client: Client,
    auth_url: Url,
    profile: ClientProfile,
    request_timeout: Duration,
}

impl DeviceIdentityProvider {
    /// Create a provider using the endpoint and profile from `config`
    #[must_use]
    pub fn new(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            auth_url: config.upstream.auth_url.clone(),
            profile: config.profile.clone(),
            request_timeout: config.upstream.request_timeout,
        }
    }

    /// Random device identifier: 8 random bytes as lowercase hex
    #[must_use]
    pub fn generate_device_id() -> String {
        let mut bytes = [0_u8; DEVICE_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Extract the token from a handshake response body
    ///
    /// # Errors
    ///
    /// Returns `AuthUnavailable` if the body is not JSON or carries no token
    pub fn parse_token(body: &str) -> AppResult<String> {
        let envelope: TokenEnvelope = serde_json::from_str(body).map_err(|e| {
            AppError::auth_unavailable(format!("Token response is not valid JSON: {e}"))
        })?;
        envelope
            .data
            .and_then(|data| data.token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::auth_unavailable("Token not found in response"))
    }

    async fn handshake(&self, device_id: &str) -> AppResult<String> {
        let secret = Uuid::new_v4().to_string();

        let response = self
            .client
            .post(self.auth_url.clone())
            .timeout(self.request_timeout)
            .header(APP_ID_HEADER, &self.profile.app_id)
            .header(DEVICE_INFO_HEADER, self.profile.device_info(device_id))
            .header(ACCESS_TOKEN_HEADER, "")
            .json(&SecretRequest { secret: &secret })
            .send()
            .await
            .map_err(|e| {
                AppError::auth_unavailable(format!("Failed to reach credential endpoint: {e}"))
                    .with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::auth_unavailable(format!(
                "Credential endpoint returned HTTP {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            AppError::auth_unavailable(format!("Failed to read credential response: {e}"))
                .with_source(e)
        })?;
        Self::parse_token(&body)
    }
}

#[async_trait]
impl IdentityProvider for DeviceIdentityProvider {
    #[instrument(skip(self), fields(auth_url = %self.auth_url))]
    async fn acquire(&self) -> AppResult<Credential> {
        let device_id = Self::generate_device_id();
        debug!(device.id = %device_id, "Requesting credential");

        match self.handshake(&device_id).await {
            Ok(token) => {
                AppLogger::log_credential_event(Some(&device_id), true, None);
                Ok(Credential::new(token, device_id))
            }
            Err(e) => {
                AppLogger::log_credential_event(Some(&device_id), false, Some(&e.message));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_is_sixteen_hex_chars() {
        let id = DeviceIdentityProvider::generate_device_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_device_ids_are_not_reused() {
        assert_ne!(
            DeviceIdentityProvider::generate_device_id(),
            DeviceIdentityProvider::generate_device_id()
        );
    }

    #[test]
    fn test_parse_token_success() {
        let token = DeviceIdentityProvider::parse_token(r#"{"data":{"token":"abc"}}"#).unwrap();
        assert_eq!(token, "abc");
    }

    #[test]
    fn test_parse_token_missing_field_is_auth_unavailable() {
        for body in [r#"{"data":{}}"#, r#"{"data":{"token":""}}"#, "{}", "<html>"] {
            let err = DeviceIdentityProvider::parse_token(body).unwrap_err();
            assert_eq!(
                err.code,
                seek_chat_core::errors::ErrorCode::AuthUnavailable,
                "{body}"
            );
        }
    }
}
