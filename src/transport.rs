// ABOUTME: HTTP transport for the model listing and streaming chat endpoints
// ABOUTME: Defines the transport trait seam used by the controller and its reqwest implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use seek_chat_core::constants::upstream::{
    ACCESS_TOKEN_HEADER, APP_ID_HEADER, DEVICE_INFO_HEADER, LIST_MODELS_PATH, SEND_PATH,
};
use seek_chat_core::errors::{AppError, AppResult};
use seek_chat_core::models::{Credential, ModelDescriptor};
use serde::{Deserialize, Serialize};
use tokio_stream::Stream;
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::{ClientConfig, ClientProfile, UpstreamConfig};

/// Response body of a chat request, chunk by chunk
pub type ByteStream = Pin<Box<dyn Stream<Item = AppResult<Bytes>> + Send>>;

/// Outbound chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    /// Upstream session id of the conversation
    pub session_id: String,
    /// Active model id
    #[serde(rename = "model")]
    pub model_id: String,
    /// Raw user text
    pub text: String,
    /// Attachments are never sent
    pub image_s3_keys: Option<Vec<String>>,
    /// Attachments are never sent
    pub file_s3_keys: Option<Vec<String>>,
    /// Web search is never enabled
    pub web_search: bool,
}

impl SendRequest {
    /// Plain-text request with attachments and web search disabled
    #[must_use]
    pub fn new(
        session_id: impl Into<String>,
        model_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            model_id: model_id.into(),
            text: text.into(),
            image_s3_keys: None,
            file_s3_keys: None,
            web_search: false,
        }
    }
}

/// Chat service operations that need a credential
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetch the ordered model catalog
    ///
    /// # Errors
    ///
    /// `AuthUnavailable` if the credential is rejected, `CatalogUnavailable` otherwise
    async fn list_models(&self, credential: &Credential) -> AppResult<Vec<ModelDescriptor>>;

    /// Dispatch a chat request and return its response body as a byte stream
    ///
    /// # Errors
    ///
    /// `AuthUnavailable` if the credential is rejected, `SendFailed` otherwise
    async fn send(&self, credential: &Credential, request: &SendRequest) -> AppResult<ByteStream>;
}

#[derive(Deserialize)]
struct ModelsEnvelope {
    data: Option<ModelsData>,
}

#[derive(Deserialize)]
struct ModelsData {
    models: Option<Vec<ModelDescriptor>>,
}

/// Build the shared HTTP client
///
/// Only the connect timeout is set here: a whole-request timeout would cut
/// off long streamed replies. Non-streaming calls set their own timeout.
///
/// # Errors
///
/// Returns a config error if the TLS backend cannot be initialized
pub fn build_http_client(upstream: &UpstreamConfig, profile: &ClientProfile) -> AppResult<Client> {
    Client::builder()
        .user_agent(profile.user_agent.clone())
        .connect_timeout(upstream.connect_timeout)
        .build()
        .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")).with_source(e))
}

/// [`ChatTransport`] over HTTP
pub struct HttpChatTransport {
    client: Client,
    list_models_url: Url,
    send_url: Url,
    profile: ClientProfile,
    request_timeout: Duration,
}

impl HttpChatTransport {
    /// Create a transport for the endpoints in `config`
    ///
    /// # Errors
    ///
    /// Returns a config error if an endpoint URL cannot be built
    pub fn new(client: Client, config: &ClientConfig) -> AppResult<Self> {
        Ok(Self {
            client,
            list_models_url: config.upstream.endpoint(LIST_MODELS_PATH)?,
            send_url: config.upstream.endpoint(SEND_PATH)?,
            profile: config.profile.clone(),
            request_timeout: config.upstream.request_timeout,
        })
    }

    fn authenticated(&self, builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
        builder
            .header(APP_ID_HEADER, &self.profile.app_id)
            .header(DEVICE_INFO_HEADER, self.profile.device_info(&credential.device_id))
            .header(ACCESS_TOKEN_HEADER, &credential.token)
    }

    fn is_auth_rejection(status: StatusCode) -> bool {
        matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
    }

    /// Extract the model list from a listing response body
    ///
    /// # Errors
    ///
    /// Returns `CatalogUnavailable` if the body has no model list
    pub fn parse_models(body: &str) -> AppResult<Vec<ModelDescriptor>> {
        let envelope: ModelsEnvelope = serde_json::from_str(body).map_err(|e| {
            AppError::catalog_unavailable(format!("Model list is not valid JSON: {e}"))
        })?;
        envelope
            .data
            .and_then(|data| data.models)
            .ok_or_else(|| AppError::catalog_unavailable("Model list not found in response"))
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    #[instrument(skip_all, fields(url = %self.list_models_url))]
    async fn list_models(&self, credential: &Credential) -> AppResult<Vec<ModelDescriptor>> {
        let response = self
            .authenticated(self.client.get(self.list_models_url.clone()), credential)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach model listing endpoint: {}", e);
                AppError::catalog_unavailable(format!("Failed to connect: {e}")).with_source(e)
            })?;

        let status = response.status();
        if Self::is_auth_rejection(status) {
            return Err(AppError::auth_unavailable(format!(
                "Model listing rejected credential: HTTP {status}"
            )));
        }
        if !status.is_success() {
            return Err(AppError::catalog_unavailable(format!(
                "Model listing returned HTTP {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            AppError::catalog_unavailable(format!("Failed to read model list: {e}")).with_source(e)
        })?;
        let models = Self::parse_models(&body)?;
        debug!(count = models.len(), "Fetched model catalog");
        Ok(models)
    }

    #[instrument(skip_all, fields(session.id = %request.session_id, model.id = %request.model_id))]
    async fn send(&self, credential: &Credential, request: &SendRequest) -> AppResult<ByteStream> {
        let response = self
            .authenticated(self.client.post(self.send_url.clone()), credential)
            .header(ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send chat request: {}", e);
                AppError::send_failed(format!("Failed to connect: {e}")).with_source(e)
            })?;

        let status = response.status();
        if Self::is_auth_rejection(status) {
            return Err(AppError::auth_unavailable(format!(
                "Chat endpoint rejected credential: HTTP {status}"
            )));
        }
        if !status.is_success() {
            return Err(AppError::send_failed(format!(
                "Chat endpoint returned HTTP {status}"
            )));
        }

        debug!("Chat response stream opened");
        let stream = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| {
                AppError::send_failed(format!("Stream read error: {e}")).with_source(e)
            })
        });
        Ok(Box::pin(stream))
    }
}
