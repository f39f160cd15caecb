// ABOUTME: Conversation controller orchestrating identity, sessions, storage, transport, and streaming
// ABOUTME: Owns the application state and the per-conversation in-flight request registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Conversation Controller
//!
//! All mutable application state (conversation store, model catalog, cached
//! credential) lives here. Initialization order is fixed: load persisted
//! conversations, resume or create the active one, then acquire a credential
//! and load the catalog. Neither network step is required for local use.
//!
//! ## Request lifecycle
//!
//! Each send registers a token `(conversation id, generation)`. At most one
//! token exists per conversation. Switching or creating a conversation
//! cancels every outstanding token; a stream whose token is no longer current
//! stops reading and commits nothing. Replies are committed to the
//! conversation that issued the request, looked up by id.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Instant;

use seek_chat_core::constants::conversation::SEND_ERROR_MESSAGE;
use seek_chat_core::errors::{AppError, AppResult, ErrorCode};
use seek_chat_core::models::{
    ActiveModel, Conversation, ConversationSummary, Credential, ModelDescriptor,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::catalog::ModelCatalog;
use crate::config::ClientConfig;
use crate::identity::{DeviceIdentityProvider, IdentityProvider};
use crate::logging::AppLogger;
use crate::render::{MessageHandle, RenderSink};
use crate::storage::{FileStorage, StorageBackend};
use crate::store::ConversationStore;
use crate::stream::{assemble, StreamAssembler};
use crate::transport::{build_http_client, ChatTransport, HttpChatTransport, SendRequest};

/// Token identifying one outstanding request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    /// Conversation that issued the request
    pub conversation_id: String,
    /// Process-wide generation number
    pub generation: u64,
}

impl RequestToken {
    /// Render handle of the reply produced by this request
    #[must_use]
    pub fn handle(&self) -> MessageHandle {
        MessageHandle {
            conversation_id: self.conversation_id.clone(),
            generation: self.generation,
        }
    }
}

/// Registry of outstanding requests, one per conversation
#[derive(Debug, Default)]
pub struct InFlightRequests {
    generation: AtomicU64,
    active: std::sync::Mutex<HashMap<String, u64>>,
}

impl InFlightRequests {
    /// Register a request for `conversation_id`
    ///
    /// # Errors
    ///
    /// Returns `SendInFlight` if the conversation already has one
    pub fn try_register(&self, conversation_id: &str) -> AppResult<RequestToken> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.contains_key(conversation_id) {
            return Err(AppError::send_in_flight(conversation_id));
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        active.insert(conversation_id.to_owned(), generation);
        Ok(RequestToken {
            conversation_id: conversation_id.to_owned(),
            generation,
        })
    }

    /// Whether `token` has not been cancelled or completed
    #[must_use]
    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&token.conversation_id)
            == Some(&token.generation)
    }

    /// Release `token`; returns `false` if it was no longer current
    pub fn complete(&self, token: &RequestToken) -> bool {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.get(&token.conversation_id) == Some(&token.generation) {
            active.remove(&token.conversation_id);
            true
        } else {
            false
        }
    }

    /// Cancel every outstanding request; returns how many were cancelled
    pub fn cancel_all(&self) -> usize {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let cancelled = active.len();
        active.clear();
        cancelled
    }

    /// Whether `conversation_id` has an outstanding request
    #[must_use]
    pub fn is_busy(&self, conversation_id: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(conversation_id)
    }
}

/// Result of one send
#[derive(Debug)]
pub enum SendOutcome {
    /// The reply was streamed and committed
    Completed(String),
    /// Dispatch or streaming failed; an error message was committed instead
    Failed(AppError),
    /// The request was cancelled; nothing was committed for it
    Cancelled,
    /// The send was refused before any side effect
    Rejected(AppError),
}

/// What [`ConversationController::initialize`] managed to set up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    /// Valid persisted data was found
    pub restored: bool,
    /// A credential was acquired
    pub authenticated: bool,
    /// The model catalog was fetched
    pub catalog_loaded: bool,
}

/// Orchestrates the conversation lifecycle
pub struct ConversationController {
    store: Mutex<ConversationStore>,
    catalog: Mutex<ModelCatalog>,
    credential: Mutex<Option<Credential>>,
    in_flight: InFlightRequests,
    identity: Arc<dyn IdentityProvider>,
    transport: Arc<dyn ChatTransport>,
    renderer: Arc<dyn RenderSink>,
}

impl ConversationController {
    /// Create a controller over explicit collaborators
    #[must_use]
    pub fn new(
        store: ConversationStore,
        identity: Arc<dyn IdentityProvider>,
        transport: Arc<dyn ChatTransport>,
        renderer: Arc<dyn RenderSink>,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            catalog: Mutex::new(ModelCatalog::new()),
            credential: Mutex::new(None),
            in_flight: InFlightRequests::default(),
            identity,
            transport,
            renderer,
        }
    }

    /// Create a controller wired to the HTTP service and file storage in `config`
    ///
    /// # Errors
    ///
    /// Returns a config error if the HTTP client or endpoints cannot be built
    pub fn from_config(config: &ClientConfig, renderer: Arc<dyn RenderSink>) -> AppResult<Self> {
        let client = build_http_client(&config.upstream, &config.profile)?;
        let backend: Arc<dyn StorageBackend> =
            Arc::new(FileStorage::new(config.storage.data_dir.clone()));
        let store = ConversationStore::new(backend, config.storage.storage_key.clone());
        let identity = Arc::new(DeviceIdentityProvider::new(client.clone(), config));
        let transport = Arc::new(HttpChatTransport::new(client, config)?);
        Ok(Self::new(store, identity, transport, renderer))
    }

    /// Load persisted state, resume a conversation, then authenticate and load the catalog
    ///
    /// Never fails: authentication and catalog failures degrade the
    /// corresponding features and are reported in the returned summary.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> InitReport {
        let (restored, conversation, summaries) = {
            let mut store = self.store.lock().await;
            let restored = store.load();
            let conversation = Self::resume(&mut store);
            (restored, conversation, store.summaries())
        };
        self.renderer.render_conversation_list(&summaries);
        self.renderer.render_conversation(&conversation);

        let authenticated = match self.credential().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Starting without credential, model selection disabled");
                self.renderer.set_model_selection_available(false);
                false
            }
        };
        let catalog_loaded = authenticated && self.load_catalog().await;
        if authenticated {
            self.renderer.set_model_selection_available(true);
        }
        let active_model = self.catalog.lock().await.active().clone();
        self.renderer.render_active_model(&active_model);

        info!(restored, authenticated, catalog_loaded, "Controller initialized");
        InitReport {
            restored,
            authenticated,
            catalog_loaded,
        }
    }

    /// Last-active conversation if it still exists, else the most recent, else a new one
    fn resume(store: &mut ConversationStore) -> Conversation {
        let candidate = store
            .active()
            .or_else(|| store.sorted_for_display().into_iter().next())
            .map(|conversation| conversation.id.clone());
        if let Some(id) = candidate {
            if let Ok(conversation) = store.set_active(&id) {
                return conversation.clone();
            }
        }
        store.create().clone()
    }

    /// Send `text` in the active conversation and stream the reply into it
    #[instrument(skip(self, text), fields(text.chars = text.chars().count()))]
    pub async fn send(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Rejected(AppError::invalid_input("Message is empty"));
        }

        let (token, session_id, conversation, summaries) = {
            let mut store = self.store.lock().await;
            let conversation_id = match store.active() {
                Some(active) => active.id.clone(),
                None => store.create().id.clone(),
            };
            let token = match self.in_flight.try_register(&conversation_id) {
                Ok(token) => token,
                Err(e) => {
                    debug!(conversation.id = %conversation_id, "Send rejected: request in flight");
                    return SendOutcome::Rejected(e);
                }
            };
            let session_id = match store.ensure_session_id(&conversation_id) {
                Ok(session_id) => session_id,
                Err(e) => {
                    self.in_flight.complete(&token);
                    return SendOutcome::Rejected(e);
                }
            };
            if let Err(e) = store.append(&conversation_id, text, true) {
                self.in_flight.complete(&token);
                return SendOutcome::Rejected(e);
            }
            let Some(conversation) = store.get(&conversation_id).cloned() else {
                self.in_flight.complete(&token);
                return SendOutcome::Rejected(AppError::conversation_not_found(&conversation_id));
            };
            (token, session_id, conversation, store.summaries())
        };
        self.renderer.render_conversation(&conversation);
        self.renderer.render_conversation_list(&summaries);
        self.renderer.set_loading(true);

        let outcome = match self.dispatch(&token, session_id, text).await {
            Ok(Some(reply)) => self.commit_reply(&token, reply).await,
            Ok(None) => {
                debug!(conversation.id = %token.conversation_id, "Stream cancelled");
                SendOutcome::Cancelled
            }
            Err(e) => self.commit_failure(&token, e).await,
        };

        // A cancelled request no longer owns the indicator
        if !matches!(outcome, SendOutcome::Cancelled) {
            self.renderer.set_loading(false);
        }
        outcome
    }

    /// Acquire credential, dispatch, and stream; `Ok(None)` when cancelled
    async fn dispatch(
        &self,
        token: &RequestToken,
        session_id: String,
        text: &str,
    ) -> AppResult<Option<String>> {
        let credential = self.credential().await.inspect_err(|_| {
            if self.in_flight.is_current(token) {
                self.renderer.set_model_selection_available(false);
            }
        })?;
        let model_id = self.catalog.lock().await.active().id.clone();
        let request = SendRequest::new(session_id, model_id, text);

        let mut assembler = StreamAssembler::new();
        assembler.begin()?;
        let started = Instant::now();

        let stream = match self.transport.send(&credential, &request).await {
            Ok(stream) => stream,
            Err(e) => {
                if e.code == ErrorCode::AuthUnavailable && self.in_flight.is_current(token) {
                    self.invalidate_credential(&credential).await;
                    self.renderer.set_model_selection_available(false);
                }
                return Err(e);
            }
        };

        let handle = token.handle();
        let in_flight = &self.in_flight;
        let renderer = &self.renderer;
        let result = assemble(&mut assembler, stream, |snapshot| {
            if !in_flight.is_current(token) {
                return ControlFlow::Break(());
            }
            renderer.render_stream_update(&handle, snapshot);
            ControlFlow::Continue(())
        })
        .await?;

        AppLogger::log_stream_completed(
            &token.conversation_id,
            assembler.fragment_count(),
            assembler.malformed_records(),
            assembler.text().chars().count(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        Ok(result)
    }

    async fn commit_reply(&self, token: &RequestToken, reply: String) -> SendOutcome {
        let mut store = self.store.lock().await;
        if !self.in_flight.complete(token) {
            debug!(conversation.id = %token.conversation_id, "Dropping reply of cancelled request");
            return SendOutcome::Cancelled;
        }
        if let Err(e) = store.append(&token.conversation_id, reply.clone(), false) {
            return SendOutcome::Failed(e);
        }
        let snapshot = Self::visible_snapshot(&store, &token.conversation_id);
        let summaries = store.summaries();
        drop(store);

        if let Some(conversation) = snapshot {
            self.renderer.render_conversation(&conversation);
        }
        self.renderer.render_conversation_list(&summaries);
        SendOutcome::Completed(reply)
    }

    async fn commit_failure(&self, token: &RequestToken, error: AppError) -> SendOutcome {
        let mut store = self.store.lock().await;
        if !self.in_flight.complete(token) {
            debug!(
                conversation.id = %token.conversation_id,
                error = %error,
                "Ignoring failure of cancelled request"
            );
            return SendOutcome::Cancelled;
        }
        warn!(conversation.id = %token.conversation_id, error = %error, "Send failed");
        if let Err(e) = store.append(&token.conversation_id, SEND_ERROR_MESSAGE, false) {
            warn!(error = %e, "Could not record send failure");
        }
        let snapshot = Self::visible_snapshot(&store, &token.conversation_id);
        drop(store);

        if let Some(conversation) = snapshot {
            self.renderer.render_conversation(&conversation);
        }
        let error = if error.code == ErrorCode::SendFailed {
            error
        } else {
            AppError::send_failed(format!("Send did not complete: {}", error.message))
                .with_source(error)
        };
        SendOutcome::Failed(error)
    }

    /// Conversation snapshot if it is the one currently displayed
    fn visible_snapshot(store: &ConversationStore, conversation_id: &str) -> Option<Conversation> {
        store
            .active()
            .filter(|active| active.id == conversation_id)
            .cloned()
    }

    async fn credential(&self) -> AppResult<Credential> {
        let mut cached = self.credential.lock().await;
        if let Some(credential) = cached.as_ref() {
            return Ok(credential.clone());
        }
        let credential = self.identity.acquire().await?;
        *cached = Some(credential.clone());
        Ok(credential)
    }

    async fn invalidate_credential(&self, rejected: &Credential) {
        let mut cached = self.credential.lock().await;
        if cached.as_ref() == Some(rejected) {
            info!(device.id = %rejected.device_id, "Dropping rejected credential");
            *cached = None;
        }
    }

    async fn load_catalog(&self) -> bool {
        let Ok(credential) = self.credential().await else {
            return false;
        };
        let mut catalog = self.catalog.lock().await;
        match catalog.load_once(self.transport.as_ref(), &credential).await {
            Ok(()) => true,
            Err(e) => {
                if e.code == ErrorCode::AuthUnavailable {
                    self.invalidate_credential(&credential).await;
                }
                false
            }
        }
    }

    /// Start a new empty conversation and make it active
    pub async fn new_conversation(&self) -> Conversation {
        let cancelled = self.in_flight.cancel_all();
        if cancelled > 0 {
            info!(cancelled, "Cancelled in-flight requests");
        }
        let (conversation, summaries) = {
            let mut store = self.store.lock().await;
            let conversation = store.create().clone();
            (conversation, store.summaries())
        };
        self.renderer.set_loading(false);
        self.renderer.render_conversation(&conversation);
        self.renderer.render_conversation_list(&summaries);
        conversation
    }

    /// Switch to `conversation_id`; an unknown id starts a new conversation instead
    pub async fn open_conversation(&self, conversation_id: &str) -> Conversation {
        let opened = {
            let mut store = self.store.lock().await;
            if store.get(conversation_id).is_some() {
                if store.active_id() != Some(conversation_id) {
                    let cancelled = self.in_flight.cancel_all();
                    if cancelled > 0 {
                        info!(cancelled, "Cancelled in-flight requests");
                    }
                }
                let conversation = store.set_active(conversation_id).ok().cloned();
                conversation.map(|conversation| (conversation, store.summaries()))
            } else {
                None
            }
        };

        let Some((conversation, summaries)) = opened else {
            warn!(conversation.id = %conversation_id, "Conversation not found, starting a new one");
            return self.new_conversation().await;
        };
        self.renderer.render_conversation(&conversation);
        self.renderer.render_conversation_list(&summaries);
        conversation
    }

    /// Listing rows in display order
    pub async fn conversations(&self) -> Vec<ConversationSummary> {
        self.store.lock().await.summaries()
    }

    /// Snapshot of the active conversation
    pub async fn active_conversation(&self) -> Option<Conversation> {
        self.store.lock().await.active().cloned()
    }

    /// Snapshot of any conversation by id
    pub async fn conversation(&self, conversation_id: &str) -> Option<Conversation> {
        self.store.lock().await.get(conversation_id).cloned()
    }

    /// Whether `conversation_id` has a request in flight
    #[must_use]
    pub fn is_busy(&self, conversation_id: &str) -> bool {
        self.in_flight.is_busy(conversation_id)
    }

    /// Make `model_id` the active model
    ///
    /// # Errors
    ///
    /// Returns `AuthUnavailable` while no credential is held, `InvalidInput`
    /// for a model that is not in the catalog
    pub async fn select_model(&self, model_id: &str) -> AppResult<ActiveModel> {
        if !self.is_authenticated().await {
            return Err(AppError::auth_unavailable(
                "Model selection is disabled until a credential is acquired",
            ));
        }
        let active = self.catalog.lock().await.select(model_id)?.clone();
        self.renderer.render_active_model(&active);
        Ok(active)
    }

    /// Listed models in upstream order
    pub async fn models(&self) -> Vec<ModelDescriptor> {
        self.catalog.lock().await.models().to_vec()
    }

    /// The model new requests are sent to
    pub async fn active_model(&self) -> ActiveModel {
        self.catalog.lock().await.active().clone()
    }

    /// Drop any cached credential and acquire a new one
    ///
    /// On success model selection is re-enabled and the catalog is loaded if
    /// it never was.
    ///
    /// # Errors
    ///
    /// Returns `AuthUnavailable` if acquisition fails again
    pub async fn retry_authentication(&self) -> AppResult<()> {
        self.credential.lock().await.take();
        if let Err(e) = self.credential().await {
            self.renderer.set_model_selection_available(false);
            return Err(e);
        }
        self.renderer.set_model_selection_available(true);
        if !self.load_catalog().await {
            warn!("Model catalog still unavailable, keeping current model");
        }
        Ok(())
    }

    /// Whether a credential is currently cached
    pub async fn is_authenticated(&self) -> bool {
        self.credential.lock().await.is_some()
    }
}
