// ABOUTME: Shared test utilities and fakes for integration tests
// ABOUTME: Provides scripted identity and transport fakes and a recording rendering sink
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `seek_chat`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use seek_chat::controller::ConversationController;
use seek_chat::errors::{AppError, AppResult};
use seek_chat::identity::IdentityProvider;
use seek_chat::models::{ActiveModel, Conversation, ConversationSummary, Credential, ModelDescriptor};
use seek_chat::render::{MessageHandle, RenderSink};
use seek_chat::storage::{MemoryStorage, StorageBackend};
use seek_chat::store::ConversationStore;
use seek_chat::transport::{ByteStream, ChatTransport, SendRequest};
use tokio::sync::mpsc;

/// Storage key used by every test store
pub const TEST_KEY: &str = "chatAppConversations_v3";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Server-sent line carrying one content fragment
pub fn data_line(content: &str) -> String {
    format!("data: {}\n", serde_json::json!({ "content": content }))
}

/// Model descriptor with predictable fields
pub fn descriptor(id: &str, display_name: &str, version: &str) -> ModelDescriptor {
    ModelDescriptor {
        id: id.to_owned(),
        display_name: display_name.to_owned(),
        version: version.to_owned(),
        icon_ref: format!("{id}.png"),
        paid_only: false,
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Identity provider issuing `token-N` / `device-N`, or failing when told to
#[derive(Default)]
pub struct FakeIdentity {
    calls: AtomicUsize,
    failing: Mutex<bool>,
}

impl FakeIdentity {
    pub fn working() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let identity = Self::default();
        *identity.failing.lock().unwrap() = true;
        Arc::new(identity)
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn acquire(&self) -> AppResult<Credential> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.failing.lock().unwrap() {
            return Err(AppError::auth_unavailable("Token not found in response"));
        }
        Ok(Credential::new(format!("token-{n}"), format!("device-{n}")))
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Scripted response to one send
pub enum SendScript {
    /// Respond with these chunks, then close
    Chunks(Vec<String>),
    /// Refuse the request
    Fail(AppError),
    /// Deliver chunks as the test pushes them; closes when the sender drops
    Channel(mpsc::UnboundedReceiver<AppResult<Bytes>>),
}

impl SendScript {
    /// Reply streamed as one fragment per line
    pub fn reply(fragments: &[&str]) -> Self {
        Self::Chunks(fragments.iter().map(|f| data_line(f)).collect())
    }

    /// Reply whose chunks the test pushes through the returned sender
    pub fn channel() -> (Self, mpsc::UnboundedSender<AppResult<Bytes>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::Channel(rx), tx)
    }
}

/// Transport replaying scripted sends and a fixed model list
#[derive(Default)]
pub struct FakeTransport {
    models: Mutex<Option<Vec<ModelDescriptor>>>,
    scripts: Mutex<VecDeque<SendScript>>,
    requests: Mutex<Vec<(Credential, SendRequest)>>,
    list_calls: AtomicUsize,
}

impl FakeTransport {
    /// Transport with a two-model catalog and no scripted sends
    pub fn new() -> Arc<Self> {
        let transport = Self::default();
        *transport.models.lock().unwrap() = Some(vec![
            descriptor("anthropic/claude-3.7-sonnet", "Claude", "3.7"),
            descriptor("openai/gpt-4o", "GPT", "4o"),
        ]);
        Arc::new(transport)
    }

    /// Transport whose catalog endpoint always fails
    pub fn without_catalog() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, script: SendScript) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn requests(&self) -> Vec<(Credential, SendRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn list_models(&self, _credential: &Credential) -> AppResult<Vec<ModelDescriptor>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.models
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::catalog_unavailable("Model list not found"))
    }

    async fn send(&self, credential: &Credential, request: &SendRequest) -> AppResult<ByteStream> {
        self.requests
            .lock()
            .unwrap()
            .push((credential.clone(), request.clone()));
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SendScript::Chunks(Vec::new()));
        match script {
            SendScript::Chunks(chunks) => Ok(Box::pin(stream::iter(
                chunks.into_iter().map(|chunk| Ok(Bytes::from(chunk))),
            ))),
            SendScript::Fail(error) => Err(error),
            SendScript::Channel(rx) => Ok(Box::pin(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            }))),
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Everything the controller pushed into the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Conversation { id: String, messages: usize },
    StreamUpdate { handle: MessageHandle, text: String },
    List(Vec<String>),
    Loading(bool),
    ModelSelection(bool),
    ActiveModel(String),
}

#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Cumulative texts pushed for in-progress messages, in order
    pub fn stream_updates(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::StreamUpdate { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Last model selection availability pushed
    pub fn model_selection(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|event| match event {
            RenderEvent::ModelSelection(available) => Some(available),
            _ => None,
        })
    }

    fn record(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl RenderSink for RecordingRenderer {
    fn render_conversation(&self, conversation: &Conversation) {
        self.record(RenderEvent::Conversation {
            id: conversation.id.clone(),
            messages: conversation.messages.len(),
        });
    }

    fn render_stream_update(&self, handle: &MessageHandle, cumulative_text: &str) {
        self.record(RenderEvent::StreamUpdate {
            handle: handle.clone(),
            text: cumulative_text.to_owned(),
        });
    }

    fn render_conversation_list(&self, summaries: &[ConversationSummary]) {
        self.record(RenderEvent::List(
            summaries.iter().map(|summary| summary.id.clone()).collect(),
        ));
    }

    fn set_loading(&self, loading: bool) {
        self.record(RenderEvent::Loading(loading));
    }

    fn set_model_selection_available(&self, available: bool) {
        self.record(RenderEvent::ModelSelection(available));
    }

    fn render_active_model(&self, model: &ActiveModel) {
        self.record(RenderEvent::ActiveModel(model.id.clone()));
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// Store over `storage` using the default key
pub fn store_on(storage: &MemoryStorage) -> ConversationStore {
    let backend: Arc<dyn StorageBackend> = Arc::new(storage.clone());
    ConversationStore::new(backend, TEST_KEY)
}

/// Controller wired to fakes
pub struct TestHarness {
    pub storage: MemoryStorage,
    pub identity: Arc<FakeIdentity>,
    pub transport: Arc<FakeTransport>,
    pub renderer: Arc<RecordingRenderer>,
    pub controller: ConversationController,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with(MemoryStorage::new(), FakeIdentity::working(), FakeTransport::new())
    }

    pub fn with(
        storage: MemoryStorage,
        identity: Arc<FakeIdentity>,
        transport: Arc<FakeTransport>,
    ) -> Self {
        init_test_logging();
        let renderer = RecordingRenderer::new();
        let controller = ConversationController::new(
            store_on(&storage),
            identity.clone(),
            transport.clone(),
            renderer.clone(),
        );
        Self {
            storage,
            identity,
            transport,
            renderer,
            controller,
        }
    }

    /// Reload the persisted state into a fresh store
    pub fn reload(&self) -> ConversationStore {
        let mut store = store_on(&self.storage);
        store.load();
        store
    }
}
