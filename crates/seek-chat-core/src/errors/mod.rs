// ABOUTME: Unified error types for the seek-chat client with typed error codes
// ABOUTME: Maps every failure to a disposition so callers can degrade or surface it deterministically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the client returns [`AppResult`]. The
//! [`ErrorCode`] carried by an [`AppError`] decides what happens next through
//! [`ErrorCode::disposition`]: a degraded feature, a message shown inside the
//! conversation, a skipped record, or a refused operation. Nothing in the
//! client is fatal to the process.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Identity (1000-1999)
    /// Credential handshake did not yield a usable token
    #[serde(rename = "AUTH_UNAVAILABLE")]
    AuthUnavailable = 1000,

    // Catalog (2000-2999)
    /// Model listing could not be fetched
    #[serde(rename = "CATALOG_UNAVAILABLE")]
    CatalogUnavailable = 2000,

    // Sending and streaming (3000-3999)
    /// Network or transport failure during dispatch or streaming
    #[serde(rename = "SEND_FAILED")]
    SendFailed = 3000,
    /// A request is already outstanding for the conversation
    #[serde(rename = "SEND_IN_FLIGHT")]
    SendInFlight = 3001,
    /// A single stream record could not be parsed
    #[serde(rename = "STREAM_RECORD_MALFORMED")]
    StreamRecordMalformed = 3002,

    // Storage (4000-4999)
    /// Persisted data failed structural validation
    #[serde(rename = "STORAGE_CORRUPT")]
    StorageCorrupt = 4000,
    /// Persistence medium could not be read or written
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 4001,
    /// Conversation id is not present in the collection
    #[serde(rename = "CONVERSATION_NOT_FOUND")]
    ConversationNotFound = 4002,

    // Validation and state (5000-5999)
    /// Input was rejected before any side effect
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 5000,
    /// Operation is not valid in the current state
    #[serde(rename = "INVALID_STATE")]
    InvalidState = 5001,

    // Configuration (6000-6999)
    /// Configuration value missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal (9000-9999)
    /// Serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9000,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9001,
}

/// How a caller should react to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Disable the affected feature and keep the rest of the client usable
    Degrade,
    /// Surface a message to the user inside the conversation
    UserVisible,
    /// Log and continue with the next unit of work
    Skip,
    /// Refuse the operation; no state was changed
    Reject,
}

impl ErrorCode {
    /// Reaction expected from the operation boundary that caught this error
    #[must_use]
    pub const fn disposition(&self) -> ErrorDisposition {
        match self {
            Self::AuthUnavailable
            | Self::CatalogUnavailable
            | Self::StorageCorrupt
            | Self::StorageError
            | Self::ConfigError => ErrorDisposition::Degrade,
            Self::SendFailed | Self::InternalError | Self::SerializationError => {
                ErrorDisposition::UserVisible
            }
            Self::StreamRecordMalformed => ErrorDisposition::Skip,
            Self::SendInFlight
            | Self::ConversationNotFound
            | Self::InvalidInput
            | Self::InvalidState => ErrorDisposition::Reject,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthUnavailable => "Could not obtain a credential from the chat service",
            Self::CatalogUnavailable => "The model catalog is unavailable",
            Self::SendFailed => "The message could not be delivered",
            Self::SendInFlight => "A reply is still streaming for this conversation",
            Self::StreamRecordMalformed => "A stream record could not be parsed",
            Self::StorageCorrupt => "Stored conversations are corrupt",
            Self::StorageError => "Conversation storage failed",
            Self::ConversationNotFound => "The conversation does not exist",
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidState => "The operation is not valid right now",
            Self::ConfigError => "Configuration error encountered",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Unified error type for the client
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Shortcut for `self.code.disposition()`
    #[must_use]
    pub const fn disposition(&self) -> ErrorDisposition {
        self.code.disposition()
    }

    /// Credential handshake failed
    pub fn auth_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthUnavailable, message)
    }

    /// Model catalog fetch failed
    pub fn catalog_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CatalogUnavailable, message)
    }

    /// Dispatch or streaming failed
    pub fn send_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SendFailed, message)
    }

    /// A request is already outstanding for `conversation_id`
    pub fn send_in_flight(conversation_id: &str) -> Self {
        Self::new(
            ErrorCode::SendInFlight,
            format!("Conversation {conversation_id} already has a request in flight"),
        )
    }

    /// A stream record could not be parsed
    pub fn stream_record_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StreamRecordMalformed, message)
    }

    /// Persisted data is structurally invalid
    pub fn storage_corrupt(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageCorrupt, message)
    }

    /// Persistence medium failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Conversation lookup failed
    pub fn conversation_not_found(conversation_id: &str) -> Self {
        Self::new(
            ErrorCode::ConversationNotFound,
            format!("Conversation {conversation_id} not found"),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Operation not valid in the current state
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
