// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Session identifier format, conversation defaults, endpoints, and env variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by the component that owns them. Values in
//! [`session`] are an external contract with the chat service and must not
//! change.

/// Upstream session identifier format
pub mod session {
    /// Fixed structural prefix of every session identifier
    pub const SESSION_ID_PREFIX: &str = "0180a4f6-612e-793d-a85b-";

    /// Number of lowercase hex characters following the prefix
    pub const SESSION_ID_SUFFIX_LEN: usize = 12;

    /// Alphabet used for the random suffix
    pub const SESSION_ID_ALPHABET: &[u8] = b"0123456789abcdef";
}

/// Conversation defaults and title derivation
pub mod conversation {
    /// Title given to conversations before the first user message
    pub const DEFAULT_TITLE: &str = "New conversation";

    /// Maximum number of characters kept when deriving a title
    pub const TITLE_MAX_CHARS: usize = 30;

    /// Marker appended to a truncated title
    pub const TITLE_ELLIPSIS: &str = "...";

    /// Bot-authored message appended when a send fails
    pub const SEND_ERROR_MESSAGE: &str = "Error connecting. Please try again.";
}

/// Persistence slot
pub mod storage {
    /// Key under which the conversation collection is stored
    pub const DEFAULT_STORAGE_KEY: &str = "chatAppConversations_v3";

    /// Directory name used below the platform data directory
    pub const DATA_DIR_NAME: &str = "seek-chat";

    /// Fallback directory when no platform data directory exists
    pub const FALLBACK_DATA_DIR: &str = ".seek-chat";
}

/// Built-in model used until the catalog loads
pub mod models {
    /// Default model id
    pub const DEFAULT_MODEL_ID: &str = "anthropic/claude-3.7-sonnet";
    /// Default model display name
    pub const DEFAULT_MODEL_NAME: &str = "Claude";
    /// Default model version
    pub const DEFAULT_MODEL_VERSION: &str = "3.7";
    /// Default model icon reference
    pub const DEFAULT_MODEL_ICON: &str =
        "https://d3g322f8itkvhj.cloudfront.net/static/logo/Claude.png";
}

/// Upstream HTTP interface
pub mod upstream {
    /// Default credential endpoint
    pub const DEFAULT_AUTH_URL: &str = "http://localhost:8787/auth/api/v1/tokens/provider/secret";
    /// Default base URL for the model listing and chat endpoints
    pub const DEFAULT_API_URL: &str = "http://localhost:8787";
    /// Model listing path, relative to the API base URL
    pub const LIST_MODELS_PATH: &str = "v1/chat/list_models";
    /// Chat send path, relative to the API base URL
    pub const SEND_PATH: &str = "v3/chat/send";

    /// Header carrying the bearer credential
    pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";
    /// Header identifying the client application
    pub const APP_ID_HEADER: &str = "x-app-id";
    /// Header describing the synthetic device
    pub const DEVICE_INFO_HEADER: &str = "x-device-info";
    /// Field of the device-info header holding the device identifier
    pub const DEVICE_ID_FIELD: &str = "androidId";

    /// Number of random bytes in a synthetic device identifier
    pub const DEVICE_ID_BYTES: usize = 8;

    /// Default application id sent with every request
    pub const DEFAULT_APP_ID: &str = "seek-chat";
    /// Default user agent
    pub const DEFAULT_USER_AGENT: &str = concat!("seek-chat/", env!("CARGO_PKG_VERSION"));
    /// Default device descriptor (the device id field is appended at runtime)
    pub const DEFAULT_DEVICE_DESCRIPTOR: &str = "appIdentifier=seek-chat;deviceType=desktop";

    /// Connection timeout for upstream requests
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Overall timeout for non-streaming upstream requests
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Stream record framing
pub mod stream {
    /// Prefix of content-bearing records
    pub const DATA_PREFIX: &str = "data:";
    /// Terminal marker some upstreams send before closing
    pub const DONE_MARKER: &str = "[DONE]";
}

/// Environment variable names
pub mod env_config {
    /// Credential endpoint URL
    pub const AUTH_URL: &str = "SEEK_CHAT_AUTH_URL";
    /// Base URL for model listing and chat
    pub const API_URL: &str = "SEEK_CHAT_API_URL";
    /// Directory for the persistence slot
    pub const DATA_DIR: &str = "SEEK_CHAT_DATA_DIR";
    /// Persistence key
    pub const STORAGE_KEY: &str = "SEEK_CHAT_STORAGE_KEY";
    /// Application id header value
    pub const APP_ID: &str = "SEEK_CHAT_APP_ID";
    /// User agent header value
    pub const USER_AGENT: &str = "SEEK_CHAT_USER_AGENT";
    /// Device descriptor header value
    pub const DEVICE_DESCRIPTOR: &str = "SEEK_CHAT_DEVICE_DESCRIPTOR";
    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: &str = "SEEK_CHAT_CONNECT_TIMEOUT_SECS";
    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "SEEK_CHAT_REQUEST_TIMEOUT_SECS";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Service identity used in logs
pub mod service_names {
    /// Service name reported by the logging layer
    pub const SEEK_CHAT: &str = "seek-chat";
}
