// ABOUTME: Ephemeral bearer credential paired with its synthetic device identifier
// ABOUTME: Held only in process memory; never persisted or logged in full
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

/// Bearer token plus the device identifier it was issued for
///
/// Every request made with the token must carry the same device id.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Opaque bearer token
    pub token: String,
    /// Synthetic device identifier (lowercase hex)
    pub device_id: String,
}

impl Credential {
    /// Create a credential from its parts
    #[must_use]
    pub fn new(token: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            device_id: device_id.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("device_id", &self.device_id)
            .finish()
    }
}
