// ABOUTME: Session registry assigning upstream session identifiers to conversations
// ABOUTME: Identifier format is a fixed prefix plus twelve lowercase hex characters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Registry
//!
//! The chat service correlates turns into one dialogue by session id. Each
//! conversation receives exactly one id, generated the first time it is
//! needed and never regenerated afterwards.

use rand::Rng;
use seek_chat_core::constants::session::{
    SESSION_ID_ALPHABET, SESSION_ID_PREFIX, SESSION_ID_SUFFIX_LEN,
};
use seek_chat_core::models::Conversation;
use tracing::debug;

/// Stateless generator and validator for upstream session identifiers
pub struct SessionRegistry;

impl SessionRegistry {
    /// Generate a fresh session identifier
    #[must_use]
    pub fn generate() -> String {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate a session identifier from the given random source
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
        let mut id = String::with_capacity(SESSION_ID_PREFIX.len() + SESSION_ID_SUFFIX_LEN);
        id.push_str(SESSION_ID_PREFIX);
        for _ in 0..SESSION_ID_SUFFIX_LEN {
            let index = rng.gen_range(0..SESSION_ID_ALPHABET.len());
            id.push(char::from(SESSION_ID_ALPHABET[index]));
        }
        id
    }

    /// Whether `id` has the exact upstream format
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        id.strip_prefix(SESSION_ID_PREFIX).is_some_and(|suffix| {
            suffix.len() == SESSION_ID_SUFFIX_LEN
                && suffix
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        })
    }

    /// Return the conversation's session id, generating and storing one if absent
    pub fn ensure_session_id(conversation: &mut Conversation) -> String {
        if let Some(existing) = conversation.session_id() {
            return existing.to_owned();
        }
        let generated = Self::generate();
        debug!(
            conversation.id = %conversation.id,
            session.id = %generated,
            "Assigned missing session id"
        );
        conversation.session_id = Some(generated.clone());
        generated
    }

    /// Assign ids to every conversation lacking one; returns how many were generated
    pub fn assign_missing(conversations: &mut [Conversation]) -> usize {
        conversations
            .iter_mut()
            .filter(|conversation| conversation.session_id().is_none())
            .map(Self::ensure_session_id)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_id_has_upstream_format() {
        let id = SessionRegistry::generate();
        assert!(id.starts_with("0180a4f6-612e-793d-a85b-"));
        assert_eq!(id.len(), SESSION_ID_PREFIX.len() + 12);
        assert!(SessionRegistry::is_valid(&id));
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let first = SessionRegistry::generate_with(&mut StdRng::seed_from_u64(7));
        let second = SessionRegistry::generate_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_valid_rejects_wrong_shapes() {
        assert!(!SessionRegistry::is_valid("0180a4f6-612e-793d-a85b-ABCDEF123456"));
        assert!(!SessionRegistry::is_valid("0180a4f6-612e-793d-a85b-abc"));
        assert!(!SessionRegistry::is_valid("ffffffff-612e-793d-a85b-abcdef123456"));
        assert!(!SessionRegistry::is_valid("0180a4f6-612e-793d-a85b-abcdef1234567"));
    }
}
