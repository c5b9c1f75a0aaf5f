//! In-memory credential store.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use artship_core::User;
use jiff::Timestamp;

use super::{CredentialStore, TRACING_TARGET, keys, parse_expiry, parse_user};

/// Process-local credential store.
///
/// The default store: fast, scoped to the process, nothing survives a
/// restart. Embedding applications with their own persistence wrap this or
/// provide a [`CredentialStore`](super::CredentialStore) of their own.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<&'static str, String>>,
    generation: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .expect("credential store lock poisoned")
            .get(key)
            .cloned()
    }

    fn put(&self, key: &'static str, value: Option<String>) {
        let mut values = self.values.write().expect("credential store lock poisoned");
        match value {
            Some(value) => {
                values.insert(key, value);
            }
            None => {
                values.remove(key);
            }
        }
        drop(values);
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Stores a raw string under a session key, bypassing serialization.
    ///
    /// Lets tests exercise the malformed-data paths the way an external
    /// writer could produce them.
    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &'static str, value: &str) {
        self.put(key, Some(value.to_owned()));
    }
}

impl CredentialStore for MemoryStore {
    fn set_access_token(&self, token: Option<&str>) {
        self.put(keys::ACCESS_TOKEN, token.map(str::to_owned));
    }

    fn access_token(&self) -> Option<String> {
        self.get(keys::ACCESS_TOKEN)
    }

    fn set_refresh_token(&self, token: Option<&str>) {
        self.put(keys::REFRESH_TOKEN, token.map(str::to_owned));
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(keys::REFRESH_TOKEN)
    }

    fn set_user(&self, user: Option<&User>) {
        let serialized = user.and_then(|user| match serde_json::to_string(user) {
            Ok(json) => Some(json),
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Failed to serialize user record, removing stored user"
                );
                None
            }
        });
        self.put(keys::USER, serialized);
    }

    fn user(&self) -> Option<User> {
        self.get(keys::USER).as_deref().and_then(parse_user)
    }

    fn set_token_expiry(&self, expiry: Option<Timestamp>) {
        self.put(
            keys::TOKEN_EXPIRY,
            expiry.map(|expiry| expiry.as_millisecond().to_string()),
        );
    }

    fn token_expiry(&self) -> Option<Timestamp> {
        self.get(keys::TOKEN_EXPIRY).as_deref().and_then(parse_expiry)
    }

    fn clear(&self) {
        for key in keys::ALL {
            self.put(key, None);
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
