use std::sync::Arc;

use crate::crypto::{KeyError, SecretKey};

#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    #[error("key store i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Something is persisted but it is not a usable key
    #[error("stored key is invalid: {0}")]
    InvalidKey(#[from] KeyError),
    #[error("key store error: {0}")]
    Internal(String),
}

/// Durable home for the local identity's secret key
///
/// Holds at most one key. Implementations must make `put` atomic with
/// respect to concurrent callers: the first key persisted wins and
/// every later `put` returns that key instead of overwriting it, so a
/// published public key is never silently orphaned. Readers must never
/// observe a partially written key.
pub trait KeyStore: Send + Sync + std::fmt::Debug {
    /// Load the persisted key, if any
    fn get(&self) -> Result<Option<SecretKey>, KeyStoreError>;

    /// Persist `key` unless a key is already stored
    ///
    /// # Returns
    /// * `Ok(key)` - The persisted key: `key` itself, or the one that was already there
    fn put(&self, key: &SecretKey) -> Result<SecretKey, KeyStoreError>;

    /// Persist `key` in place of whatever is stored
    ///
    /// Atomic: on failure the previously stored key, if any, is left
    /// untouched.
    fn replace(&self, key: &SecretKey) -> Result<(), KeyStoreError>;

    /// Remove the persisted key. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), KeyStoreError>;
}

impl<T: KeyStore + ?Sized> KeyStore for Arc<T> {
    fn get(&self) -> Result<Option<SecretKey>, KeyStoreError> {
        (**self).get()
    }

    fn put(&self, key: &SecretKey) -> Result<SecretKey, KeyStoreError> {
        (**self).put(key)
    }

    fn replace(&self, key: &SecretKey) -> Result<(), KeyStoreError> {
        (**self).replace(key)
    }

    fn clear(&self) -> Result<(), KeyStoreError> {
        (**self).clear()
    }
}
