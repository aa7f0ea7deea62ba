use std::sync::Mutex;

use super::key_store::{KeyStore, KeyStoreError};
use crate::crypto::SecretKey;

/// In-memory key store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    inner: Mutex<Option<SecretKey>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<SecretKey>>, KeyStoreError> {
        self.inner
            .lock()
            .map_err(|e| KeyStoreError::Internal(format!("failed to acquire lock: {}", e)))
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self) -> Result<Option<SecretKey>, KeyStoreError> {
        Ok(self.lock()?.clone())
    }

    fn put(&self, key: &SecretKey) -> Result<SecretKey, KeyStoreError> {
        let mut inner = self.lock()?;
        Ok(inner.get_or_insert_with(|| key.clone()).clone())
    }

    fn replace(&self, key: &SecretKey) -> Result<(), KeyStoreError> {
        *self.lock()? = Some(key.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), KeyStoreError> {
        *self.lock()? = None;
        Ok(())
    }
}
