use crate::crypto::{KeyError, PublicKey, SecretKey};

use super::key_store::{KeyStore, KeyStoreError};

/// The local party's key pair
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: SecretKey,
}

impl From<SecretKey> for KeyPair {
    fn from(private_key: SecretKey) -> Self {
        Self {
            public_key: private_key.public(),
            private_key,
        }
    }
}

/// Creates, persists and exposes the local identity
///
/// The identity is generated on first use and then only ever loaded:
/// regenerating it would orphan every public key already handed out,
/// so that only happens through the explicit [`KeyManager::rotate`].
#[derive(Debug, Clone)]
pub struct KeyManager<S> {
    store: S,
}

impl<S: KeyStore> KeyManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Return the persisted identity, generating and persisting one if
    /// none exists yet
    ///
    /// Safe to race: when several callers find the store empty, the
    /// first key persisted wins and every caller returns that key.
    pub fn create_or_load_identity(&self) -> Result<KeyPair, KeyStoreError> {
        if let Some(private_key) = self.store.get()? {
            return Ok(KeyPair::from(private_key));
        }

        let generated = SecretKey::generate();
        let persisted = self.store.put(&generated)?;
        if persisted.public() == generated.public() {
            tracing::info!("generated new identity");
        }

        Ok(KeyPair::from(persisted))
    }

    /// Return the persisted identity without generating one
    pub fn load_identity(&self) -> Result<Option<KeyPair>, KeyStoreError> {
        Ok(self.store.get()?.map(KeyPair::from))
    }

    /// Replace the persisted identity with a freshly generated one
    ///
    /// Envelopes sealed for the previous public key can no longer be
    /// opened once this returns. If it fails, the previous identity is
    /// still in place.
    pub fn rotate(&self) -> Result<KeyPair, KeyStoreError> {
        let generated = SecretKey::generate();
        self.store.replace(&generated)?;
        tracing::info!("rotated identity");
        Ok(KeyPair::from(generated))
    }

    /// Forget the persisted identity
    pub fn clear(&self) -> Result<(), KeyStoreError> {
        self.store.clear()
    }

    /// Serialize a public key for out-of-band sharing
    pub fn export_public_key(&self, public_key: &PublicKey) -> String {
        public_key.to_jwk_string()
    }

    /// Parse a public key shared by another party
    pub fn import_public_key(&self, s: &str) -> Result<PublicKey, KeyError> {
        PublicKey::from_jwk_str(s)
    }
}
