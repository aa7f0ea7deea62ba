//! Shared test utilities for end-to-end messaging tests
#![allow(dead_code)]

use common::crypto::HybridCipher;
use common::identity::{FileKeyStore, KeyManager, KeyPair};
use common::store::MemoryBlobStore;
use tempfile::TempDir;

/// A party with a persisted identity
pub struct Party {
    pub manager: KeyManager<FileKeyStore>,
    pub identity: KeyPair,
    pub cipher: HybridCipher,
}

/// Set up a party whose key lives in a fresh temporary directory
pub fn setup_party() -> (Party, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let manager = KeyManager::new(FileKeyStore::new(temp_dir.path().join("key.pem")));
    let identity = manager.create_or_load_identity().unwrap();

    let party = Party {
        manager,
        identity,
        cipher: HybridCipher::default(),
    };
    (party, temp_dir)
}

pub fn setup_store() -> MemoryBlobStore {
    MemoryBlobStore::with_aggregator_url("https://aggregator.test")
}
