/**
 * Cryptographic types and operations.
 *  - P-256 public and secret keys, JWK export
 *  - Envelope wire framing
 *  - Hybrid ECDH + AES-GCM encryption
 */
pub mod crypto;
/**
 * The local party's identity: a key pair
 *  created once and persisted through a
 *  pluggable key store.
 */
pub mod identity;
/**
 * Content-addressed blob storage contract,
 *  reference resolution, and an in-memory
 *  backend for tests.
 */
pub mod store;

pub mod prelude {
    pub use crate::crypto::{
        CipherError, Envelope, HybridCipher, KeyError, PlaintextPolicy, PublicKey, SecretKey,
    };
    pub use crate::identity::{
        FileKeyStore, KeyManager, KeyPair, KeyStore, KeyStoreError, MemoryKeyStore,
    };
    pub use crate::store::{
        resolve_reference, BlobId, BlobStore, FailureReason, MemoryBlobStore, Reference,
        StoreError, UploadOutcome,
    };
}
