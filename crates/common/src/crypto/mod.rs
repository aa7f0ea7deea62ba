//! Cryptographic primitives for blobseal
//!
//! - **Identity keys**: P-256 key pairs (`SecretKey`/`PublicKey`), with
//!   public keys shared out-of-band as JSON Web Keys
//! - **Envelopes**: the transportable `ECIES::` framing of a sealed message
//! - **Hybrid encryption**: ephemeral ECDH + AES-256-GCM (`HybridCipher`)
//!
//! # Security Model
//!
//! Every message is sealed under a key derived from a fresh ephemeral
//! key pair, so no symmetric key or nonce is ever reused. The scheme
//! only encrypts: it does not authenticate the sender, and envelopes
//! carry no freshness data, so replays decrypt successfully.

mod cipher;
mod envelope;
mod keys;

pub use cipher::{CipherError, HybridCipher, PlaintextPolicy};
pub use envelope::{Envelope, ENVELOPE_MARKER, NONCE_SIZE, TAG_SIZE};
pub use keys::{KeyError, PublicKey, SecretKey, CURVE_NAME, PRIVATE_KEY_SIZE};
