//! Hybrid public-key encryption (ECDH P-256 + AES-256-GCM)
//!
//! To seal a message for a recipient:
//! 1. Generate an ephemeral P-256 key pair
//! 2. Perform ECDH between the ephemeral secret and the recipient's public key
//! 3. Use the raw 32-byte shared secret directly as the AES-256-GCM key
//! 4. Encrypt under a fresh random 12-byte nonce
//! 5. Package the ephemeral public key, nonce and ciphertext as an [`Envelope`]
//!
//! The recipient repeats the ECDH with their private key and the
//! ephemeral public key, re-derives the same AES key and opens the
//! ciphertext. A failed tag check never yields plaintext.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use p256::ecdh::EphemeralSecret;
use serde::{Deserialize, Serialize};

use super::envelope::{Envelope, NONCE_SIZE};
use super::keys::{PublicKey, SecretKey};

/// Errors that can occur while sealing or opening envelopes
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    /// Key generation, derivation or the AEAD primitive failed while sealing
    #[error("encryption failed: {0}")]
    Encryption(String),
    /// The input carried the envelope marker but could not be parsed
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
    /// Authentication failed: wrong key or tampered envelope
    #[error("decryption failed")]
    Decryption,
}

impl CipherError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        CipherError::MalformedEnvelope(msg.into())
    }
}

/// What [`HybridCipher::decrypt`] does with input that is not an envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaintextPolicy {
    /// Return unmarked input unchanged, as if it had been decrypted
    #[default]
    Passthrough,
    /// Fail with [`CipherError::MalformedEnvelope`]
    Reject,
}

/// Seals and opens [`Envelope`]s
///
/// The cipher holds no key material and no mutable state, so a single
/// value can be shared freely across tasks.
///
/// Envelopes carry no timestamp, sequence number or sender identity:
/// a captured envelope decrypts identically every time it is delivered.
/// Callers that need replay resistance must track seen envelopes
/// themselves.
///
/// # Examples
///
/// ```ignore
/// let cipher = HybridCipher::default();
/// let bob = SecretKey::generate();
///
/// let wire = cipher.encrypt(b"hi bob", &bob.public())?.pack();
/// let plaintext = cipher.decrypt(&wire, &bob)?;
/// assert_eq!(plaintext, b"hi bob");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridCipher {
    policy: PlaintextPolicy,
}

impl HybridCipher {
    pub fn new(policy: PlaintextPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> PlaintextPolicy {
        self.policy
    }

    /// Seal `plaintext` for the holder of `recipient`'s private key
    ///
    /// Every call uses a fresh ephemeral key pair and a fresh nonce, so
    /// sealing the same plaintext twice yields different envelopes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Encryption`] if the system RNG or the AEAD
    /// primitive fails. Nothing is returned on failure.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        recipient: &PublicKey,
    ) -> Result<Envelope, CipherError> {
        let ephemeral_secret = EphemeralSecret::random(&mut OsRng);
        let ephemeral_public = PublicKey::from(ephemeral_secret.public_key());

        let shared_secret = ephemeral_secret.diffie_hellman(recipient.inner());
        let cipher = Aes256Gcm::new_from_slice(shared_secret.raw_secret_bytes())
            .map_err(|_| CipherError::Encryption("invalid derived key length".to_string()))?;

        let mut nonce = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce)
            .map_err(|e| CipherError::Encryption(format!("failed to generate nonce: {}", e)))?;

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CipherError::Encryption("encrypt error".to_string()))?;

        tracing::debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "sealed envelope"
        );

        Ok(Envelope::new(ephemeral_public, nonce, ciphertext))
    }

    /// Recover plaintext from an envelope wire string
    ///
    /// Input without the envelope marker is handled according to the
    /// cipher's [`PlaintextPolicy`].
    ///
    /// # Errors
    ///
    /// - [`CipherError::MalformedEnvelope`] if the marker is present but
    ///   the envelope cannot be parsed, or the marker is absent under
    ///   [`PlaintextPolicy::Reject`]
    /// - [`CipherError::Decryption`] if authentication fails
    pub fn decrypt(
        &self,
        wire: &str,
        recipient_secret: &SecretKey,
    ) -> Result<Vec<u8>, CipherError> {
        if !Envelope::is_envelope(wire) {
            return self.pass_through(wire.as_bytes());
        }

        let envelope = Envelope::unpack(wire)?;
        self.open(&envelope, recipient_secret)
    }

    /// Same as [`HybridCipher::decrypt`] for input held as raw bytes
    ///
    /// Bytes that are not UTF-8 cannot carry the envelope marker, so
    /// they are handled as plaintext under the cipher's policy.
    pub fn decrypt_bytes(
        &self,
        input: &[u8],
        recipient_secret: &SecretKey,
    ) -> Result<Vec<u8>, CipherError> {
        match std::str::from_utf8(input) {
            Ok(wire) => self.decrypt(wire, recipient_secret),
            Err(_) => self.pass_through(input),
        }
    }

    fn pass_through(&self, input: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self.policy {
            PlaintextPolicy::Passthrough => {
                tracing::debug!(len = input.len(), "input is not an envelope, passing through");
                Ok(input.to_vec())
            }
            PlaintextPolicy::Reject => Err(CipherError::malformed("missing envelope marker")),
        }
    }

    /// Recover plaintext from a parsed envelope
    pub fn open(
        &self,
        envelope: &Envelope,
        recipient_secret: &SecretKey,
    ) -> Result<Vec<u8>, CipherError> {
        let shared_secret = p256::ecdh::diffie_hellman(
            recipient_secret.inner().to_nonzero_scalar(),
            envelope.ephemeral_public_key().inner().as_affine(),
        );
        let cipher = Aes256Gcm::new_from_slice(shared_secret.raw_secret_bytes())
            .map_err(|_| CipherError::Decryption)?;

        let plaintext = cipher
            .decrypt(Nonce::from_slice(envelope.nonce()), envelope.ciphertext())
            .map_err(|_| {
                tracing::debug!("envelope failed authentication");
                CipherError::Decryption
            })?;

        Ok(plaintext)
    }
}
