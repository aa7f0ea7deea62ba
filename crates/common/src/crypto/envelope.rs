//! Wire framing for sealed messages
//!
//! An [`Envelope`] is everything a recipient needs, besides their own
//! private key, to recover a message. On the wire it is a single text
//! string so it can travel over any channel (a blob, a ledger field,
//! a chat message):
//!
//! ```text
//! "ECIES::" + base64({ "ephem": <JWK string>, "iv": [12 x u8], "data": [N x u8] })
//! ```
//!
//! `data` is the AEAD ciphertext with the 16-byte tag appended.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::cipher::CipherError;
use super::keys::PublicKey;

/// Literal prefix that marks a string as an envelope
pub const ENVELOPE_MARKER: &str = "ECIES::";
/// Size of the AES-GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of the AES-GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// JSON body of a packed envelope
#[derive(Debug, Serialize, Deserialize)]
struct WireEnvelope {
    ephem: String,
    iv: Vec<u8>,
    data: Vec<u8>,
}

/// A self-contained encrypted message
///
/// Created fresh by [`HybridCipher::encrypt`](super::HybridCipher::encrypt)
/// and immutable afterwards. The private key used to seal it is never
/// part of the envelope: only the ephemeral public key is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    ephemeral_public_key: PublicKey,
    nonce: [u8; NONCE_SIZE],
    ciphertext: Vec<u8>,
}

impl Envelope {
    pub(crate) fn new(
        ephemeral_public_key: PublicKey,
        nonce: [u8; NONCE_SIZE],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self {
            ephemeral_public_key,
            nonce,
            ciphertext,
        }
    }

    /// Public half of the per-message ephemeral key pair
    pub fn ephemeral_public_key(&self) -> &PublicKey {
        &self.ephemeral_public_key
    }

    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Ciphertext with the authentication tag appended
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Whether a string carries the envelope marker
    pub fn is_envelope(s: &str) -> bool {
        s.starts_with(ENVELOPE_MARKER)
    }

    /// Serialize the envelope into its transportable string form
    pub fn pack(&self) -> String {
        let wire = WireEnvelope {
            ephem: self.ephemeral_public_key.to_jwk_string(),
            iv: self.nonce.to_vec(),
            data: self.ciphertext.clone(),
        };
        // a struct of strings and byte vectors always serializes
        let json = serde_json::to_vec(&wire).unwrap_or_default();

        let mut out = String::with_capacity(ENVELOPE_MARKER.len() + json.len() * 4 / 3 + 4);
        out.push_str(ENVELOPE_MARKER);
        STANDARD.encode_string(json, &mut out);
        out
    }

    /// Parse an envelope from its transportable string form
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedEnvelope`] if:
    /// - The marker is missing
    /// - The body is not valid base64
    /// - The JSON is missing a field or a field has the wrong type
    /// - The nonce is not exactly 12 bytes
    /// - The ephemeral key is not a valid P-256 JWK
    pub fn unpack(s: &str) -> Result<Self, CipherError> {
        let body = s
            .strip_prefix(ENVELOPE_MARKER)
            .ok_or_else(|| CipherError::malformed("missing envelope marker"))?;

        let json = STANDARD
            .decode(body.trim())
            .map_err(|e| CipherError::malformed(format!("invalid base64: {}", e)))?;

        let wire: WireEnvelope = serde_json::from_slice(&json)
            .map_err(|e| CipherError::malformed(format!("invalid envelope body: {}", e)))?;

        if wire.iv.len() != NONCE_SIZE {
            return Err(CipherError::malformed(format!(
                "invalid nonce size, expected {}, got {}",
                NONCE_SIZE,
                wire.iv.len()
            )));
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&wire.iv);

        let ephemeral_public_key = PublicKey::from_jwk_str(&wire.ephem)
            .map_err(|e| CipherError::malformed(format!("invalid ephemeral key: {}", e)))?;

        Ok(Self {
            ephemeral_public_key,
            nonce,
            ciphertext: wire.data,
        })
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pack())
    }
}

impl FromStr for Envelope {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::unpack(s)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::SecretKey;

    fn sample() -> Envelope {
        Envelope::new(
            SecretKey::generate().public(),
            [7u8; NONCE_SIZE],
            b"not really ciphertext".to_vec(),
        )
    }

    fn pack_json(value: serde_json::Value) -> String {
        format!("{}{}", ENVELOPE_MARKER, STANDARD.encode(value.to_string()))
    }

    #[test]
    fn test_unpack_reproduces_packed_envelope() {
        let envelope = sample();
        let packed = envelope.pack();

        assert!(packed.starts_with(ENVELOPE_MARKER));
        assert_eq!(Envelope::unpack(&packed).unwrap(), envelope);
        assert_eq!(packed.parse::<Envelope>().unwrap(), envelope);
    }

    #[test]
    fn test_wire_body_layout() {
        let envelope = sample();
        let packed = envelope.pack();
        let json = STANDARD
            .decode(packed.strip_prefix(ENVELOPE_MARKER).unwrap())
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();

        assert!(value["ephem"].is_string());
        assert_eq!(value["iv"].as_array().unwrap().len(), NONCE_SIZE);
        assert_eq!(value["iv"][0], 7);
        assert_eq!(
            value["data"].as_array().unwrap().len(),
            b"not really ciphertext".len()
        );
    }

    #[test]
    fn test_unpack_accepts_reordered_fields() {
        let envelope = sample();
        let packed = pack_json(serde_json::json!({
            "data": envelope.ciphertext(),
            "iv": envelope.nonce(),
            "ephem": envelope.ephemeral_public_key().to_jwk_string(),
        }));

        assert_eq!(Envelope::unpack(&packed).unwrap(), envelope);
    }

    #[test]
    fn test_unpack_requires_marker() {
        let packed = sample().pack();
        let unmarked = packed.strip_prefix(ENVELOPE_MARKER).unwrap();
        assert!(matches!(
            Envelope::unpack(unmarked),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_unpack_rejects_bad_base64() {
        assert!(matches!(
            Envelope::unpack("ECIES::!!!not base64!!!"),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_unpack_rejects_missing_and_mistyped_fields() {
        let ephem = SecretKey::generate().public().to_jwk_string();

        let missing_data = pack_json(serde_json::json!({ "ephem": ephem, "iv": vec![0u8; 12] }));
        let string_iv = pack_json(serde_json::json!({ "ephem": ephem, "iv": "abc", "data": [] }));
        let out_of_range =
            pack_json(serde_json::json!({ "ephem": ephem, "iv": vec![300u16; 12], "data": [] }));
        let short_iv = pack_json(serde_json::json!({ "ephem": ephem, "iv": vec![0u8; 8], "data": [] }));
        let bad_ephem = pack_json(serde_json::json!({ "ephem": "{}", "iv": vec![0u8; 12], "data": [] }));

        for packed in [missing_data, string_iv, out_of_range, short_iv, bad_ephem] {
            assert!(
                matches!(
                    Envelope::unpack(&packed),
                    Err(CipherError::MalformedEnvelope(_))
                ),
                "expected malformed envelope for {}",
                packed
            );
        }
    }
}
