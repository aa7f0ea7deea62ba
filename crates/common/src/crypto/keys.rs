use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};

use aes_gcm::aead::OsRng;

/// Size of a P-256 private scalar in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Size of a single P-256 affine coordinate in bytes
pub const COORDINATE_SIZE: usize = 32;
/// Curve name as it appears in exported keys
pub const CURVE_NAME: &str = "P-256";
/// JWK key type for elliptic-curve keys
pub const KEY_TYPE: &str = "EC";
/// PEM tag used when persisting a secret key
pub const PEM_TAG: &str = "PRIVATE KEY";

/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The input does not describe a valid key on the expected curve
    #[error("malformed key: {0}")]
    Malformed(String),
}

impl KeyError {
    fn malformed(msg: impl Into<String>) -> Self {
        KeyError::Malformed(msg.into())
    }
}

/// JSON Web Key form of a P-256 public key.
///
/// Field order is fixed so that exporting the same key always yields
/// the same string. `ext` and `key_ops` mirror what browser crypto
/// runtimes emit and are optional on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Jwk {
    crv: String,
    #[serde(default)]
    ext: bool,
    #[serde(default)]
    key_ops: Vec<String>,
    kty: String,
    x: String,
    y: String,
}

/// Public half of a P-256 key pair
///
/// A thin wrapper around `p256::PublicKey`. Public keys are shared
/// freely: they are published out-of-band (e.g. in a profile record)
/// and used as the recipient of an [`Envelope`](super::Envelope).
///
/// # Examples
///
/// ```ignore
/// let secret_key = SecretKey::generate();
/// let public_key = secret_key.public();
///
/// // Export as a JWK string for sharing
/// let jwk = public_key.to_jwk_string();
/// let recovered = PublicKey::from_jwk_str(&jwk)?;
/// assert_eq!(public_key, recovered);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(p256::PublicKey);

impl From<p256::PublicKey> for PublicKey {
    fn from(key: p256::PublicKey) -> Self {
        PublicKey(key)
    }
}

impl From<PublicKey> for p256::PublicKey {
    fn from(key: PublicKey) -> Self {
        key.0
    }
}

impl PublicKey {
    /// Serialize the key as a JWK JSON string
    ///
    /// Deterministic and lossless: importing the result with
    /// [`PublicKey::from_jwk_str`] reconstructs the exact same point.
    pub fn to_jwk_string(&self) -> String {
        // uncompressed encoding of a valid key always carries both coordinates
        let point = self.0.to_encoded_point(false);
        let x = point.x().map(|x| x.as_slice()).unwrap_or_default();
        let y = point.y().map(|y| y.as_slice()).unwrap_or_default();

        let jwk = Jwk {
            crv: CURVE_NAME.to_string(),
            ext: true,
            key_ops: Vec::new(),
            kty: KEY_TYPE.to_string(),
            x: URL_SAFE_NO_PAD.encode(x),
            y: URL_SAFE_NO_PAD.encode(y),
        };

        // serializing a struct of strings into a String cannot fail
        serde_json::to_string(&jwk).unwrap_or_default()
    }

    /// Parse a key from its JWK JSON string
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Malformed`] if:
    /// - The string is not a JSON object with `kty`, `crv`, `x` and `y`
    /// - The key type is not `EC` or the curve is not `P-256`
    /// - A coordinate is not 32 bytes of unpadded base64url
    /// - The coordinates do not describe a point on the curve
    pub fn from_jwk_str(jwk: &str) -> Result<Self, KeyError> {
        let jwk: Jwk = serde_json::from_str(jwk)
            .map_err(|e| KeyError::malformed(format!("invalid JWK: {}", e)))?;

        if jwk.kty != KEY_TYPE {
            return Err(KeyError::malformed(format!(
                "unsupported key type, expected {}, got {}",
                KEY_TYPE, jwk.kty
            )));
        }
        if jwk.crv != CURVE_NAME {
            return Err(KeyError::malformed(format!(
                "unsupported curve, expected {}, got {}",
                CURVE_NAME, jwk.crv
            )));
        }

        let x = decode_coordinate("x", &jwk.x)?;
        let y = decode_coordinate("y", &jwk.y)?;

        // SEC1 uncompressed encoding: 0x04 || x || y
        let mut sec1 = Vec::with_capacity(1 + 2 * COORDINATE_SIZE);
        sec1.push(0x04);
        sec1.extend_from_slice(&x);
        sec1.extend_from_slice(&y);

        Self::from_sec1_bytes(&sec1)
    }

    /// Parse a key from its SEC1 encoding (compressed or uncompressed)
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        p256::PublicKey::from_sec1_bytes(bytes)
            .map(PublicKey)
            .map_err(|_| KeyError::malformed("point is not on the P-256 curve"))
    }

    /// Uncompressed SEC1 encoding of the key
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }

    pub(crate) fn inner(&self) -> &p256::PublicKey {
        &self.0
    }
}

fn decode_coordinate(name: &str, value: &str) -> Result<[u8; COORDINATE_SIZE], KeyError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| KeyError::malformed(format!("coordinate {} is not base64url", name)))?;
    if bytes.len() != COORDINATE_SIZE {
        return Err(KeyError::malformed(format!(
            "invalid coordinate {} size, expected {}, got {}",
            name,
            COORDINATE_SIZE,
            bytes.len()
        )));
    }
    let mut buff = [0u8; COORDINATE_SIZE];
    buff.copy_from_slice(&bytes);
    Ok(buff)
}

/// Private half of a P-256 key pair
///
/// A thin wrapper around `p256::SecretKey`. This key is exclusively
/// owned by the local identity and is never embedded in an envelope
/// or uploaded to the blob store.
///
/// # Security Considerations
///
/// - Never share this key over the network
/// - Persist it only through a [`KeyStore`](crate::identity::KeyStore)
/// - `Debug` output does not reveal the scalar
///
/// # Examples
///
/// ```ignore
/// let secret_key = SecretKey::generate();
///
/// // Persist to PEM format
/// let pem = secret_key.to_pem();
/// let recovered = SecretKey::from_pem(&pem)?;
/// assert_eq!(secret_key.public(), recovered.public());
/// ```
#[derive(Debug, Clone)]
pub struct SecretKey(p256::SecretKey);

impl From<p256::SecretKey> for SecretKey {
    fn from(key: p256::SecretKey) -> Self {
        SecretKey(key)
    }
}

impl SecretKey {
    /// Generate a new random secret key using the OS RNG
    pub fn generate() -> Self {
        SecretKey(p256::SecretKey::random(&mut OsRng))
    }

    /// Parse a secret key from its raw 32-byte scalar
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is not 32 bytes or the scalar is
    /// zero or not below the curve order.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(KeyError::malformed(format!(
                "invalid private key size, expected {}, got {}",
                PRIVATE_KEY_SIZE,
                bytes.len()
            )));
        }
        p256::SecretKey::from_bytes(p256::FieldBytes::from_slice(bytes))
            .map(SecretKey)
            .map_err(|_| KeyError::malformed("private key scalar out of range"))
    }

    /// Derive the public key from this secret key
    pub fn public(&self) -> PublicKey {
        PublicKey(self.0.public_key())
    }

    /// Convert secret key to raw scalar bytes
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        let mut buff = [0u8; PRIVATE_KEY_SIZE];
        buff.copy_from_slice(&self.0.to_bytes());
        buff
    }

    /// Encode secret key in PEM format for storage
    ///
    /// Returns a PEM-encoded string with tag "PRIVATE KEY" wrapping
    /// the raw scalar.
    pub fn to_pem(&self) -> String {
        let pem = pem::Pem::new(PEM_TAG, self.to_bytes());
        pem::encode(&pem)
    }

    /// Parse a secret key from PEM format
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The PEM string is malformed
    /// - The PEM tag is not "PRIVATE KEY"
    /// - The key size is incorrect
    pub fn from_pem(pem_str: &str) -> Result<Self, KeyError> {
        let pem = pem::parse(pem_str)
            .map_err(|e| KeyError::malformed(format!("failed to parse PEM: {}", e)))?;

        if pem.tag() != PEM_TAG {
            return Err(KeyError::malformed(format!(
                "invalid PEM tag, expected {}",
                PEM_TAG
            )));
        }

        Self::from_slice(pem.contents())
    }

    pub(crate) fn inner(&self) -> &p256::SecretKey {
        &self.0
    }
}
