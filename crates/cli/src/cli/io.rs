use std::fmt;
use std::path::Path;

use common::crypto::{KeyError, PublicKey};
use tokio::io::AsyncReadExt;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid recipient key: {0}")]
    Recipient(#[from] KeyError),
}

/// Read the whole input file, or stdin when no file is given
pub async fn read_input(path: Option<&Path>) -> Result<Vec<u8>, InputError> {
    match path {
        Some(path) => tokio::fs::read(path).await.map_err(|source| InputError::Read {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .map_err(|source| InputError::Read {
                    path: "stdin".to_string(),
                    source,
                })?;
            Ok(buf)
        }
    }
}

/// Parse a recipient given inline as a JWK, or as `@path` to a file
/// holding one
pub async fn parse_recipient(arg: &str) -> Result<PublicKey, InputError> {
    let jwk = match arg.strip_prefix('@') {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| InputError::Read {
                path: path.to_string(),
                source,
            })?,
        None => arg.to_string(),
    };
    Ok(PublicKey::from_jwk_str(jwk.trim())?)
}

/// Command output that may or may not be text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(pub Vec<u8>);

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(text) => f.write_str(text),
            Err(_) => {
                // Binary content - show hex representation
                let hex = self
                    .0
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect::<Vec<_>>()
                    .join(" ");
                write!(f, "Binary content (hex):\n{}", hex)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use common::crypto::SecretKey;
    use tempfile::TempDir;

    #[test]
    fn test_payload_text() {
        assert_eq!(Payload(b"hello".to_vec()).to_string(), "hello");
    }

    #[test]
    fn test_payload_binary() {
        assert_eq!(
            Payload(vec![0xde, 0xad, 0x00, 0xff]).to_string(),
            "Binary content (hex):\nde ad 00 ff"
        );
    }

    #[tokio::test]
    async fn test_parse_recipient_inline_and_file() {
        let key = SecretKey::generate().public();
        let jwk = key.to_jwk_string();
        assert_eq!(parse_recipient(&jwk).await.unwrap(), key);

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bob.jwk");
        std::fs::write(&path, format!("{}\n", jwk)).unwrap();
        let arg = format!("@{}", path.display());
        assert_eq!(parse_recipient(&arg).await.unwrap(), key);
    }

    #[tokio::test]
    async fn test_parse_recipient_errors() {
        assert!(matches!(
            parse_recipient("not a key").await,
            Err(InputError::Recipient(_))
        ));
        assert!(matches!(
            parse_recipient("@/definitely/not/here.jwk").await,
            Err(InputError::Read { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_input_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("msg.txt");
        std::fs::write(&path, b"contents").unwrap();

        assert_eq!(read_input(Some(&path)).await.unwrap(), b"contents");
        assert!(read_input(Some(&temp.path().join("nope"))).await.is_err());
    }
}
