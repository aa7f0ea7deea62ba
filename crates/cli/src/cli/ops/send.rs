use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;
use common::crypto::CipherError;
use common::store::{BlobStore, StoreError};

use crate::cli::io::{parse_recipient, read_input, InputError};

/// Encrypt for a recipient and upload the envelope
#[derive(Args, Debug, Clone)]
pub struct SendMessage {
    /// Recipient public key as a JWK, or @path to a file holding one
    #[arg(long)]
    pub recipient: String,

    /// File to send (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for SendMessage {
    type Error = SendError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let recipient = parse_recipient(&self.recipient).await?;
        let plaintext = read_input(self.input.as_deref()).await?;

        let envelope = ctx.cipher.encrypt(&plaintext, &recipient)?;
        let blob_id = ctx.store.upload(Bytes::from(envelope.pack())).await?;
        Ok(blob_id.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::op::{Op, OpContext};
    use crate::cli::ops::ReceiveMessage;
    use common::store::MemoryBlobStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_send_then_receive() {
        let temp = TempDir::new().unwrap();
        let network = MemoryBlobStore::new();
        let alice = OpContext::for_test(temp.path().join("alice"), network.clone());
        let bob = OpContext::for_test(temp.path().join("bob"), network.clone());

        let message = temp.path().join("message.txt");
        std::fs::write(&message, "see you at the pier").unwrap();

        let send = SendMessage {
            recipient: bob.identity().unwrap().public_key.to_jwk_string(),
            input: Some(message),
        };
        let blob_id = send.execute(&alice).await.unwrap();
        assert_eq!(network.len(), 1);

        let receive = ReceiveMessage {
            blob_id: blob_id.parse().unwrap(),
        };
        let received = receive.execute(&bob).await.unwrap();
        assert_eq!(received.to_string(), "see you at the pier");

        // the envelope is sealed for bob alone
        assert!(matches!(
            receive.execute(&alice).await,
            Err(crate::cli::ops::receive::ReceiveError::Cipher(
                CipherError::Decryption
            ))
        ));
    }

    #[tokio::test]
    async fn test_receive_unknown_blob() {
        let temp = TempDir::new().unwrap();
        let ctx = OpContext::for_test(temp.path().join("bob"), MemoryBlobStore::new());

        let receive = ReceiveMessage {
            blob_id: MemoryBlobStore::address_of(b"nothing here"),
        };
        match receive.execute(&ctx).await {
            Err(crate::cli::ops::receive::ReceiveError::Store(e)) => assert!(e.is_not_found()),
            other => panic!("expected not found, got {:?}", other),
        }
    }
}
