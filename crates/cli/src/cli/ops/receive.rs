use clap::Args;
use common::crypto::CipherError;
use common::store::{BlobId, BlobStore, StoreError};

use crate::cli::io::Payload;
use crate::state::StateError;

/// Fetch a blob and decrypt it with the local identity
#[derive(Args, Debug, Clone)]
pub struct ReceiveMessage {
    /// Content address of the envelope
    pub blob_id: BlobId,
}

#[derive(Debug, thiserror::Error)]
pub enum ReceiveError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for ReceiveMessage {
    type Error = ReceiveError;
    type Output = Payload;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let identity = ctx.identity()?;
        let bytes = ctx.store.read(&self.blob_id).await?;

        let plaintext = ctx.cipher.decrypt_bytes(&bytes, &identity.private_key)?;
        Ok(Payload(plaintext))
    }
}
