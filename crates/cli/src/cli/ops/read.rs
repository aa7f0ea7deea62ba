use clap::Args;
use common::store::{BlobId, BlobStore, StoreError};

use crate::cli::io::Payload;

#[derive(Args, Debug, Clone)]
pub struct Read {
    /// Content address of the blob
    pub blob_id: BlobId,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Read {
    type Error = StoreError;
    type Output = Payload;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let bytes = ctx.store.read(&self.blob_id).await?;
        Ok(Payload(bytes.to_vec()))
    }
}
