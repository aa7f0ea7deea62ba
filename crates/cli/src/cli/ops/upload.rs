use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;
use common::store::{BlobStore, StoreError};

use crate::cli::io::{read_input, InputError};

#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// File to upload as-is (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Upload {
    type Error = UploadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let data = read_input(self.input.as_deref()).await?;
        let blob_id = ctx.store.upload(Bytes::from(data)).await?;
        Ok(blob_id.to_string())
    }
}
