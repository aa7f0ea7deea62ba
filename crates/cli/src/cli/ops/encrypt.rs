use std::path::PathBuf;

use clap::Args;
use common::crypto::CipherError;

use crate::cli::io::{parse_recipient, read_input, InputError};

#[derive(Args, Debug, Clone)]
pub struct Encrypt {
    /// Recipient public key as a JWK, or @path to a file holding one
    #[arg(long)]
    pub recipient: String,

    /// File to encrypt (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum EncryptError {
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Encrypt {
    type Error = EncryptError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let recipient = parse_recipient(&self.recipient).await?;
        let plaintext = read_input(self.input.as_deref()).await?;

        let envelope = ctx.cipher.encrypt(&plaintext, &recipient)?;
        Ok(envelope.pack())
    }
}
