use std::path::PathBuf;

use clap::Args;
use common::crypto::CipherError;

use crate::cli::io::{read_input, InputError, Payload};
use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Decrypt {
    /// File holding the envelope (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecryptError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Decrypt {
    type Error = DecryptError;
    type Output = Payload;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let identity = ctx.identity()?;
        let input = read_input(self.input.as_deref()).await?;

        let plaintext = ctx.cipher.decrypt_bytes(&input, &identity.private_key)?;
        Ok(Payload(plaintext))
    }
}
