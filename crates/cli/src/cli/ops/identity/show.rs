use clap::Args;

use crate::state::StateError;

/// Print the local public key for sharing
#[derive(Args, Debug, Clone)]
pub struct Show;

#[async_trait::async_trait]
impl crate::cli::op::Op for Show {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let identity = ctx.identity()?;
        Ok(identity.public_key.to_jwk_string())
    }
}
