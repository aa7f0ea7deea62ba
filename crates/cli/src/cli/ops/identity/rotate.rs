use clap::Args;

use crate::state::StateError;

/// Replace the local identity with a new key pair
///
/// Messages sealed for the old public key can no longer be opened.
#[derive(Args, Debug, Clone)]
pub struct Rotate;

#[async_trait::async_trait]
impl crate::cli::op::Op for Rotate {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let identity = ctx.state()?.key_manager().rotate()?;
        Ok(identity.public_key.to_jwk_string())
    }
}
