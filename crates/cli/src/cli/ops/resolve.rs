use clap::Args;
use common::store::BlobStore;

#[derive(Args, Debug, Clone)]
pub struct Resolve {
    /// URL, data URL, or bare content address
    pub reference: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Resolve {
    type Error = std::convert::Infallible;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(ctx.store.resolve_reference(&self.reference))
    }
}
