use clap::{Args, Subcommand};

pub mod rotate;
pub mod show;

use crate::cli::op::Op;

crate::command_enum! {
    (Show, show::Show),
    (Rotate, rotate::Rotate),
}

// Rename the generated Command to IdentityCommand for clarity
pub type IdentityCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Identity {
    #[command(subcommand)]
    pub command: IdentityCommand,
}

#[async_trait::async_trait]
impl Op for Identity {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
