// CLI modules
mod cli;
mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cli::op::{Op, OpContext};
use cli::{
    args::Args, Decrypt, Encrypt, Identity, Init, Read, ReceiveMessage, Resolve, SendMessage,
    Upload, Version,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

command_enum! {
    (Init, Init),
    (Identity, Identity),
    (Encrypt, Encrypt),
    (Decrypt, Decrypt),
    (Upload, Upload),
    (Read, Read),
    (Resolve, Resolve),
    (Send, SendMessage),
    (Receive, ReceiveMessage),
    (Version, Version),
}

/// Log to stderr so stdout carries only command output.
/// The returned guard must be kept alive until exit.
fn init_logging(log_level: tracing::Level) -> tracing_appender::non_blocking::WorkerGuard {
    let (stderr_writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stderr_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();

    guard
}

async fn run(args: Args) -> anyhow::Result<OpOutput> {
    // Build context - always has a storage client initialized
    let ctx = OpContext::new(args.config_path).context("failed to set up")?;
    let output = args.command.execute(&ctx).await?;
    Ok(output)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let guard = init_logging(args.log_level);

    let code = match run(args).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    // flush pending log lines before exiting
    drop(guard);
    std::process::exit(code);
}
