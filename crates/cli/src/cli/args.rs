pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "blobseal")]
#[command(about = "Encrypt messages for a public key and exchange them through Walrus")]
#[command(version)]
pub struct Args {
    /// Path to the blobseal config directory (defaults to ~/.blobseal)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace), overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: crate::Command,
}
