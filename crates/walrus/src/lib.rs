//! HTTP client for a Walrus storage network
//!
//! Writes go to a publisher, reads to an aggregator. Both speak plain
//! HTTP, so the client is a thin layer over `reqwest` implementing
//! [`common::store::BlobStore`].

mod client;
mod config;
mod error;

pub use client::WalrusClient;
pub use config::{WalrusConfig, DEFAULT_AGGREGATOR_URL, DEFAULT_EPOCHS, DEFAULT_PUBLISHER_URL};
pub use error::WalrusError;
