//! Local identity management
//!
//! The local party owns exactly one P-256 key pair. It is created on
//! first use and persisted through a [`KeyStore`], the only mutable
//! local state in this crate. Backing stores are pluggable: a PEM file
//! on disk for real use, memory for tests.

mod file;
mod key_store;
mod manager;
mod memory;

pub use file::FileKeyStore;
pub use key_store::{KeyStore, KeyStoreError};
pub use manager::{KeyManager, KeyPair};
pub use memory::MemoryKeyStore;
