//! Content-addressed blob storage
//!
//! The network assigns every blob an address derived from its bytes.
//! Writing the same bytes twice yields the same address, and the
//! "already stored" answer is a success, not an error.

mod blob_id;
mod error;
mod memory;
mod provider;
mod reference;
mod response;

pub use blob_id::BlobId;
pub use error::{FailureReason, StoreError};
pub use memory::{MemoryBlobStore, DEFAULT_MEMORY_AGGREGATOR_URL};
pub use provider::BlobStore;
pub use reference::{resolve_reference, Reference};
pub use response::{PublisherResponse, UploadOutcome};
