use async_trait::async_trait;
use bytes::Bytes;

use super::blob_id::BlobId;
use super::error::StoreError;
use super::reference::resolve_reference;
use super::response::UploadOutcome;

/// Client side of a content-addressed blob network
///
/// Each call is a single best-effort attempt: implementations do not
/// retry. A blob that was just uploaded may briefly fail to read back
/// while the network propagates it; callers decide whether to retry.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Upload `data` and report which address the network assigned
    ///
    /// # Returns
    /// * `Ok(UploadOutcome)` - The address, and whether the bytes were newly stored
    /// * `Err(StoreError::Write(_))` - The network refused the write or could not be reached
    async fn store(&self, data: Bytes) -> Result<UploadOutcome, StoreError>;

    /// Upload `data`, returning only its content address
    async fn upload(&self, data: Bytes) -> Result<BlobId, StoreError> {
        Ok(self.store(data).await?.blob_id)
    }

    /// Fetch the exact bytes previously uploaded under `blob_id`
    ///
    /// Fails with `StoreError::Read(FailureReason::NotFound)` if the
    /// network does not know the address.
    async fn read(&self, blob_id: &BlobId) -> Result<Bytes, StoreError>;

    /// Base URL bare content addresses are templated onto
    fn aggregator_url(&self) -> &str;

    /// Resolve a URL, data URL, or bare content address to a fetchable URL
    fn resolve_reference(&self, reference: &str) -> String {
        resolve_reference(self.aggregator_url(), reference)
    }
}
