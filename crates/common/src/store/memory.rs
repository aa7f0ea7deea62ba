use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bytes::Bytes;

use super::blob_id::BlobId;
use super::error::{FailureReason, StoreError};
use super::provider::BlobStore;
use super::response::UploadOutcome;

pub const DEFAULT_MEMORY_AGGREGATOR_URL: &str = "memory://aggregator";

/// In-memory blob store addressing content by its BLAKE3 digest
///
/// Clones share the same underlying blobs.
#[derive(Debug, Clone)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<BlobId, Bytes>>>,
    aggregator_url: String,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::with_aggregator_url(DEFAULT_MEMORY_AGGREGATOR_URL)
    }

    pub fn with_aggregator_url(aggregator_url: impl Into<String>) -> Self {
        Self {
            blobs: Arc::new(RwLock::new(HashMap::new())),
            aggregator_url: aggregator_url.into(),
        }
    }

    /// The address this store assigns to `data`
    pub fn address_of(data: &[u8]) -> BlobId {
        // the url-safe alphabet is exactly what BlobId accepts
        BlobId::new_unchecked(URL_SAFE_NO_PAD.encode(blake3::hash(data).as_bytes()))
    }

    pub fn len(&self) -> usize {
        // counting is safe on a poisoned map
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(&self, data: Bytes) -> Result<UploadOutcome, StoreError> {
        let blob_id = Self::address_of(&data);
        let mut blobs = self.blobs.write().map_err(|e| {
            StoreError::Write(FailureReason::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })?;

        let newly_created = !blobs.contains_key(&blob_id);
        if newly_created {
            blobs.insert(blob_id.clone(), data);
        }
        tracing::debug!("stored blob {} (newly created: {})", blob_id, newly_created);

        Ok(UploadOutcome {
            blob_id,
            newly_created,
        })
    }

    async fn read(&self, blob_id: &BlobId) -> Result<Bytes, StoreError> {
        let blobs = self.blobs.read().map_err(|e| {
            StoreError::Read(FailureReason::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })?;

        blobs
            .get(blob_id)
            .cloned()
            .ok_or(StoreError::Read(FailureReason::NotFound))
    }

    fn aggregator_url(&self) -> &str {
        &self.aggregator_url
    }
}
