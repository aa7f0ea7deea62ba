use serde::Deserialize;

use super::blob_id::BlobId;
use super::error::{FailureReason, StoreError};

/// Body of a successful publisher write
///
/// Both variants are success: the network either stored the bytes now,
/// or recognized them and returned the address it already had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublisherResponse {
    NewlyCreated { blob_id: BlobId },
    AlreadyCertified { blob_id: BlobId },
}

/// Other members of the body (cost, storage info, events) are ignored
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(rename = "newlyCreated")]
    newly_created: Option<WireNewlyCreated>,
    #[serde(rename = "alreadyCertified")]
    already_certified: Option<WireAlreadyCertified>,
}

#[derive(Debug, Deserialize)]
struct WireNewlyCreated {
    #[serde(rename = "blobObject")]
    blob_object: WireBlobObject,
}

#[derive(Debug, Deserialize)]
struct WireBlobObject {
    #[serde(rename = "blobId")]
    blob_id: BlobId,
}

#[derive(Debug, Deserialize)]
struct WireAlreadyCertified {
    #[serde(rename = "blobId")]
    blob_id: BlobId,
}

fn unexpected_response() -> StoreError {
    StoreError::Write(FailureReason::UnexpectedResponse(
        "unexpected response format".to_string(),
    ))
}

impl PublisherResponse {
    /// Decode a publisher response body
    ///
    /// `newlyCreated` takes precedence when both members are present.
    /// A body with neither is a write failure with reason
    /// `UnexpectedResponse("unexpected response format")`.
    pub fn from_json(body: &[u8]) -> Result<Self, StoreError> {
        let wire: WireResponse = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("undecodable publisher response: {}", e);
            unexpected_response()
        })?;

        match (wire.newly_created, wire.already_certified) {
            (Some(created), _) => Ok(Self::NewlyCreated {
                blob_id: created.blob_object.blob_id,
            }),
            (None, Some(certified)) => Ok(Self::AlreadyCertified {
                blob_id: certified.blob_id,
            }),
            (None, None) => Err(unexpected_response()),
        }
    }

    pub fn blob_id(&self) -> &BlobId {
        match self {
            Self::NewlyCreated { blob_id } | Self::AlreadyCertified { blob_id } => blob_id,
        }
    }

    pub fn is_newly_created(&self) -> bool {
        matches!(self, Self::NewlyCreated { .. })
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub blob_id: BlobId,
    /// `false` when the network already held these bytes
    pub newly_created: bool,
}

impl From<PublisherResponse> for UploadOutcome {
    fn from(response: PublisherResponse) -> Self {
        let newly_created = response.is_newly_created();
        let blob_id = match response {
            PublisherResponse::NewlyCreated { blob_id }
            | PublisherResponse::AlreadyCertified { blob_id } => blob_id,
        };
        Self {
            blob_id,
            newly_created,
        }
    }
}
