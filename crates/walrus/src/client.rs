use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use url::Url;

use common::store::{
    BlobId, BlobStore, FailureReason, PublisherResponse, StoreError, UploadOutcome,
};

use super::config::WalrusConfig;
use super::error::WalrusError;

/// Blob store backed by a Walrus publisher and aggregator
///
/// Construct once and share: the underlying `reqwest::Client` pools
/// connections across calls.
#[derive(Debug, Clone)]
pub struct WalrusClient {
    publisher: Url,
    aggregator: Url,
    epochs: u32,
    client: Client,
}

impl WalrusClient {
    pub fn new(config: &WalrusConfig) -> Result<Self, WalrusError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            publisher: base_url(&config.publisher_url)?,
            aggregator: base_url(&config.aggregator_url)?,
            epochs: config.epochs,
            client,
        })
    }

    pub fn publisher_url(&self) -> &Url {
        &self.publisher
    }

    pub fn epochs(&self) -> u32 {
        self.epochs
    }

    /// `PUT` target for writes: `{publisher}/v1/blobs?epochs={N}`
    fn write_url(&self) -> Url {
        let mut url = endpoint(&self.publisher, &["v1", "blobs"]);
        url.query_pairs_mut()
            .append_pair("epochs", &self.epochs.to_string());
        url
    }

    /// `GET` target for reads: `{aggregator}/v1/blobs/{blob_id}`
    fn read_url(&self, blob_id: &BlobId) -> Url {
        endpoint(&self.aggregator, &["v1", "blobs", blob_id.as_str()])
    }
}

fn base_url(raw: &str) -> Result<Url, WalrusError> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(WalrusError::NotABaseUrl(raw.to_string()));
    }
    Ok(url)
}

fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // base urls are checked on construction
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn transport_failure(err: reqwest::Error) -> FailureReason {
    if err.is_timeout() {
        FailureReason::Timeout
    } else {
        FailureReason::Network(err.to_string())
    }
}

fn status_failure(status: StatusCode, body: &[u8]) -> FailureReason {
    FailureReason::HttpStatus {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

#[async_trait]
impl BlobStore for WalrusClient {
    async fn store(&self, data: Bytes) -> Result<UploadOutcome, StoreError> {
        let url = self.write_url();
        tracing::debug!(len = data.len(), %url, "uploading blob");

        let response = self
            .client
            .put(url)
            .body(data)
            .send()
            .await
            .map_err(|e| StoreError::Write(transport_failure(e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Write(transport_failure(e)))?;

        if !status.is_success() {
            tracing::warn!(%status, "publisher rejected upload");
            return Err(StoreError::Write(status_failure(status, &body)));
        }

        let outcome = UploadOutcome::from(PublisherResponse::from_json(&body)?);
        tracing::info!(
            blob_id = %outcome.blob_id,
            newly_created = outcome.newly_created,
            "uploaded blob"
        );
        Ok(outcome)
    }

    async fn read(&self, blob_id: &BlobId) -> Result<Bytes, StoreError> {
        let url = self.read_url(blob_id);
        tracing::debug!(%url, "reading blob");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Read(transport_failure(e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::warn!(%blob_id, "blob not found");
            return Err(StoreError::Read(FailureReason::NotFound));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Read(transport_failure(e)))?;

        if !status.is_success() {
            tracing::warn!(%status, %blob_id, "aggregator rejected read");
            return Err(StoreError::Read(status_failure(status, &body)));
        }

        tracing::debug!(len = body.len(), %blob_id, "read blob");
        Ok(body)
    }

    fn aggregator_url(&self) -> &str {
        self.aggregator.as_str()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn client(publisher: &str, aggregator: &str) -> WalrusClient {
        WalrusClient::new(&WalrusConfig::new(publisher, aggregator).with_epochs(5)).unwrap()
    }

    #[test]
    fn test_write_url() {
        let client = client("https://publisher.example", "https://aggregator.example");
        assert_eq!(
            client.write_url().as_str(),
            "https://publisher.example/v1/blobs?epochs=5"
        );
    }

    #[test]
    fn test_urls_keep_base_path() {
        let client = client(
            "https://gateway.example/publisher/",
            "https://gateway.example/aggregator",
        );
        assert_eq!(
            client.write_url().as_str(),
            "https://gateway.example/publisher/v1/blobs?epochs=5"
        );

        let blob_id: BlobId = "abc-_123".parse().unwrap();
        assert_eq!(
            client.read_url(&blob_id).as_str(),
            "https://gateway.example/aggregator/v1/blobs/abc-_123"
        );
    }

    #[test]
    fn test_resolve_reference() {
        let client = client("https://publisher.example", "https://aggregator.example");
        assert_eq!(
            client.resolve_reference("abc"),
            "https://aggregator.example/v1/abc"
        );
        assert_eq!(
            client.resolve_reference("data:text/plain,abc"),
            "data:text/plain,abc"
        );
    }

    #[test]
    fn test_rejects_bad_base_urls() {
        let err = WalrusClient::new(&WalrusConfig::new("not a url", "https://ok.example"));
        assert!(matches!(err, Err(WalrusError::UrlParse(_))));

        let err = WalrusClient::new(&WalrusConfig::new(
            "https://ok.example",
            "mailto:someone@example.com",
        ));
        assert!(matches!(err, Err(WalrusError::NotABaseUrl(_))));
    }
}
