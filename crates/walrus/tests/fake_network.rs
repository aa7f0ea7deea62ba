//! Integration tests for WalrusClient against an in-process fake
//! publisher and aggregator

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;

use common::store::{BlobId, BlobStore, FailureReason, MemoryBlobStore, StoreError};
use walrus::{WalrusClient, WalrusConfig};

/// Publisher and aggregator sharing one blob table
#[derive(Clone, Default)]
struct FakeWalrus {
    blobs: MemoryBlobStore,
    epochs_seen: Arc<Mutex<Vec<String>>>,
}

async fn put_blob(
    State(state): State<FakeWalrus>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    if let Some(epochs) = query.get("epochs") {
        state.epochs_seen.lock().unwrap().push(epochs.clone());
    }

    let outcome = state.blobs.store(body.clone()).await.unwrap();
    let response = if outcome.newly_created {
        json!({
            "newlyCreated": {
                "blobObject": {
                    "id": "0x5c1f",
                    "registeredEpoch": 34,
                    "blobId": outcome.blob_id.as_str(),
                    "size": body.len(),
                    "encodingType": "RS2",
                    "certifiedEpoch": 34,
                    "storage": { "startEpoch": 34, "endEpoch": 134 },
                    "deletable": false
                },
                "resourceOperation": { "registerFromScratch": {} },
                "cost": 132300
            }
        })
    } else {
        json!({
            "alreadyCertified": {
                "blobId": outcome.blob_id.as_str(),
                "event": { "txDigest": "4XQHFa9S", "eventSeq": "0" },
                "endEpoch": 134
            }
        })
    };
    Json(response).into_response()
}

async fn get_blob(State(state): State<FakeWalrus>, Path(blob_id): Path<String>) -> Response {
    let Ok(blob_id) = blob_id.parse::<BlobId>() else {
        return (StatusCode::BAD_REQUEST, "invalid blob id").into_response();
    };
    match state.blobs.read(&blob_id).await {
        Ok(bytes) => bytes.into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "blob not found").into_response(),
    }
}

fn fake_router(state: FakeWalrus) -> Router {
    Router::new()
        .route("/v1/blobs", put(put_blob))
        .route("/v1/blobs/:blob_id", get(get_blob))
        .with_state(state)
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn setup() -> (WalrusClient, FakeWalrus) {
    let state = FakeWalrus::default();
    let base = spawn(fake_router(state.clone())).await;
    let config = WalrusConfig::new(&base, &base).with_epochs(7);
    (WalrusClient::new(&config).unwrap(), state)
}

async fn client_for(router: Router, timeout: Option<Duration>) -> WalrusClient {
    let base = spawn(router).await;
    WalrusClient::new(&WalrusConfig::new(&base, &base).with_timeout(timeout)).unwrap()
}

#[tokio::test]
async fn test_upload_then_read() {
    let (client, state) = setup().await;
    let data = Bytes::from_static(b"ECIES::not-really-an-envelope");

    let outcome = client.store(data.clone()).await.unwrap();
    assert!(outcome.newly_created);
    assert_eq!(outcome.blob_id, MemoryBlobStore::address_of(&data));
    assert_eq!(client.read(&outcome.blob_id).await.unwrap(), data);

    assert_eq!(*state.epochs_seen.lock().unwrap(), vec!["7".to_string()]);
}

#[tokio::test]
async fn test_repeat_upload_is_already_certified() {
    let (client, _state) = setup().await;
    let data = Bytes::from_static(b"same bytes");

    let first = client.store(data.clone()).await.unwrap();
    let second = client.store(data.clone()).await.unwrap();

    assert!(first.newly_created);
    assert!(!second.newly_created);
    assert_eq!(first.blob_id, second.blob_id);

    assert_eq!(client.upload(data).await.unwrap(), first.blob_id);
}

#[tokio::test]
async fn test_read_missing_blob_is_not_found() {
    let (client, _state) = setup().await;
    let missing = MemoryBlobStore::address_of(b"never uploaded");

    let err = client.read(&missing).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err, StoreError::Read(FailureReason::NotFound));
}

#[tokio::test]
async fn test_unexpected_publisher_response() {
    let router = Router::new().route(
        "/v1/blobs",
        put(|| async { Json(json!({ "markedInvalid": { "blobId": "abc" } })) }),
    );
    let client = client_for(router, None).await;

    let err = client.upload(Bytes::from_static(b"x")).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Write(FailureReason::UnexpectedResponse(
            "unexpected response format".to_string()
        ))
    );
}

#[tokio::test]
async fn test_publisher_error_status_is_surfaced() {
    let router = Router::new().route(
        "/v1/blobs",
        put(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "out of storage funds") }),
    );
    let client = client_for(router, None).await;

    let err = client.upload(Bytes::from_static(b"x")).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Write(FailureReason::HttpStatus {
            status: 500,
            body: "out of storage funds".to_string(),
        })
    );
}

#[tokio::test]
async fn test_aggregator_error_status_is_surfaced() {
    let router = Router::new().route(
        "/v1/blobs/:blob_id",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
    );
    let client = client_for(router, None).await;

    let err = client
        .read(&MemoryBlobStore::address_of(b"x"))
        .await
        .unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(
        err,
        StoreError::Read(FailureReason::HttpStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_timeout_is_distinguishable() {
    let slow = || async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "too late"
    };
    let router = Router::new()
        .route("/v1/blobs", put(slow))
        .route("/v1/blobs/:blob_id", get(slow));
    let client = client_for(router, Some(Duration::from_millis(200))).await;

    let err = client.upload(Bytes::from_static(b"x")).await.unwrap_err();
    assert_eq!(err, StoreError::Write(FailureReason::Timeout));
    assert!(err.is_timeout());

    let err = client
        .read(&MemoryBlobStore::address_of(b"x"))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::Read(FailureReason::Timeout));
}

#[tokio::test]
async fn test_unreachable_network() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = WalrusClient::new(&WalrusConfig::new(&base, &base)).unwrap();
    let err = client.upload(Bytes::from_static(b"x")).await.unwrap_err();
    assert!(matches!(err, StoreError::Write(FailureReason::Network(_))));
}
