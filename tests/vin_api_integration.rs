//! End-to-end tests of the VIN HTTP API
//!
//! The router runs against an in-memory SQLite database and a scripted
//! decoder that counts how often it is called.

use async_trait::async_trait;
use axum::http::{StatusCode, header};
use axum_test::TestServer;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vin_cache::{
    config::Config,
    database::Database,
    decoder::{DecodeOutcome, DecoderError, VinDecoder},
    models::{DecodeError, VehicleAttributes, Vin},
    web::{AppState, create_app},
};

const CLEAN_VIN: &str = "1XPWD40X1ED215307";
const BAD_CHECK_DIGIT_VIN: &str = "19XZE4F96KE027095";
const NEVER_CACHED_VIN: &str = "4V4NC9EJXEN171694";

/// Decoder answering from a fixed table; unknown VINs fail like an
/// unavailable upstream
struct ScriptedDecoder {
    outcomes: HashMap<String, DecodeOutcome>,
    calls: AtomicUsize,
}

impl ScriptedDecoder {
    fn new() -> Self {
        let mut outcomes = HashMap::new();
        outcomes.insert(
            CLEAN_VIN.to_string(),
            DecodeOutcome::Decoded(VehicleAttributes {
                make: Some("TestMake".to_string()),
                model: Some("TestModel".to_string()),
                model_year: Some("TestModelYear".to_string()),
                body_class: Some("TestBodyClass".to_string()),
            }),
        );
        outcomes.insert(
            BAD_CHECK_DIGIT_VIN.to_string(),
            DecodeOutcome::Rejected(DecodeError {
                error_code: "1".to_string(),
                error_text: Some(
                    "1 - Check Digit (9th position) does not calculate properly".to_string(),
                ),
                additional_error_text: Some(String::new()),
            }),
        );

        Self {
            outcomes,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VinDecoder for ScriptedDecoder {
    async fn decode(&self, vin: &Vin) -> Result<DecodeOutcome, DecoderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .get(vin.as_str())
            .cloned()
            .ok_or_else(|| DecoderError::Status {
                status: 503,
                url: format!("http://upstream.test/{vin}"),
            })
    }
}

async fn create_test_server() -> (TestServer, Arc<ScriptedDecoder>) {
    let database = Database::new_in_memory()
        .await
        .expect("Failed to create test database");
    database.migrate().await.expect("Failed to run migrations");

    let decoder = Arc::new(ScriptedDecoder::new());
    let state = AppState::new(database, Config::default(), decoder.clone());
    let server = TestServer::new(create_app(state)).expect("Failed to start test server");

    (server, decoder)
}

#[tokio::test]
async fn test_welcome_message() {
    let (server, _) = create_test_server().await;

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Welcome to the Vin Decode Application!" })
    );
}

#[tokio::test]
async fn test_lookup_miss_then_hit() {
    let (server, decoder) = create_test_server().await;

    let first = server.get(&format!("/lookup/{CLEAN_VIN}")).await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let body: Value = first.json();
    assert_eq!(body["vin"], CLEAN_VIN);
    assert_eq!(body["make"], "TestMake");
    assert_eq!(body["model"], "TestModel");
    assert_eq!(body["model_year"], "TestModelYear");
    assert_eq!(body["body_class"], "TestBodyClass");
    assert_eq!(body["cached"], false);
    assert_eq!(decoder.calls(), 1);

    let second = server.get(&format!("/lookup/{CLEAN_VIN}")).await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let body: Value = second.json();
    assert_eq!(body["make"], "TestMake");
    assert_eq!(body["cached"], true);
    assert_eq!(decoder.calls(), 1, "cache hit must not reach the decoder");
}

#[tokio::test]
async fn test_lookup_is_case_insensitive() {
    let (server, decoder) = create_test_server().await;

    server.get(&format!("/lookup/{CLEAN_VIN}")).await;
    let response = server
        .get(&format!("/lookup/{}", CLEAN_VIN.to_lowercase()))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["vin"], CLEAN_VIN);
    assert_eq!(body["cached"], true);
    assert_eq!(decoder.calls(), 1);
}

#[tokio::test]
async fn test_rejected_vin_returns_decode_error_and_is_not_cached() {
    let (server, decoder) = create_test_server().await;

    let response = server.get(&format!("/lookup/{BAD_CHECK_DIGIT_VIN}")).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "ErrorCode": "1",
            "ErrorText": "1 - Check Digit (9th position) does not calculate properly",
            "AdditionalErrorText": ""
        })
    );

    // Nothing was stored, so the decoder is consulted again
    server.get(&format!("/lookup/{BAD_CHECK_DIGIT_VIN}")).await;
    assert_eq!(decoder.calls(), 2);

    let removal = server.delete(&format!("/remove/{BAD_CHECK_DIGIT_VIN}")).await;
    assert_eq!(removal.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let (server, _) = create_test_server().await;

    let response = server.get(&format!("/lookup/{NEVER_CACHED_VIN}")).await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "VIN decoder request failed");
}

#[tokio::test]
async fn test_malformed_vin_is_rejected_before_decoding() {
    let (server, decoder) = create_test_server().await;

    for path in ["/lookup/SHORT", "/lookup/1XPWD40X1ED2153077", "/lookup/1XPWD40X1ED21530-"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{path}");
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    let response = server.delete("/remove/SHORT").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert_eq!(decoder.calls(), 0);
}

#[tokio::test]
async fn test_remove_cached_vin_then_again() {
    let (server, _) = create_test_server().await;
    server.get(&format!("/lookup/{CLEAN_VIN}")).await;

    let removed = server.delete(&format!("/remove/{CLEAN_VIN}")).await;
    assert_eq!(removed.status_code(), StatusCode::OK);
    assert_eq!(
        removed.json::<Value>(),
        json!({ "vin": CLEAN_VIN, "deleted": true })
    );

    let again = server.delete(&format!("/remove/{CLEAN_VIN}")).await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(again.json::<Value>()["error"], "VIN not found.");
}

#[tokio::test]
async fn test_remove_unknown_vin_is_not_found() {
    let (server, _) = create_test_server().await;

    let response = server.delete(&format!("/remove/{NEVER_CACHED_VIN}")).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "VIN not found.");
}

#[tokio::test]
async fn test_export_downloads_parquet_file() {
    let (server, _) = create_test_server().await;
    server.get(&format!("/lookup/{CLEAN_VIN}")).await;

    for path in ["/export", "/export/"] {
        let response = server.get(path).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            "application/octet-stream"
        );
        assert_eq!(
            response.header(header::CONTENT_DISPOSITION),
            "attachment; filename=\"decoded_vins.parquet\""
        );

        let file = Bytes::copy_from_slice(response.as_bytes());
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        assert_eq!(builder.metadata().file_metadata().num_rows(), 1);
    }
}

#[tokio::test]
async fn test_export_of_empty_cache_is_valid_file() {
    let (server, _) = create_test_server().await;

    let response = server.get("/export").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let file = Bytes::copy_from_slice(response.as_bytes());
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
    assert_eq!(builder.metadata().file_metadata().num_rows(), 0);
}

#[tokio::test]
async fn test_health_endpoints() {
    let (server, _) = create_test_server().await;

    let health = server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.json::<Value>()["data"]["database"]["status"], "connected");

    assert_eq!(server.get("/ready").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/live").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let (server, _) = create_test_server().await;

    let response = server.get("/").await;

    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "DENY");
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (server, _) = create_test_server().await;

    let response = server.get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let document: Value = response.json();
    assert!(document["paths"]["/lookup/{vin}"].is_object());
    assert!(document["paths"]["/remove/{vin}"].is_object());
}
