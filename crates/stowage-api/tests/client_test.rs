#![allow(clippy::unwrap_used)]
// Integration tests for `RegistryClient` using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stowage_api::{Error, RegistryClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RegistryClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RegistryClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn get_unwraps_data_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "1", "name": "oink" }]
        })))
        .mount(&server)
        .await;

    let payload: Vec<serde_json::Value> = client.get("entities").await.unwrap();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload[0]["name"], "oink");
}

#[tokio::test]
async fn get_with_query_sends_parameters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("value", "esel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    let _: serde_json::Value = client
        .get_with_query("search", &[("value", "esel")])
        .await
        .unwrap();
}

#[tokio::test]
async fn malformed_body_surfaces_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result: Result<Vec<serde_json::Value>, _> = client.get("entities").await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

#[tokio::test]
async fn malformed_body_preview_respects_char_boundaries() {
    let (server, client) = setup().await;

    // A non-envelope 2xx body whose multi-byte char straddles the
    // 200-byte preview cutoff.
    let body = format!("{}€ and more trailing text", "x".repeat(199));
    Mock::given(method("GET"))
        .and(path("/v1/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result: Result<Vec<serde_json::Value>, _> = client.get("entities").await;
    match result {
        Err(Error::Deserialization { message, .. }) => {
            assert!(message.contains("body preview"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Credential handling ─────────────────────────────────────────────

#[tokio::test]
async fn bearer_token_applied_after_set() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(header("authorization", "Bearer sesam"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    client.set_bearer("sesam".into());
    let users: Vec<serde_json::Value> = client.get("users").await.unwrap();
    assert!(users.is_empty());

    client.clear_bearer();
    assert!(!client.has_bearer());
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "token expired" })),
        )
        .mount(&server)
        .await;

    let result: Result<Vec<serde_json::Value>, _> = client.get("users").await;
    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "token expired"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn api_error_carries_status_and_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/entities"))
        .respond_with(
            ResponseTemplate::new(412).set_body_json(json!({ "message": "name taken" })),
        )
        .mount(&server)
        .await;

    let result: Result<serde_json::Value, _> =
        client.post("entities", &json!({ "name": "oink" })).await;
    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 412);
            assert_eq!(message, "name taken");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn plain_text_error_body_truncates_on_char_boundary() {
    let (server, client) = setup().await;

    // Proxy-style bare error body with a multi-byte char straddling
    // the preview cutoff; the message must truncate, not panic.
    let body = format!("{}ä tail", "x".repeat(199));
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let result: Result<Vec<serde_json::Value>, _> = client.get("users").await;
    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "x".repeat(199));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn delete_succeeds_on_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/entities/oink"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.delete("entities/oink").await.unwrap();
}

// ── Interceptor ─────────────────────────────────────────────────────

#[tokio::test]
async fn interceptor_fires_once_per_failed_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .mount(&server)
        .await;

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    client.set_failure_interceptor(Arc::new(move |_err| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let result: Result<Vec<serde_json::Value>, _> = client.get("groups").await;
    assert!(result.is_err());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn interceptor_silent_on_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    client.set_failure_interceptor(Arc::new(move |_err| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let _: Vec<serde_json::Value> = client.get("groups").await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
