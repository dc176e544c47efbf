//! `HttpAcsClient` against a local ACS stand-in.

use std::time::Duration;

use serde_json::json;
use splunkacs_client::{AcsApi, AcsConfig, AcsError, HttpAcsClient, ResolvedConfig};
use splunkacs_core::{HecTokenSpec, IndexDataType, IndexPatch, IndexSpec, ResourceName};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_ROOT: &str = "/acme/adminconfig/v2";

fn config(server: &MockServer) -> ResolvedConfig {
    AcsConfig {
        deployment_name: Some("acme".to_string()),
        token: Some("test-token".to_string()),
        base_url: Some(server.uri()),
        request_timeout_seconds: 5,
        connect_timeout_seconds: 1,
    }
    .resolve_with(|_| None)
    .unwrap()
}

fn client(server: &MockServer) -> HttpAcsClient {
    HttpAcsClient::new(&config(server)).unwrap()
}

fn name(value: &str) -> ResourceName {
    ResourceName::new(value).unwrap()
}

#[tokio::test]
async fn gets_hec_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/inputs/http-event-collectors/ci-token")))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "http-event-collector": {
                "spec": {
                    "allowedIndexes": ["main", "web_logs"],
                    "defaultHost": "splunk-prd",
                    "defaultIndex": "main",
                    "defaultSource": "",
                    "defaultSourcetype": "json",
                    "disabled": false,
                    "name": "ci-token",
                    "useACK": true
                },
                "token": "3f1b0c2e-0000-4000-8000-000000000000"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = client(&server).get_hec_token(&name("ci-token")).await.unwrap();

    assert_eq!(token.name().as_str(), "ci-token");
    assert_eq!(token.spec.allowed_indexes, vec!["main", "web_logs"]);
    assert!(token.spec.use_ack);
    assert_eq!(token.token, "3f1b0c2e-0000-4000-8000-000000000000");
}

#[tokio::test]
async fn not_found_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/indexes/ghost")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "404-object-not-found",
            "message": "index ghost not found"
        })))
        .mount(&server)
        .await;

    let err = client(&server).get_index(&name("ghost")).await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        AcsError::Api { code, message, .. } => {
            assert_eq!(code.as_deref(), Some("404-object-not-found"));
            assert_eq!(message, "index ghost not found");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_without_json_body_uses_status_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/status")))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client(&server).get_stack_status().await.unwrap_err();

    assert!(err.is_retriable());
    assert_eq!(
        err.to_string(),
        "ACS returned HTTP 503: Service Unavailable"
    );
}

#[tokio::test]
async fn creates_hec_token_with_acs_keys() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API_ROOT}/inputs/http-event-collectors")))
        .and(body_json(json!({
            "name": "ci-token",
            "allowedIndexes": [],
            "defaultIndex": "main",
            "disabled": false,
            "useACK": false
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let spec = HecTokenSpec::new(name("ci-token"), "main");
    client(&server).create_hec_token(&spec).await.unwrap();
}

#[tokio::test]
async fn updates_hec_token_with_put() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{API_ROOT}/inputs/http-event-collectors/ci-token")))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let mut spec = HecTokenSpec::new(name("ci-token"), "main");
    spec.use_ack = true;
    client(&server).update_hec_token(&spec).await.unwrap();
}

#[tokio::test]
async fn index_lifecycle_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API_ROOT}/indexes")))
        .and(body_json(json!({
            "name": "web_logs",
            "datatype": "event",
            "searchableDays": 90,
            "maxDataSizeMB": 512
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{API_ROOT}/indexes/web_logs")))
        .and(body_json(json!({"searchableDays": 30, "maxDataSizeMB": 512})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("{API_ROOT}/indexes/web_logs")))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let spec = IndexSpec {
        name: name("web_logs"),
        data_type: IndexDataType::Event,
        searchable_days: 90,
        max_data_size_mb: 512,
    };

    client.create_index(&spec).await.unwrap();
    client
        .update_index(
            &spec.name,
            &IndexPatch {
                searchable_days: Some(30),
                max_data_size_mb: Some(512),
            },
        )
        .await
        .unwrap();
    client.delete_index(&spec.name).await.unwrap();
}

#[tokio::test]
async fn gets_stack_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "infrastructure": {
                "stackType": "victoria",
                "stackVersion": "9.1.2308.203"
            }
        })))
        .mount(&server)
        .await;

    let status = client(&server).get_stack_status().await.unwrap();
    assert_eq!(status.stack_type, "victoria");
    assert_eq!(status.version, "9.1.2308.203");
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/indexes/web_logs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"datatype": "event"})))
        .mount(&server)
        .await;

    let err = client(&server).get_index(&name("web_logs")).await.unwrap_err();
    assert!(matches!(err, AcsError::Decode { .. }));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn unreachable_server_is_http_error() {
    let config = AcsConfig {
        deployment_name: Some("acme".to_string()),
        token: Some("test-token".to_string()),
        base_url: Some("http://127.0.0.1:1".to_string()),
        request_timeout_seconds: 1,
        connect_timeout_seconds: 1,
    }
    .resolve_with(|_| None)
    .unwrap();
    assert_eq!(config.request_timeout, Duration::from_secs(1));

    let err = HttpAcsClient::new(&config)
        .unwrap()
        .get_stack_status()
        .await
        .unwrap_err();
    assert!(matches!(err, AcsError::Http { .. }));
}
