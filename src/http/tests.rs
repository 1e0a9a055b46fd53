//! Tests for the HTTP transport

use super::*;
use crate::error::Error;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> Transport {
    let config = TransportConfig::builder("test-key")
        .base_url(server.uri())
        .build();
    Transport::new(config).unwrap()
}

#[test]
fn test_config_defaults() {
    let config = TransportConfig::new("key");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.user_agent.starts_with("creeble-rs/"));
    assert!(config.default_headers.is_empty());
}

#[test]
fn test_config_builder() {
    let config = TransportConfig::builder("key")
        .base_url("https://staging.creeble.io")
        .timeout(Duration::from_secs(10))
        .user_agent("custom/1.0")
        .header("X-Trace", "on")
        .build();

    assert_eq!(config.base_url, "https://staging.creeble.io");
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.user_agent, "custom/1.0");
    assert_eq!(config.default_headers.get("X-Trace"), Some(&"on".to_string()));
}

#[test]
fn test_empty_api_key_rejected() {
    let result = Transport::new(TransportConfig::new("  "));
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[tokio::test]
async fn test_get_sends_api_key_and_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts"))
        .and(header("X-API-Key", "test-key"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let params = vec![
        ("page".to_string(), "1".to_string()),
        ("limit".to_string(), "25".to_string()),
    ];
    let value = transport.get("/v1/posts", &params).await.unwrap();
    assert_eq!(value["data"], json!([]));
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/site/forms/contact"))
        .and(wiremock::matchers::body_json(json!({ "email": "a@b.co" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "ok": true } })))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let value = transport
        .post("/v1/site/forms/contact", &json!({ "email": "a@b.co" }))
        .await
        .unwrap();
    assert_eq!(value["data"]["ok"], json!(true));
}

#[tokio::test]
async fn test_unauthorized_classification() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "invalid api key" })),
        )
        .mount(&server)
        .await;

    let err = transport_for(&server).get("/v1/x", &[]).await.unwrap_err();
    match err {
        Error::Unauthorized { message } => assert_eq!(message, "invalid api key"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_classification_carries_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "validation failed",
            "errors": { "email": ["The email must be a valid email address."] }
        })))
        .mount(&server)
        .await;

    let err = transport_for(&server).get("/v1/x", &[]).await.unwrap_err();
    match err {
        Error::Validation { errors, .. } => {
            assert_eq!(
                errors.get("email"),
                Some(&vec!["The email must be a valid email address.".to_string()])
            );
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited_classification_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "17")
                .set_body_json(json!({ "message": "too many requests" })),
        )
        .mount(&server)
        .await;

    let err = transport_for(&server).get("/v1/x", &[]).await.unwrap_err();
    match err {
        Error::RateLimited {
            retry_after_seconds,
            ..
        } => assert_eq!(retry_after_seconds, 17),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_classification() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = transport_for(&server).get("/v1/x", &[]).await.unwrap_err();
    match err {
        Error::Server { status, .. } => assert_eq!(status, 503),
        other => panic!("expected Server, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_is_generic_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "not found" })))
        .mount(&server)
        .await;

    let err = transport_for(&server).get("/v1/x/missing", &[]).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_non_json_body_returned_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("pong"),
        )
        .mount(&server)
        .await;

    let value = transport_for(&server).get("/ping", &[]).await.unwrap();
    assert_eq!(value, serde_json::Value::String("pong".to_string()));
}

#[tokio::test]
async fn test_malformed_json_is_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;

    let err = transport_for(&server).get("/v1/x", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn test_request_interceptors_apply_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("X-Stage", "second"))
        .and(query_param("injected", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut transport = transport_for(&server);
    transport.add_request_interceptor(Arc::new(|mut parts: RequestParts| {
        parts.headers.insert("X-Stage".into(), "first".into());
        parts.params.push(("injected".into(), "yes".into()));
        parts
    }));
    // Later interceptors see (and may override) earlier output
    transport.add_request_interceptor(Arc::new(|mut parts: RequestParts| {
        parts.headers.insert("X-Stage".into(), "second".into());
        parts
    }));

    transport.get("/v1/x", &[]).await.unwrap();
}

#[tokio::test]
async fn test_response_interceptor_transforms_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [1, 2] })))
        .mount(&server)
        .await;

    let mut transport = transport_for(&server);
    transport.add_response_interceptor(Arc::new(|mut value: serde_json::Value| {
        value["tapped"] = json!(true);
        value
    }));

    let value = transport.get("/v1/x", &[]).await.unwrap();
    assert_eq!(value["tapped"], json!(true));
    assert_eq!(value["data"], json!([1, 2]));
}

#[tokio::test]
async fn test_connection_refused_is_connect_error() {
    // Bind and immediately drop a listener to obtain a port with nothing
    // listening; a dropped wiremock server is pooled and keeps its socket open
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = TransportConfig::builder("test-key").base_url(uri).build();
    let transport = Transport::new(config).unwrap();

    let err = transport.get("/v1/x", &[]).await.unwrap_err();
    assert!(err.is_connect_error(), "expected connect error, got {err:?}");
    assert!(crate::retry::RetryPolicy::default().is_retryable(&err));
}

#[tokio::test]
async fn test_redirect_loop_is_not_a_connect_error() {
    // A request-phase failure that is not connectivity must not become
    // retry-eligible through the connectivity check
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/v1/x", server.uri())),
        )
        .mount(&server)
        .await;

    let err = transport_for(&server).get("/v1/x", &[]).await.unwrap_err();
    assert!(!err.is_connect_error(), "redirect loop misread as connectivity: {err:?}");
    assert!(!err.is_timeout());
    assert!(!crate::retry::RetryPolicy::default().is_retryable(&err));
}

#[tokio::test]
async fn test_timeout_classified_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = TransportConfig::builder("test-key")
        .base_url(server.uri())
        .timeout(Duration::from_millis(50))
        .build();
    let transport = Transport::new(config).unwrap();

    let err = transport.get("/v1/x", &[]).await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}
