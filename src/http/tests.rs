//! Tests for the HTTP client module

use super::*;
use crate::error::{ApiErrorKind, Error};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("feedly-pager/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://cloud.feedly.com")
        .timeout(Duration::from_secs(5))
        .rate_limit(RateLimiterConfig::new(2, 2))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url.as_deref(), Some("https://cloud.feedly.com"));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 2)));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("streamId", "feed/1")
        .query_opt("continuation", None::<String>)
        .query_opt("count", Some("20"))
        .header("X-Request-Id", "abc123")
        .bearer("token")
        .json(serde_json::json!({"key": "value"}));

    assert_eq!(
        config.query,
        vec![
            ("streamId".to_string(), "feed/1".to_string()),
            ("count".to_string(), "20".to_string()),
        ]
    );
    assert_eq!(config.bearer.as_deref(), Some("token"));
    assert!(config.body.is_some());
}

#[test]
fn test_build_url() {
    let config = HttpClientConfig::builder()
        .base_url("https://cloud.feedly.com/")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(
        client.build_url("/v3/streams/contents").unwrap().as_str(),
        "https://cloud.feedly.com/v3/streams/contents"
    );
    assert_eq!(
        client.build_url("https://other.example.com/x").unwrap().as_str(),
        "https://other.example.com/x"
    );
}

#[test]
fn test_build_url_without_base_is_invalid() {
    let client = HttpClient::new().unwrap();
    let err = client.build_url("/relative").unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[tokio::test]
async fn test_get_json_with_query_and_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/streams/contents"))
        .and(query_param("streamId", "feed/1"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": 42
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let data: serde_json::Value = client
        .get_json(
            "/v3/streams/contents",
            RequestConfig::new().query("streamId", "feed/1").bearer("tok"),
        )
        .await
        .unwrap();

    assert_eq!(data["value"], 42);
}

#[tokio::test]
async fn test_post_json_sends_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(serde_json::json!({"limit": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let rows: Vec<serde_json::Value> = client
        .post_json("/query", RequestConfig::new().json(serde_json::json!({"limit": 5})))
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("X-Client", "pager"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-Client", "pager")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let _: serde_json::Value = client.get_json("/ping", RequestConfig::new()).await.unwrap();
}

#[tokio::test]
async fn test_status_is_classified_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_json::<serde_json::Value>("/flaky", RequestConfig::new())
        .await
        .unwrap_err();

    assert_eq!(err.api_kind(), Some(ApiErrorKind::Server));
}

#[tokio::test]
async fn test_unauthorized_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_json::<serde_json::Value>("/private", RequestConfig::new())
        .await
        .unwrap_err();

    assert_eq!(err.api_kind(), Some(ApiErrorKind::Unauthorized));
    assert_eq!(err.to_string(), "UnauthorizedError");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_json::<serde_json::Value>("/broken", RequestConfig::new())
        .await
        .unwrap_err();

    assert_eq!(err.api_kind(), Some(ApiErrorKind::Decode));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Bind and immediately drop a listener to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = HttpClientConfig::builder()
        .base_url(format!("http://127.0.0.1:{port}"))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client
        .get_json::<serde_json::Value>("/anything", RequestConfig::new())
        .await
        .unwrap_err();

    assert_eq!(err.api_kind(), Some(ApiErrorKind::Network));
}
