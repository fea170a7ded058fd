//! Integration tests using mock HTTP servers
//!
//! Tests the full flow: config → wired models → HTTP requests → model state

use feedly_pager::cli::{feed_view_model, shop_model};
use feedly_pager::config::AppConfig;
use feedly_pager::present::render_feed;
use feedly_pager::{Error, Shop};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM_ID: &str = "feed/https://blog.rust-lang.org/feed.xml";

fn feed_config(server: &MockServer) -> AppConfig {
    let yaml = format!(
        r"
feedly:
  base_url: {uri}
  stream_id: {STREAM_ID}
  count: 2
  auth:
    type: refresh
    client_id: feedly
    client_secret: secret
    refresh_token: rt-1
",
        uri = server.uri()
    );
    let config = AppConfig::from_yaml_str(&yaml).unwrap();
    config.validate().unwrap();
    config
}

fn shop_config(server: &MockServer) -> AppConfig {
    let yaml = format!(
        r"
firestore:
  base_url: {uri}
  project_id: demo
  page_size: 2
  auth:
    type: static
    access_token: fs-token
",
        uri = server.uri()
    );
    AppConfig::from_yaml_str(&yaml).unwrap()
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v3/auth/token"))
        .and(body_string_contains("refresh_token=rt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn ids(items: &[feedly_pager::FeedItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

// ============================================================================
// Feed Workflow
// ============================================================================

#[tokio::test]
async fn test_feed_pages_until_end_then_fails() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/v3/streams/contents"))
        .and(query_param("continuation", "tok1"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "C", "title": "Gamma"}]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // First page succeeds once, after that the stream is unavailable
    Mock::given(method("GET"))
        .and(path("/v3/streams/contents"))
        .and(query_param("streamId", STREAM_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": STREAM_ID,
            "continuation": "tok1",
            "items": [
                {"id": "A", "title": "Alpha"},
                {"id": "B", "title": "Beta"}
            ]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/streams/contents"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let view_model = feed_view_model(&feed_config(&server)).unwrap();

    view_model.get_feeds().await;
    let snapshot = view_model.snapshot();
    assert_eq!(ids(&snapshot.feed_items), vec!["A", "B"]);
    assert_eq!(snapshot.continuation.as_deref(), Some("tok1"));
    assert!(!snapshot.error);

    view_model.get_feeds().await;
    let snapshot = view_model.snapshot();
    assert_eq!(ids(&snapshot.feed_items), vec!["A", "B", "C"]);
    assert!(snapshot.continuation.is_none());

    view_model.get_feeds().await;
    let snapshot = view_model.snapshot();
    assert_eq!(ids(&snapshot.feed_items), vec!["A", "B", "C"]);
    assert!(snapshot.error);
    assert_eq!(snapshot.error_text, "ServerError");
    assert!(!snapshot.loading);

    assert_eq!(
        render_feed(&snapshot.feed_items),
        vec!["   1  Alpha", "   2  Beta", "   3  Gamma"]
    );
}

#[tokio::test]
async fn test_feed_reset_replaces_list_on_next_fetch() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/v3/streams/contents"))
        .and(query_param("continuation", "tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continuation": "tok2",
            "items": [{"id": "C"}]
        })))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/streams/contents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continuation": "tok1",
            "items": [{"id": "A"}, {"id": "B"}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let view_model = feed_view_model(&feed_config(&server)).unwrap();

    view_model.get_feeds().await;
    view_model.reset_continuation();
    view_model.get_feeds().await;

    let snapshot = view_model.snapshot();
    assert_eq!(ids(&snapshot.feed_items), vec!["A", "B"]);
    assert_eq!(snapshot.continuation.as_deref(), Some("tok1"));
}

#[tokio::test]
async fn test_feed_auth_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/auth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/streams/contents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(0)
        .mount(&server)
        .await;

    let view_model = feed_view_model(&feed_config(&server)).unwrap();
    view_model.get_feeds().await;

    let snapshot = view_model.snapshot();
    assert!(snapshot.error);
    assert!(snapshot.error_text.starts_with("Token refresh failed"));
    assert!(snapshot.feed_items.is_empty());
}

// ============================================================================
// Shop Workflow
// ============================================================================

fn firestore_doc(id: &str, name: &str, price: i64) -> serde_json::Value {
    json!({
        "document": {
            "name": format!("projects/demo/databases/(default)/documents/shops/{id}"),
            "fields": {
                "name": {"stringValue": name},
                "price": {"integerValue": price.to_string()}
            }
        },
        "readTime": "2021-08-30T00:00:00Z"
    })
}

#[tokio::test]
async fn test_shops_page_through_collection() {
    let server = MockServer::start().await;
    let run_query = "/v1/projects/demo/databases/(default)/documents:runQuery";

    Mock::given(method("POST"))
        .and(path(run_query))
        .and(body_string_contains("documents/shops/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            firestore_doc("c", "Cafe", 450)
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(run_query))
        .and(body_string_contains("documents/shops/c"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"readTime": "2021-08-30T00:00:00Z"}])),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(run_query))
        .and(header("Authorization", "Bearer fs-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            firestore_doc("a", "Alpha", 120),
            firestore_doc("b", "Bakery", 300)
        ])))
        .mount(&server)
        .await;

    let model = shop_model(&shop_config(&server)).unwrap();

    // Aggregation is the caller's job
    let mut all: Vec<Shop> = Vec::new();

    let page = model.get_shops().await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(model.last_document().unwrap().id(), "b");
    all.extend(page);

    let page = model.get_shops().await.unwrap();
    assert_eq!(page, vec![Shop::new("Cafe", 450, "c")]);
    all.extend(page);

    let page = model.get_shops().await.unwrap();
    assert!(page.is_empty());
    assert!(model.last_document().is_none());

    assert_eq!(
        all.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        vec!["Alpha", "Bakery", "Cafe"]
    );
}

#[tokio::test]
async fn test_shop_failure_keeps_marker() {
    let server = MockServer::start().await;
    let run_query = "/v1/projects/demo/databases/(default)/documents:runQuery";

    Mock::given(method("POST"))
        .and(path(run_query))
        .and(body_string_contains("startAt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(run_query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            firestore_doc("a", "Alpha", 120)
        ])))
        .mount(&server)
        .await;

    let model = shop_model(&shop_config(&server)).unwrap();

    model.get_shops().await.unwrap();
    let err = model.get_shops().await.unwrap_err();

    assert!(matches!(err, Error::Store(_)));
    assert_eq!(model.last_document().unwrap().id(), "a");
}

#[test]
fn test_wiring_requires_sections() {
    let config = AppConfig::from_yaml_str("firestore:\n  project_id: p\n").unwrap();
    assert!(matches!(
        feed_view_model(&config),
        Err(Error::MissingConfigField { .. })
    ));
}
