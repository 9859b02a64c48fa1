//! Integration tests for `SearchClient::search`.
//!
//! Uses `wiremock` to stand up a local chat-completion endpoint per test so no
//! real network traffic is made. Covers the request shape, response
//! validation and every error variant the client can return.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wardrobe_core::{SearchOptions, StoreCatalog};
use wardrobe_shopping::{plan_requests, SearchClient, ShoppingError};

fn test_client(base_url: &str) -> SearchClient {
    SearchClient::new(base_url, "test-key", "sonar", 5, "wardrobe-test/0.1", 0, 0)
        .expect("failed to build test SearchClient")
}

fn store_options() -> SearchOptions {
    let mut options = SearchOptions::new("black midi dress");
    options.prefer_stores = vec!["Target".to_owned()];
    options
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_parses_citations_and_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Try https://www.asos.com/us/prd/1"}}],
            "citations": [
                "https://www.amazon.com/dp/B000123",
                {"url": "https://www.target.com/p/x/A-1", "title": "Wrap Dress"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let requests = plan_requests(&SearchOptions::new("black midi dress"), StoreCatalog::builtin());
    let response = client.search(&requests[0]).await.expect("search should succeed");

    assert_eq!(response.citations.len(), 2);
    assert!(response.content().contains("asos.com"));
    assert_eq!(response.citation_entries()[1].title.as_deref(), Some("Wrap Dress"));
}

#[tokio::test]
async fn store_branch_sends_domain_filter() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "sonar",
            "return_citations": true,
            "search_domain_filter": ["target.com"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "none found"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let requests = plan_requests(&store_options(), StoreCatalog::builtin());
    assert_eq!(requests.len(), 2);

    let result = client.search(&requests[1]).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn search_accepts_missing_optional_sections() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": null}}]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let requests = plan_requests(&SearchOptions::new("jeans"), StoreCatalog::builtin());
    let response = client.search(&requests[0]).await.expect("search should succeed");
    assert!(response.is_empty());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_returns_rate_limited_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let requests = plan_requests(&SearchOptions::new("jeans"), StoreCatalog::builtin());
    let err = client.search(&requests[0]).await.unwrap_err();

    assert!(
        matches!(err, ShoppingError::RateLimited { retry_after_secs: 7 }),
        "expected RateLimited(7), got: {err:?}"
    );
}

#[tokio::test]
async fn search_retries_rate_limit_when_enabled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "citations": ["https://www.amazon.com/dp/B1"]
        })))
        .mount(&server)
        .await;

    let client = SearchClient::new(&server.uri(), "test-key", "sonar", 5, "wardrobe-test/0.1", 2, 0)
        .expect("failed to build test SearchClient");
    let requests = plan_requests(&SearchOptions::new("jeans"), StoreCatalog::builtin());
    let response = client.search(&requests[0]).await.expect("retry should succeed");
    assert_eq!(response.citations.len(), 1);
}

#[tokio::test]
async fn search_returns_unexpected_status_on_500() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let requests = plan_requests(&SearchOptions::new("jeans"), StoreCatalog::builtin());
    let err = client.search(&requests[0]).await.unwrap_err();

    assert!(
        matches!(err, ShoppingError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

#[tokio::test]
async fn search_returns_deserialize_error_on_bad_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let requests = plan_requests(&SearchOptions::new("jeans"), StoreCatalog::builtin());
    let err = client.search(&requests[0]).await.unwrap_err();

    assert!(
        matches!(err, ShoppingError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
}

#[tokio::test]
async fn search_returns_empty_response_for_bare_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let requests = plan_requests(&SearchOptions::new("jeans"), StoreCatalog::builtin());
    let err = client.search(&requests[0]).await.unwrap_err();

    assert!(
        matches!(err, ShoppingError::EmptyResponse),
        "expected EmptyResponse, got: {err:?}"
    );
}
