use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn test_app() -> Router {
    let client = PageClient::new(5, "ldoffers-test/0.1", 0, 0).expect("client");
    build_app(AppState::new(client, 2))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, headers, json)
}

/// Serves `html` at `/event` on a fresh mock server and returns the
/// encoded `/api/scrape` URI pointing at it.
async fn upstream_page(server: &MockServer, status: u16, html: String) -> String {
    Mock::given(method("GET"))
        .and(path("/event"))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "text/html")
                .set_body_string(html),
        )
        .mount(server)
        .await;
    format!("/api/scrape?url={}/event", server.uri())
}

fn ld_page(blocks: &[&str]) -> String {
    let scripts: String = blocks
        .iter()
        .map(|b| format!(r#"<script type="application/ld+json">{b}</script>"#))
        .collect();
    format!("<html><head>{scripts}</head><body></body></html>")
}

#[test]
fn api_error_omits_absent_details() {
    let body = serde_json::to_value(ErrorBody {
        error: "URL is required".to_string(),
        details: None,
    })
    .expect("serialize");
    assert_eq!(body, json!({"error": "URL is required"}));
}

#[tokio::test]
async fn health_returns_ok() {
    let (status, _, body) = get(test_app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn scrape_without_url_is_bad_request() {
    let (status, _, body) = get(test_app(), "/api/scrape").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "URL is required"}));
}

#[tokio::test]
async fn scrape_with_blank_url_is_bad_request() {
    let (status, _, body) = get(test_app(), "/api/scrape?url=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "URL is required");
}

#[tokio::test]
async fn repeated_url_parameter_is_json_bad_request() {
    let (status, headers, body) = get(
        test_app(),
        "/api/scrape?url=https://a.example/e&url=https://b.example/e",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(body["error"], "Invalid query string");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn scrape_with_relative_url_is_bad_request() {
    let (status, _, body) = get(test_app(), "/api/scrape?url=/events/1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid URL");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn scrape_returns_offers() {
    let server = MockServer::start().await;
    let uri = upstream_page(
        &server,
        200,
        ld_page(&[
            "not json",
            r#"{"@type":"Event","offers":[{"name":"GA","price":50,"availability":"InStock"}]}"#,
        ]),
    )
    .await;

    let (status, _, body) = get(test_app(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "offers": [
                {"name": "GA", "price": 50, "availability": "InStock", "inventoryLevel": "0"}
            ]
        })
    );
}

#[tokio::test]
async fn scrape_page_without_json_ld_is_not_found() {
    let server = MockServer::start().await;
    let uri = upstream_page(&server, 200, "<html><body>nothing</body></html>".to_string()).await;

    let (status, _, body) = get(test_app(), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "No JSON-LD data found"}));
}

#[tokio::test]
async fn scrape_page_without_event_offers_is_not_found() {
    let server = MockServer::start().await;
    let uri = upstream_page(&server, 200, ld_page(&[r#"{"@type":"Product"}"#])).await;

    let (status, _, body) = get(test_app(), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "No offers found in JSON-LD data"}));
}

#[tokio::test]
async fn upstream_failure_is_internal_error_with_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/event"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    let uri = format!("/api/scrape?url={}/event", server.uri());

    let (status, _, body) = get(test_app(), &uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to scrape the website");
    assert!(
        body["details"]
            .as_str()
            .is_some_and(|d| d.contains("rate limited")),
        "unexpected details: {body}"
    );
}

#[tokio::test]
async fn request_id_is_echoed_when_provided() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header(REQUEST_ID_HEADER, "req-abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(
        response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );
}

#[tokio::test]
async fn request_id_is_generated_when_missing() {
    let (_, headers, _) = get(test_app(), "/api/scrape").await;
    let id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id header");
    assert!(uuid::Uuid::parse_str(id).is_ok(), "not a uuid: {id}");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header(header::ORIGIN, "https://dashboard.example.com")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
