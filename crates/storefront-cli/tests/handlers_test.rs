//! Handler tests for sfctl against a mock storefront API

use serde_json::json;
use storefront_cli::cli::handlers::{request, session};
use storefront_cli::CliError;
use storefront_client::{ClientBuilder, RetryPolicy, SessionStore, StorefrontClient};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, dir: &tempfile::TempDir) -> StorefrontClient {
    ClientBuilder::default()
        .base_url(server.uri())
        .with_file_store(dir.path().join("session.json"))
        .retry_policy(RetryPolicy::disabled())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_login_then_request_uses_stored_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/items"))
        .and(query_param("shop", "7"))
        .and(header("authorization", "Bearer access-1"))
        .and(header("accept-language", "en"))
        .and(body_json(json!({ "sku": "TEA-01" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, &dir);

    session::handle_login(&client, "access-1".into(), "refresh-1".into())
        .await
        .unwrap();
    session::handle_locale(&client, "en").await.unwrap();

    request::handle_request(
        &client,
        "post",
        "/cart/items",
        Some(r#"{"sku":"TEA-01"}"#.to_string()),
        vec!["shop=7".to_string()],
        false,
    )
    .await
    .unwrap();

    let stored = client.session_store().load().await.unwrap();
    assert_eq!(stored.locale.as_deref(), Some("en"));
}

#[tokio::test]
async fn test_failed_request_surfaces_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, &dir);

    let err = request::handle_request(&client, "GET", "/products/9", None, vec![], true)
        .await
        .unwrap_err();

    let report = err.to_string();
    match err {
        CliError::Api(api) => {
            assert_eq!(api.code, "error.404");
            assert!(report.contains("Code: error.404"));
            assert!(report.contains(&api.request_id));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_logout_clears_tokens_but_keeps_locale() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, &dir);

    session::handle_login(&client, "a".into(), "r".into())
        .await
        .unwrap();
    session::handle_locale(&client, "vi").await.unwrap();
    session::handle_logout(&client).await.unwrap();

    let stored = client.session_store().load().await.unwrap();
    assert!(!stored.is_authenticated());
    assert_eq!(stored.locale.as_deref(), Some("vi"));
}

#[tokio::test]
async fn test_login_rejects_blank_tokens() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, &dir);

    let err = session::handle_login(&client, " ".into(), "r".into())
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::InvalidArgument(_)));
}
