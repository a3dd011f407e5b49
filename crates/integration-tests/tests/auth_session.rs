//! Integration tests for authentication and how the session token reaches
//! outgoing requests.

use httpmock::prelude::*;
use narxbot_client::KeyValueStorage;
use narxbot_client::storage::TOKEN_KEY;
use narxbot_client::{QueryParams, SearchQuery};
use narxbot_integration_tests::{TestContext, auth_body, search_body};
use secrecy::ExposeSecret;

// =============================================================================
// Token Propagation Tests
// =============================================================================

#[tokio::test]
async fn test_authenticated_search_is_signed() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/auth/telegram")
                .json_body(serde_json::json!({ "init_data": "query_id=AAH&hash=f00" }));
            then.status(200).json_body(auth_body("jwt-1"));
        })
        .await;
    let signed = ctx
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/search")
                .header("authorization", "Bearer jwt-1");
            then.status(200).json_body(search_body(&[], None));
        })
        .await;

    let app = ctx.app();
    app.auth().authenticate("query_id=AAH&hash=f00").await;
    assert!(app.auth().is_authenticated());
    assert_eq!(app.auth().token().expect("token").expose_secret(), "jwt-1");
    assert_eq!(app.auth().user().expect("user").display_name(), "Dilnoza Karimova");

    app.search().search(SearchQuery::new("sut")).await;
    signed.assert_async().await;
    assert_eq!(app.search().state().error, None);
}

#[tokio::test]
async fn test_logout_stops_signing_next_request() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/auth/telegram");
            then.status(200).json_body(auth_body("jwt-2"));
        })
        .await;
    let signed = ctx
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/me")
                .header("authorization", "Bearer jwt-2");
            then.status(200).json_body(serde_json::json!({ "signed": true }));
        })
        .await;

    let app = ctx.app();
    app.auth().authenticate("init").await;
    let first: serde_json::Value = app.api().get("/me", &QueryParams::new()).await.expect("first");
    assert_eq!(first["signed"], true);

    app.auth().logout();
    assert_eq!(ctx.session.get_item(TOKEN_KEY).expect("read"), None);

    // Only the signed mock exists, so an unsigned request falls through to 404
    let second = app
        .api()
        .get::<serde_json::Value>("/me", &QueryParams::new())
        .await
        .expect_err("unsigned request");
    assert_eq!(second.status(), Some(404));

    signed.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_token_set_outside_store_is_used() {
    let ctx = TestContext::new().await;
    let signed = ctx
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/me")
                .header("authorization", "Bearer external");
            then.status(200).json_body(serde_json::json!({}));
        })
        .await;

    let app = ctx.app();
    ctx.session.set_item(TOKEN_KEY, "external").expect("write");
    let _: serde_json::Value = app.api().get("/me", &QueryParams::new()).await.expect("request");

    signed.assert_async().await;
    // The store only learns about sessions it created
    assert!(!app.auth().is_authenticated());
}

// =============================================================================
// Failure Tests
// =============================================================================

#[tokio::test]
async fn test_rejected_init_data() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/auth/telegram");
            then.status(401)
                .json_body(serde_json::json!({ "detail": "Invalid init data" }));
        })
        .await;

    let app = ctx.app();
    app.auth().authenticate("tampered").await;

    assert!(!app.auth().is_authenticated());
    assert!(app.auth().user().is_none());
    assert_eq!(ctx.session.get_item(TOKEN_KEY).expect("read"), None);
}

#[tokio::test]
async fn test_auth_server_unreachable() {
    let ctx = TestContext::new().await;
    let mut config = ctx.config();
    config.api_origin = url::Url::parse("http://127.0.0.1:9").expect("url");
    let app = narxbot_client::AppContext::from_config(config);

    app.auth().authenticate("init").await;
    assert!(!app.auth().is_authenticated());
}
