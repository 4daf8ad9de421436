//! Integration tests for the page, the grid fragment and the health checks.

use reqwest::StatusCode;
use serde_json::json;

use routine_advisor_integration_tests::{
    StubReply, TestContext, card_is_selected, card_is_shown,
};

async fn context() -> TestContext {
    TestContext::new(StubReply::Json(json!({ "reply": "unused" }))).await
}

#[tokio::test]
async fn test_index_without_category_shows_notice() {
    let ctx = context().await;

    let response = ctx.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.expect("page body");

    assert!(html.contains("No products found."));
    assert!(html.contains(r#"id="category-filter""#));
    assert!(html.contains(r#"value="cleanser""#));
    assert!(html.contains(r#"value="serum""#));
    assert!(html.contains(r#"value="moisturizer""#));
    assert!(html.contains(r#"id="chat-window""#));
}

#[tokio::test]
async fn test_transcript_appends_scroll_to_newest_bubble() {
    let ctx = context().await;

    let html = ctx.get("/").await.text().await.expect("page body");

    assert!(html.contains(
        r##"hx-post="/advisor/routine" hx-target="#chat-window" hx-swap="beforeend scroll:bottom""##
    ));
    assert!(html.contains(
        r##"hx-post="/advisor/chat" hx-target="#chat-window" hx-swap="beforeend scroll:bottom""##
    ));
}

#[tokio::test]
async fn test_index_with_category_renders_grid() {
    let ctx = context().await;

    let html = ctx
        .get("/?category=cleanser")
        .await
        .text()
        .await
        .expect("page body");

    assert!(card_is_shown(&html, 1));
    assert!(card_is_shown(&html, 4));
    assert!(!card_is_shown(&html, 2));
    assert!(!html.contains("No products found."));
}

#[tokio::test]
async fn test_grid_fragment_filters_by_exact_category() {
    let ctx = context().await;

    let html = ctx
        .get("/catalog?category=serum")
        .await
        .text()
        .await
        .expect("grid body");
    assert!(card_is_shown(&html, 2));
    assert!(!card_is_shown(&html, 1));

    let html = ctx
        .get("/catalog?category=Serum")
        .await
        .text()
        .await
        .expect("grid body");
    assert!(html.contains("No products found."));
}

#[tokio::test]
async fn test_index_reflects_stored_selection() {
    let ctx = context().await;
    ctx.toggle(2, "serum").await;

    let html = ctx
        .get("/?category=serum")
        .await
        .text()
        .await
        .expect("page body");

    assert!(card_is_selected(&html, 2));
    assert!(html.contains(r#"hx-post="/selection/2/remove""#));
}

#[tokio::test]
async fn test_health_checks() {
    let ctx = context().await;

    let response = ctx.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("body"), "ok");

    let response = ctx.get("/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_header() {
    let ctx = context().await;

    let response = ctx.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));

    let response = ctx
        .client
        .get(ctx.url("/health"))
        .header("x-request-id", "edge-42")
        .send()
        .await
        .expect("GET /health");
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("edge-42")
    );
}
