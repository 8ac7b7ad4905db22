//! HTTP surface tests against the axum router, no network involved.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use push_fanout_service::server::{create_app, AppState};

use common::{endpoint, test_state, RecordingSender};

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

async fn post_raw(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn browser_subscription(i: usize) -> Value {
    json!({
        "endpoint": endpoint(i),
        "expirationTime": null,
        "keys": { "p256dh": format!("p256dh-{}", i), "auth": format!("auth-{}", i) }
    })
}

#[tokio::test]
async fn test_subscribe_returns_created() {
    let app = create_app(test_state(RecordingSender::new()));

    let (status, body) = post_json(&app, "/subscribe", browser_subscription(1)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Subscribed successfully" }));
}

#[tokio::test]
async fn test_subscribe_without_endpoint_is_bad_request() {
    let state = test_state(RecordingSender::new());
    let app = create_app(state.clone());

    let no_endpoint = json!({ "keys": { "p256dh": "a", "auth": "b" } });
    let (status, body) = post_json(&app, "/subscribe", no_endpoint).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid subscription object" }));

    let (status, _) = post_json(&app, "/subscribe", json!({ "endpoint": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_raw(&app, "/subscribe", "not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid subscription object");

    assert!(state.service.registry().is_empty());
}

#[tokio::test]
async fn test_unsubscribe_always_succeeds() {
    let state = test_state(RecordingSender::new());
    let app = create_app(state.clone());
    post_json(&app, "/subscribe", browser_subscription(1)).await;

    let request = json!({ "endpoint": endpoint(1) });
    let (status, body) = post_json(&app, "/unsubscribe", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Unsubscribed successfully" }));
    assert!(state.service.registry().is_empty());

    let (status, _) = post_json(&app, "/unsubscribe", json!({ "endpoint": endpoint(1) })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(&app, "/unsubscribe", json!({})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_trigger_without_subscriptions() {
    let sender = RecordingSender::new();
    let app = create_app(test_state(sender.clone()));

    let request = json!({ "title": "Hi", "message": "There" });
    let (status, body) = post_json(&app, "/trigger-notification", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "No subscriptions to notify" })
    );
    assert_eq!(sender.calls(), 0);
}

#[tokio::test]
async fn test_trigger_with_malformed_body_is_json_bad_request() {
    let sender = RecordingSender::new();
    let app = create_app(test_state(sender.clone()));
    post_json(&app, "/subscribe", browser_subscription(0)).await;

    let (status, body) = post_raw(&app, "/trigger-notification", "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert_eq!(sender.calls(), 0);
}

#[tokio::test]
async fn test_prune_keeps_fresh_resubscription() {
    let sender = RecordingSender::new();
    let state = test_state(sender.clone());
    let app = create_app(state.clone());
    post_json(&app, "/subscribe", browser_subscription(0)).await;
    let stale = state.service.registry().get(&endpoint(0)).unwrap();

    // Browser re-subscribes with new keys before the stale delivery is pruned
    let mut fresh = browser_subscription(0);
    fresh["keys"]["p256dh"] = json!("fresh-key");
    post_json(&app, "/subscribe", fresh).await;

    assert!(!state.service.registry().remove_if_present(&stale));
    let current = state.service.registry().get(&endpoint(0)).unwrap();
    assert_eq!(current.keys.p256dh, "fresh-key");
}

#[tokio::test]
async fn test_trigger_reports_per_subscriber_results_and_prunes() {
    let sender = RecordingSender::new();
    let state = test_state(sender.clone());
    let app = create_app(state.clone());
    for i in 0..3 {
        post_json(&app, "/subscribe", browser_subscription(i)).await;
    }
    sender.respond(&endpoint(1), 410);

    let request = json!({ "title": "Hi", "message": "There" });
    let (status, body) = post_json(&app, "/trigger-notification", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["status"], "fulfilled");
    assert_eq!(results[0]["value"]["status_code"], 201);
    assert_eq!(results[1]["status"], "rejected");
    assert_eq!(results[1]["outcome"], "terminal_failure");
    assert_eq!(results[1]["reason"]["status_code"], 410);
    assert_eq!(results[2]["endpoint"], endpoint(2));

    assert_eq!(state.service.registry().len(), 2);
}

#[tokio::test]
async fn test_trigger_repeat_is_skipped() {
    let sender = RecordingSender::new();
    let app = create_app(test_state(sender.clone()));
    post_json(&app, "/subscribe", browser_subscription(0)).await;

    let request = json!({ "title": "Hi", "message": "There" });
    post_json(&app, "/trigger-notification", request.clone()).await;
    let (status, body) = post_json(&app, "/trigger-notification", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Notification skipped (cooldown period)",
            "skipped": true
        })
    );
    assert_eq!(sender.calls(), 1);
}

#[tokio::test]
async fn test_health_and_stats() {
    let app = create_app(test_state(RecordingSender::new()));
    post_json(&app, "/subscribe", browser_subscription(0)).await;

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get_json(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscriptions"]["total_subscriptions"], 1);
    assert_eq!(body["cooldown"]["window_seconds"], 5);
}

#[tokio::test]
async fn test_vapid_public_key() {
    let mut settings = common::settings_with_cooldown(5);
    settings.vapid.public_key = "BPublicKey".to_string();
    let state = AppState::with_sender(settings, RecordingSender::new());
    let app = create_app(state);

    let (status, body) = get_json(&app, "/vapid-public-key").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "publicKey": "BPublicKey" }));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = create_app(test_state(RecordingSender::new()));
    post_json(&app, "/subscribe", browser_subscription(0)).await;

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("push_subscriptions_active"));
}
