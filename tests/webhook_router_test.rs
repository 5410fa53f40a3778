//! Webhook router tests: secret check, path and method filtering, dispatch.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use common::*;
use uslugi_bot::adapters::webhook::{WebhookServer, SECRET_HEADER};
use uslugi_bot::domain::models::ServerConfig;
use uslugi_bot::services::conversation::texts;

const PATH: &str = "/telegram/webhook";
const SECRET: &str = "s3cret-token";

async fn router() -> (Router, Harness) {
    let h = Harness::new(vec![ivanov()]).await;
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        webhook_path: PATH.to_string(),
        secret_token: SECRET.to_string(),
    };
    let router = WebhookServer::new(h.engine.clone(), config).build_router();
    (router, h)
}

fn start_update() -> String {
    json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "date": 1_700_000_000,
            "from": { "id": USER, "is_bot": false, "first_name": "Иван" },
            "chat": { "id": USER, "type": "private" },
            "text": "/start"
        }
    })
    .to_string()
}

fn post(path: &str, secret: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header(SECRET_HEADER, secret);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_valid_update_is_acknowledged_and_handled() {
    let (router, h) = router().await;

    let response = router
        .oneshot(post(PATH, Some(SECRET), start_update()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain"
    );
    assert_eq!(body_text(response).await, "OK");

    // Handling runs on a spawned task.
    let mut sent = Vec::new();
    for _ in 0..50 {
        sent = h.user_texts().await;
        if sent.len() >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(sent, vec![texts::WELCOME, texts::CHOOSE_REGISTRATION]);
}

#[tokio::test]
async fn test_wrong_secret_is_not_found() {
    let (router, h) = router().await;

    let response = router
        .oneshot(post(PATH, Some("guess"), start_update()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(h.messenger.deliveries().await.is_empty());
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_missing_secret_is_not_found() {
    let (router, _h) = router().await;

    let response = router
        .oneshot(post(PATH, None, start_update()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_path_is_not_found() {
    let (router, _h) = router().await;

    let response = router
        .oneshot(post("/other", Some(SECRET), start_update()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_on_webhook_path_is_not_found() {
    let (router, _h) = router().await;

    let request = Request::builder()
        .method("GET")
        .uri(PATH)
        .header(SECRET_HEADER, SECRET)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unparseable_body_is_acknowledged() {
    let (router, h) = router().await;

    let response = router
        .oneshot(post(PATH, Some(SECRET), "{not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
    assert!(h.store.is_empty().await);
}
