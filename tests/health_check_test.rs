mod common;

use common::{spawn_app, spawn_app_with, TRANSACTION_COUNT};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_health_reports_store_sizes() {
    let mut app = spawn_app().await;
    let _mock = app
        .upstream
        .mock("GET", "/")
        .with_status(200)
        .create_async()
        .await;

    let res = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["transactions"], TRANSACTION_COUNT);
    assert_eq!(body["orders"], 3);
    assert_eq!(body["dependencies"]["upstream"]["status"], "healthy");
    assert!(body["uptimeSeconds"].is_u64());
}

#[tokio::test]
async fn test_health_is_ok_when_upstream_down() {
    let app = spawn_app_with(|config| {
        config.upstream_url = "http://127.0.0.1:9".to_string();
    })
    .await;

    let res = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["dependencies"]["upstream"]["status"], "unhealthy");
}
