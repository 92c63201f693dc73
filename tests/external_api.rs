//! End-to-end tests for endpoints that delegate to third-party services,
//! using a local mock upstream.

use reqwest::StatusCode;
use serde_json::Value;
use toolbox_api::AppConfig;

mod common;

const LIGHTHOUSE_BODY: &str = r#"{
    "lighthouseResult": {
        "categories": { "performance": { "score": 0.93 } },
        "audits": {
            "first-contentful-paint": { "displayValue": "1.2 s" },
            "largest-contentful-paint": { "displayValue": "2.0 s" },
            "total-blocking-time": { "displayValue": "30 ms" }
        }
    }
}"#;

fn fast_retry(config: &mut AppConfig) {
    config.services.retry_max_attempts = 2;
    config.services.retry_base_delay_ms = 10;
    config.services.retry_max_delay_ms = 20;
}

#[tokio::test]
async fn test_pagespeed_returns_distilled_summary() {
    let upstream = common::start_mock_backend(200, LIGHTHOUSE_BODY).await;
    let mut config = AppConfig::default();
    config.services.pagespeed.base_url = format!("http://{upstream}");
    let addr = common::spawn_app(config).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/external/pagespeed"))
        .json(&serde_json::json!({ "url": "https://example.com", "strategy": "desktop" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["performance_score"], 93.0);
    assert_eq!(body["strategy"], "desktop");
    assert_eq!(body["first_contentful_paint"], "1.2 s");
}

#[tokio::test]
async fn test_pagespeed_rejects_non_http_url() {
    let addr = common::spawn_app(AppConfig::default()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/external/pagespeed"))
        .json(&serde_json::json!({ "url": "ftp://example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pagespeed_upstream_failure_maps_to_bad_gateway() {
    let upstream = common::start_mock_backend(500, r#"{"error":"boom"}"#).await;
    let mut config = AppConfig::default();
    config.services.pagespeed.base_url = format!("http://{upstream}");
    fast_retry(&mut config);
    let addr = common::spawn_app(config).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/external/pagespeed"))
        .json(&serde_json::json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_image_optimize_returns_delivery_url() {
    let upstream =
        common::start_mock_backend(200, r#"{"url":"https://cdn.example/abc.webp","bytes":8192}"#)
            .await;
    let mut config = AppConfig::default();
    config.services.media.base_url = format!("http://{upstream}");
    let addr = common::spawn_app(config).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/external/image-optimize"))
        .json(&serde_json::json!({
            "url": "https://example.com/photo.jpg",
            "width": 800,
            "quality": 80,
            "format": "webp"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["url"], "https://cdn.example/abc.webp");
    assert_eq!(body["bytes"], 8192);
}

#[tokio::test]
async fn test_image_optimize_validates_dimensions() {
    let addr = common::spawn_app(AppConfig::default()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/external/image-optimize"))
        .json(&serde_json::json!({ "url": "https://example.com/photo.jpg", "width": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
