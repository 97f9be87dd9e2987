//! Integration tests for API endpoints
//!
//! Requests go through the full router; only paths that need no upstream
//! source are exercised here.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chipdash::config::Config;
use chipdash::services::{ChartKind, StockDirectory, StockEntry};
use chipdash::{app, AppState};
use serde_json::Value;
use tower::ServiceExt;

fn state(static_dir: &std::path::Path) -> AppState {
    let config = Config {
        static_dir: static_dir.to_path_buf(),
        ..Config::default()
    };
    let directory = StockDirectory::from_entries(vec![StockEntry {
        code: "2330".into(),
        name: "台積電".into(),
    }]);
    AppState::with_directory(config, directory).unwrap()
}

async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
    let response = app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(state(dir.path()), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["stocks"], 1);
}

#[tokio::test]
async fn test_unknown_stock_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(state(dir.path()), "/api/stocks/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert!(body["error"].as_str().unwrap().contains("9999"));
}

#[tokio::test]
async fn test_cached_charts_by_partial_name() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path());
    for kind in ChartKind::ALL {
        let path = state.analyzer.chart_path(kind, "2330");
        std::fs::write(path, b"{\"title\":\"cached\"}").unwrap();
    }

    // 台積
    let (status, body) = get(state.clone(), "/api/stocks/%E5%8F%B0%E7%A9%8D").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "2330");
    assert_eq!(body["data"]["display"], "台積電 (2330)");
    assert_eq!(
        body["data"]["charts"][0]["url"],
        "/static/stock_analysis_2330.json"
    );
    assert!(body["meta"].get("message").is_none());

    let (status, chart) = get(state, "/static/revenue_2330.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["title"], "cached");
}
