mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::{series_from_closes, wavy_closes, StaticProvider};
use ticker_dash::config::DashboardConfig;
use ticker_dash::server::{router, AppState};
use tower::ServiceExt;

fn app(provider: StaticProvider) -> axum::Router {
    router(AppState {
        provider: Arc::new(provider),
        settings: Arc::new(DashboardConfig::default()),
    })
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get(app(StaticProvider::failing()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn empty_ticker_json_is_awaiting_without_fetch() {
    let provider = StaticProvider::returning(series_from_closes(&wavy_closes(120)));
    let (status, body) = get(app(provider.clone()), "/api/dashboard?ticker=").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["state"], "awaiting_ticker");
    assert_eq!(json["message"], "Please enter a stock ticker to begin.");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn missing_ticker_uses_default_symbol() {
    let provider = StaticProvider::returning(series_from_closes(&wavy_closes(120)));
    let (status, body) = get(app(provider.clone()), "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["state"], "rendered");
    assert_eq!(json["ticker"], "AAPL");
    assert_eq!(json["price_chart"]["candles"].as_array().unwrap().len(), 30);
    assert_eq!(provider.requests()[0].0, "AAPL");
}

#[tokio::test]
async fn explicit_dates_reach_the_provider() {
    let provider = StaticProvider::returning(series_from_closes(&wavy_closes(40)));
    let (status, _) = get(
        app(provider.clone()),
        "/api/dashboard?ticker=msft&start=2024-02-01&end=2024-03-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (ticker, start, end) = provider.requests()[0].clone();
    assert_eq!(ticker, "MSFT");
    assert_eq!(start.to_string(), "2024-02-01");
    assert_eq!(end.to_string(), "2024-03-01");
}

#[tokio::test]
async fn malformed_date_is_bad_request() {
    let provider = StaticProvider::returning(series_from_closes(&wavy_closes(40)));
    let (status, body) = get(app(provider.clone()), "/?ticker=AAPL&start=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("start"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn page_shows_no_data_warning() {
    let provider = StaticProvider::returning(ticker_dash::model::PriceSeries::empty());
    let (status, html) = get(app(provider), "/?ticker=ZZZZ").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No data found for the provided ticker and date range."));
    assert!(!html.contains("<svg"));
}

#[tokio::test]
async fn page_renders_charts_and_table() {
    let provider = StaticProvider::returning(series_from_closes(&wavy_closes(200)));
    let (status, html) = get(app(provider), "/?ticker=aapl").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Stock Analysis for AAPL"));
    assert_eq!(html.matches("<svg").count(), 2);
    assert!(html.contains("<td>Average Return</td>"));
    assert!(html.contains("<td>Standard Deviation of Return</td>"));
}
