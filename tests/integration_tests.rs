//! Integration tests
//!
//! Drive the full router against a mock market-data upstream

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use coinpulse::{create_router, Settings};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use tower::ServiceExt;

async fn create_test_app(server: &MockServer) -> Router {
    let env: HashMap<&str, String> = HashMap::from([
        ("COINGECKO_BASE_URL", server.base_url()),
        ("COINGECKO_API_KEY", "CG-integration-key".to_string()),
    ]);
    let settings =
        Settings::from_lookup(|key| env.get(key).cloned()).expect("Failed to create test settings");
    create_router(settings).await.expect("Failed to create router")
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start_async().await;
    let app = create_test_app(&server).await;

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "coinpulse");
    assert_eq!(body["details"]["config"], "valid");
}

#[tokio::test]
async fn test_liveness_check() {
    let server = MockServer::start_async().await;
    let app = create_test_app(&server).await;

    let (status, body) = get_json(app, "/health/live").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_request_id_header() {
    let server = MockServer::start_async().await;
    let app = create_test_app(&server).await;

    let response = app
        .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let request_id = response.headers().get("x-request-id").unwrap();
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_coin_overview_ready() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin");
            then.status(200).json_body(json!({
                "id": "bitcoin",
                "name": "Bitcoin",
                "symbol": "btc",
                "image": {"large": "https://assets.test/btc.png"},
                "market_data": {"current_price": {"usd": 1234.5}}
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin/ohlc");
            then.status(200)
                .json_body(json!([[1709395200000i64, 1200.0, 1250.0, 1190.0, 1234.5]]));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = get_json(app, "/api/coins/bitcoin/overview").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "ready");
    assert_eq!(body["symbol"], "BTC");
    assert_eq!(body["price"], "$1,234.50");
    assert_eq!(body["image"], "https://assets.test/btc.png");
    assert_eq!(body["candles"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_coin_overview_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/coins/");
            then.status(500);
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = get_json(app, "/api/coins/bitcoin/overview").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"state": "unavailable"}));
}

#[tokio::test]
async fn test_trending_rows() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search/trending");
            then.status(200).json_body(json!({
                "coins": [
                    {"item": {
                        "id": "pepe",
                        "name": "Pepe",
                        "symbol": "pepe",
                        "thumb": "https://assets.test/pepe.png",
                        "data": {
                            "price": "0.0000123",
                            "price_change_percentage_24h": {"usd": 12.5}
                        }
                    }},
                    {"item": {
                        "id": "solana",
                        "name": "Solana",
                        "symbol": "sol",
                        "data": {
                            "price": 142.1,
                            "price_change_percentage_24h": {"usd": -3.1}
                        }
                    }}
                ]
            }));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = get_json(app, "/api/trending").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "ready");

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["symbol"], "PEPE");
    assert_eq!(rows[0]["is_trending_up"], true);
    assert_eq!(rows[1]["price"], "$142.10");
    assert_eq!(rows[1]["is_trending_up"], false);
}

#[tokio::test]
async fn test_trending_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search/trending");
            then.status(429)
                .json_body(json!({"status": {"error_code": 429, "error_message": "Rate limited"}}));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = get_json(app, "/api/trending").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["state"], "unavailable");
}

#[tokio::test]
async fn test_coin_details_error_passthrough() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/nope");
            then.status(404).json_body(json!({"error": "coin not found"}));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = get_json(app, "/api/coins/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "api_error");
    assert_eq!(body["message"], "API Error: 404: coin not found");
    assert_eq!(body["upstream_status"], 404);
}

#[tokio::test]
async fn test_malformed_coin_id_is_bad_request() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({}));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = get_json(app, "/api/coins/bit%20coin").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "invalid_request_error");
    assert!(body.get("upstream_status").is_none());
    upstream.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_coin_ohlc_forwards_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/coins/ethereum/ohlc")
                .query_param("vs_currency", "eur")
                .query_param("days", "7");
            then.status(200)
                .json_body(json!([[1709395200000i64, 3000.0, 3100.0, 2950.0, 3050.0]]));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = get_json(app, "/api/coins/ethereum/ohlc?vs_currency=eur&days=7").await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0][4], 3050.0);
}

#[tokio::test]
async fn test_unknown_route() {
    let server = MockServer::start_async().await;
    let app = create_test_app(&server).await;

    let response = app
        .oneshot(Request::builder().uri("/api/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
