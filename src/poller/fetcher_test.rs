//! Tests for the HTTP fetcher against a local server

use super::*;
use axum::{http::StatusCode as AxumStatus, routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Start a throwaway target server on an ephemeral port
async fn start_target_server() -> SocketAddr {
    let app = Router::new()
        .route("/ok", get(|| async { "up" }))
        .route(
            "/down",
            get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "down") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind target server");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

#[tokio::test]
async fn test_fetch_returns_status_code() {
    let addr = start_target_server().await;
    let fetcher = HttpFetcher::new(None).expect("client builds");

    let status = fetcher
        .fetch(&format!("http://{}/ok", addr))
        .await
        .expect("fetch should succeed");

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_fetch_treats_server_errors_as_success() {
    let addr = start_target_server().await;
    let fetcher = HttpFetcher::new(None).expect("client builds");

    let status = fetcher
        .fetch(&format!("http://{}/down", addr))
        .await
        .expect("5xx is still a completed fetch");

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_fetch_reports_connection_refused() {
    // Grab a free port, then close it again
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let fetcher = HttpFetcher::new(None).expect("client builds");
    let result = fetcher.fetch(&format!("http://{}/", addr)).await;

    assert!(
        matches!(result, Err(FetchError::Connect(_))),
        "expected connect error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_fetch_reports_malformed_url() {
    let fetcher = HttpFetcher::new(None).expect("client builds");

    for url in ["not a url", ""] {
        let result = fetcher.fetch(url).await;
        assert!(
            matches!(result, Err(FetchError::InvalidUrl(_))),
            "expected invalid url for {:?}, got {:?}",
            url,
            result
        );
    }
}

#[tokio::test]
async fn test_fetch_times_out_when_configured() {
    let addr = start_target_server().await;
    let fetcher = HttpFetcher::new(Some(Duration::from_millis(100))).expect("client builds");

    let result = fetcher.fetch(&format!("http://{}/slow", addr)).await;

    assert!(
        matches!(result, Err(FetchError::Timeout(_))),
        "expected timeout, got {:?}",
        result
    );
}

#[test]
fn test_fetch_error_display() {
    let err = FetchError::Connect("tcp connect error".to_string());
    assert_eq!(err.to_string(), "connection failed: tcp connect error");
}
