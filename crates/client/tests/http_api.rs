//! Tests for `CatalogApi` against a local TCP server.
//!
//! Each server answers one request with a canned response, so envelope
//! unwrapping and failure classification run through real HTTP.

use std::time::Duration;

use assert_matches::assert_matches;
use catalog_client::api::CatalogApi;
use catalog_client::collection::RemoteCollection;
use catalog_client::error::{ApiError, GENERIC_FAILURE_MESSAGE};
use catalog_core::controller::QueryController;
use catalog_core::error::FailureKind;
use catalog_core::query::ProductQuery;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            return;
        }
    }
}

/// Serve one response and return the API base URL.
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/api")
}

fn first_page() -> ProductQuery {
    QueryController::new(10).unwrap().current_query()
}

// ---------------------------------------------------------------------------
// Test: a 200 response is unwrapped from its `data` envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn success_body_is_unwrapped() {
    let url = serve_once(
        "200 OK",
        r#"{"data":{"items":[{"ProductId":4,"Name":"Gaming Mouse","Price":45.5,"Stock":25,"CategoryId":1,"IsActive":true}],"total":31}}"#,
    )
    .await;

    let page = CatalogApi::new(url).fetch_products(&first_page()).await.unwrap();

    assert_eq!(page.total, 31);
    assert_eq!(page.items[0].name, "Gaming Mouse");
}

// ---------------------------------------------------------------------------
// Test: a non-2xx response keeps the body's message and the status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_status_carries_body_message() {
    let url = serve_once(
        "422 Unprocessable Entity",
        r#"{"message":"Category does not exist","status":422}"#,
    )
    .await;

    let err = CatalogApi::new(url).fetch_products(&first_page()).await.unwrap_err();

    assert_matches!(&err, ApiError::Server { status: 422, message } if message == "Category does not exist");
    let failure = err.to_failure();
    assert_eq!(failure.kind, FailureKind::Server);
    assert_eq!(failure.status, Some(422));
    assert_eq!(failure.message, "Category does not exist");
}

#[tokio::test]
async fn error_status_without_message_uses_generic_text() {
    let url = serve_once("502 Bad Gateway", "<html>Bad Gateway</html>").await;

    let failure = CatalogApi::new(url).fetch_page(&first_page()).await.unwrap_err();

    assert_eq!(failure.kind, FailureKind::Server);
    assert_eq!(failure.status, Some(502));
    assert_eq!(failure.message, GENERIC_FAILURE_MESSAGE);
}

// ---------------------------------------------------------------------------
// Test: a malformed 200 body is a server failure that keeps its status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_body_is_server_failure() {
    let url = serve_once("200 OK", r#"{"data":{"items":"not a list"}}"#).await;

    let err = CatalogApi::new(url).fetch_products(&first_page()).await.unwrap_err();

    assert_matches!(err, ApiError::Decode { status: 200, .. });
    assert_eq!(err.status(), Some(200));
    let failure = err.to_failure();
    assert_eq!(failure.kind, FailureKind::Server);
    assert_eq!(failure.status, Some(200));
}

// ---------------------------------------------------------------------------
// Test: transport failures are network failures without a status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connection_refused_is_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = CatalogApi::new(format!("http://{addr}/api"));
    let err = api.fetch_products(&first_page()).await.unwrap_err();

    assert_matches!(err, ApiError::Request(_));
    let failure = err.to_failure();
    assert_eq!(failure.kind, FailureKind::Network);
    assert_eq!(failure.status, None);
}

#[tokio::test]
async fn timeout_is_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let api = CatalogApi::with_client(client, format!("http://{addr}/api"));

    let err = api.fetch_products(&first_page()).await.unwrap_err();

    assert_matches!(&err, ApiError::Request(e) if e.is_timeout());
    assert_eq!(err.to_failure().kind, FailureKind::Network);
}
