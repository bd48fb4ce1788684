//! HTTP and WebSocket route tests using `warp::test`

use bench_config::BenchConfig;
use broker_client::BrokerClient;
use chrono::{TimeZone, Utc};
use fanout_bench_server::{BenchServer, OutboundFrame};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use types::Record;

fn test_server() -> BenchServer {
    let config = BenchConfig::default();
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let dataset = Arc::new(types::generate_at(3, at).unwrap());
    let broker = Arc::new(BrokerClient::new(&config.broker).unwrap());
    BenchServer::new(config, dataset, broker)
}

#[tokio::test]
async fn test_health() {
    let server = test_server();
    let response = warp::test::request()
        .path("/health")
        .reply(&server.routes())
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.body().as_ref(), b"OK");
}

#[tokio::test]
async fn test_status_reports_dataset_and_pool() {
    let server = test_server();
    let response = warp::test::request()
        .path("/status")
        .reply(&server.routes())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["status"], "running");
    assert_eq!(body["dataset_records"], 3);
    assert_eq!(body["connections"], 0);
    assert_eq!(body["broker"]["max_connections"], 100);
    assert_eq!(body["broker"]["published"], 0);
}

#[tokio::test]
async fn test_token_endpoint_returns_token() {
    let server = test_server();
    let response = warp::test::request()
        .method("GET")
        .path("/api/centrifugo-token")
        .reply(&server.routes())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn test_etag_full_then_not_modified() {
    let server = test_server();
    let routes = server.routes();

    let first = warp::test::request()
        .path("/api/etag-demo")
        .reply(&routes)
        .await;
    assert_eq!(first.status(), 200);
    assert_eq!(first.body().len(), 500 * 1024);
    assert_eq!(first.headers()["content-type"], "text/plain");
    let etag = first.headers()["etag"].to_str().unwrap().to_string();

    let second = warp::test::request()
        .path("/api/etag-demo")
        .header("if-none-match", etag.as_str())
        .reply(&routes)
        .await;
    assert_eq!(second.status(), 304);
    assert!(second.body().is_empty());

    let stale = warp::test::request()
        .path("/api/etag-demo")
        .header("if-none-match", "\"stale\"")
        .reply(&routes)
        .await;
    assert_eq!(stale.status(), 200);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let server = test_server();
    let response = warp::test::request()
        .path("/nope")
        .reply(&server.routes())
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_websocket_session() {
    let server = test_server();
    let expected: Vec<Record> = server.router().dataset().records().to_vec();

    let mut client = warp::test::ws()
        .path("/ws")
        .handshake(server.routes())
        .await
        .expect("handshake");

    client.send_text(r#"{"event":"request-json"}"#).await;
    let msg = client.recv().await.unwrap();
    let frame: Value = serde_json::from_str(msg.to_str().unwrap()).unwrap();
    assert_eq!(frame["event"], "response-json");
    let records: Vec<Record> = serde_json::from_value(frame["data"].clone()).unwrap();
    assert_eq!(records, expected);

    // Unknown events are ignored and the connection stays usable
    client.send_text("request-xml").await;

    client.send_text("request-buffer").await;
    let msg = client.recv().await.unwrap();
    assert!(msg.is_binary());
    let (name, payload) = OutboundFrame::split_binary(msg.as_bytes()).unwrap();
    assert_eq!(name, "response-buffer");
    assert_eq!(codec::decode_compact(payload).unwrap(), expected);

    assert_eq!(server.router().registry().count(), 1);

    client.send_text("disconnect").await;
    let _ = client.recv_closed().await;

    // Release runs after the socket loop exits
    for _ in 0..50 {
        if server.router().registry().count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(server.router().registry().count(), 0);
}

#[tokio::test]
async fn test_socket_path_also_upgrades() {
    let server = test_server();
    let mut client = warp::test::ws()
        .path("/socket")
        .handshake(server.routes())
        .await
        .expect("handshake");

    client.send_text("request-json").await;
    let msg = client.recv().await.unwrap();
    assert!(msg.is_text());
}
