//! Router scenarios driven through in-process connections and publishers.
//!
//! A recording connection captures every emit, and stub publishers stand in
//! for the broker, so each delivery path can be checked end to end without
//! sockets.

use async_trait::async_trait;
use broker_client::{PublishError, Publisher, WirePayload};
use chrono::{TimeZone, Utc};
use codec::{EncodedPayload, Encoding};
use fanout_bench_server::{
    Action, BenchError, Connection, ConnectionRegistry, EventRouter, OutboundEvent, Outcome,
};
use std::sync::{Arc, Mutex};
use types::{Dataset, Record};
use uuid::Uuid;

/// Captures every emitted frame
#[derive(Clone)]
struct RecordingConnection {
    id: Uuid,
    emitted: Arc<Mutex<Vec<(OutboundEvent, EncodedPayload)>>>,
}

impl RecordingConnection {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            emitted: Arc::default(),
        }
    }

    fn emitted(&self) -> Vec<(OutboundEvent, EncodedPayload)> {
        self.emitted.lock().unwrap().clone()
    }
}

impl Connection for RecordingConnection {
    fn id(&self) -> Uuid {
        self.id
    }

    fn emit(&self, event: OutboundEvent, payload: EncodedPayload) -> fanout_bench_server::Result<()> {
        self.emitted.lock().unwrap().push((event, payload));
        Ok(())
    }
}

/// Records publishes and always succeeds
#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(String, WirePayload)>>,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish_payload(
        &self,
        channel: &str,
        payload: WirePayload,
    ) -> Result<(), PublishError> {
        self.published
            .lock()
            .unwrap()
            .push((channel.to_string(), payload));
        Ok(())
    }
}

/// Every publish fails as if the broker were down
struct FailingPublisher;

#[async_trait]
impl Publisher for FailingPublisher {
    async fn publish_payload(
        &self,
        channel: &str,
        _payload: WirePayload,
    ) -> Result<(), PublishError> {
        Err(PublishError::Network {
            channel: channel.to_string(),
            message: "connection refused".to_string(),
        })
    }
}

fn three_records() -> Arc<Dataset> {
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    Arc::new(types::generate_at(3, at).unwrap())
}

fn router_with(publisher: Arc<dyn Publisher>, max_connections: usize) -> Arc<EventRouter> {
    Arc::new(EventRouter::new(
        three_records(),
        publisher,
        "bench:test",
        Arc::new(ConnectionRegistry::new(max_connections)),
    ))
}

fn expected_records(router: &EventRouter) -> Vec<Record> {
    router.dataset().records().to_vec()
}

#[tokio::test]
async fn test_request_json_emits_all_records_in_order() {
    let router = router_with(Arc::new(RecordingPublisher::default()), 10);
    let connection = RecordingConnection::new();
    let handler = router.bind(connection.clone()).unwrap();

    let action = router.resolve("request-json").unwrap();
    let outcome = handler.dispatch(action).await.unwrap();

    let emitted = connection.emitted();
    assert_eq!(emitted.len(), 1);
    let (event, payload) = &emitted[0];
    assert_eq!(*event, OutboundEvent::ResponseJson);
    assert_eq!(payload.encoding(), Encoding::SelfDescribing);
    assert_eq!(
        outcome,
        Outcome::Emitted {
            event: OutboundEvent::ResponseJson,
            bytes: payload.len(),
        }
    );

    let records = codec::decode(payload).unwrap();
    assert_eq!(records, expected_records(&router));
    assert_eq!(
        records.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[tokio::test]
async fn test_request_buffer_emits_compact_records() {
    let router = router_with(Arc::new(RecordingPublisher::default()), 10);
    let connection = RecordingConnection::new();
    let handler = router.bind(connection.clone()).unwrap();

    handler
        .dispatch(router.resolve("request-buffer").unwrap())
        .await
        .unwrap();

    let emitted = connection.emitted();
    assert_eq!(emitted.len(), 1);
    let (event, payload) = &emitted[0];
    assert_eq!(*event, OutboundEvent::ResponseBuffer);
    assert_eq!(payload.encoding(), Encoding::Compact);
    assert_eq!(codec::decode(payload).unwrap(), expected_records(&router));
}

#[tokio::test]
async fn test_repeated_requests_are_independent() {
    let router = router_with(Arc::new(RecordingPublisher::default()), 10);
    let connection = RecordingConnection::new();
    let handler = router.bind(connection.clone()).unwrap();

    for _ in 0..3 {
        handler
            .dispatch(Action::Emit(Encoding::SelfDescribing))
            .await
            .unwrap();
    }

    let emitted = connection.emitted();
    assert_eq!(emitted.len(), 3);
    assert!(emitted.windows(2).all(|w| w[0].1 == w[1].1));
}

#[tokio::test]
async fn test_trigger_publishes_dataset_without_emitting() {
    let publisher = Arc::new(RecordingPublisher::default());
    let router = router_with(publisher.clone(), 10);
    let connection = RecordingConnection::new();
    let handler = router.bind(connection.clone()).unwrap();

    let outcome = handler
        .dispatch(router.resolve("trigger-centrifugo").unwrap())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Published {
            channel: "bench:test".to_string()
        }
    );
    assert!(connection.emitted().is_empty());

    let published = publisher.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    let (channel, payload) = &published[0];
    assert_eq!(channel, "bench:test");
    let WirePayload::Json(json) = payload else {
        panic!("dataset should be published as JSON, got {}", payload.kind());
    };
    let records: Vec<Record> = serde_json::from_slice(json).unwrap();
    assert_eq!(records, expected_records(&router));
}

#[tokio::test]
async fn test_publish_failure_is_reported_and_nothing_emitted() {
    let router = router_with(Arc::new(FailingPublisher), 10);
    let connection = RecordingConnection::new();
    let handler = router.bind(connection.clone()).unwrap();

    let err = handler.dispatch(Action::Publish).await.unwrap_err();
    match err {
        BenchError::Publish(e) => assert_eq!(e.kind(), "network"),
        other => panic!("expected publish error, got {other:?}"),
    }

    // handle() absorbs the failure
    handler.handle(Action::Publish).await;
    assert!(connection.emitted().is_empty());
    assert!(router.registry().contains(connection.id()));
}

#[tokio::test]
async fn test_disconnect_releases_registry_entry() {
    let router = router_with(Arc::new(RecordingPublisher::default()), 10);
    let connection = RecordingConnection::new();
    let handler = router.bind(connection.clone()).unwrap();
    assert_eq!(router.registry().count(), 1);

    let outcome = handler
        .dispatch(router.resolve("disconnect").unwrap())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Released);
    assert!(!router.registry().contains(connection.id()));
    assert_eq!(router.registry().count(), 0);

    // Releasing again after the socket closes is harmless
    handler.release();
    assert_eq!(router.registry().count(), 0);
}

#[test]
fn test_unknown_events_do_not_resolve() {
    let router = router_with(Arc::new(RecordingPublisher::default()), 10);
    assert_eq!(router.resolve("request-xml"), None);
    assert_eq!(router.resolve(""), None);
    assert_eq!(router.resolve("REQUEST-JSON"), None);
    assert_eq!(
        router.resolve("request-buffer"),
        Some(Action::Emit(Encoding::Compact))
    );
}

#[test]
fn test_bind_rejects_connections_beyond_ceiling() {
    let router = router_with(Arc::new(RecordingPublisher::default()), 1);
    let _first = router.bind(RecordingConnection::new()).unwrap();

    let rejected = router.bind(RecordingConnection::new());
    assert!(matches!(rejected, Err(BenchError::Connection { .. })));
    assert_eq!(router.registry().count(), 1);
}
