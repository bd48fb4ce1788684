//! # Event Router
//!
//! ## Purpose
//!
//! Maps inbound event names on a connection to one of the benchmark's delivery
//! paths:
//!
//! | inbound event        | action                                          |
//! |----------------------|-------------------------------------------------|
//! | `request-json`       | encode self-describing, emit `response-json`    |
//! | `request-buffer`     | encode compact, emit `response-buffer`          |
//! | `trigger-centrifugo` | publish the dataset to the broker channel       |
//! | `disconnect`         | release the connection's registry entry         |
//!
//! ## Dispatch
//!
//! Names are resolved to an [`Action`] once per frame through a table built at
//! construction; everything after that matches on the enum. Every event is
//! handled independently against the shared dataset. There is no session
//! state, no encoding cache and no ordering between events.
//!
//! ## Failure Handling
//!
//! Encode, emit and publish failures are logged and the request is dropped.
//! Nothing is retried and nothing is reported back to the connection.

use crate::connection::{Connection, OutboundEvent};
use crate::error::Result;
use crate::registry::ConnectionRegistry;
use broker_client::{PublishData, Publisher};
use codec::Encoding;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use types::Dataset;

/// Events a connection may send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundEvent {
    RequestJson,
    RequestBuffer,
    TriggerCentrifugo,
    Disconnect,
}

impl InboundEvent {
    pub const ALL: [InboundEvent; 4] = [
        InboundEvent::RequestJson,
        InboundEvent::RequestBuffer,
        InboundEvent::TriggerCentrifugo,
        InboundEvent::Disconnect,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::RequestJson => "request-json",
            InboundEvent::RequestBuffer => "request-buffer",
            InboundEvent::TriggerCentrifugo => "trigger-centrifugo",
            InboundEvent::Disconnect => "disconnect",
        }
    }

    pub fn action(&self) -> Action {
        match self {
            InboundEvent::RequestJson => Action::Emit(Encoding::SelfDescribing),
            InboundEvent::RequestBuffer => Action::Emit(Encoding::Compact),
            InboundEvent::TriggerCentrifugo => Action::Publish,
            InboundEvent::Disconnect => Action::Release,
        }
    }
}

/// What the router does for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Encode the dataset and emit it to the originating connection
    Emit(Encoding),
    /// Publish the dataset to the broker channel
    Publish,
    /// Drop the connection's bookkeeping
    Release,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Emit(encoding) => write!(f, "emit {}", encoding),
            Action::Publish => f.write_str("publish"),
            Action::Release => f.write_str("release"),
        }
    }
}

/// Result of a successfully dispatched action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Emitted { event: OutboundEvent, bytes: usize },
    Published { channel: String },
    Released,
}

/// Process-wide router state shared by every connection
pub struct EventRouter {
    dataset: Arc<Dataset>,
    publisher: Arc<dyn Publisher>,
    channel: String,
    registry: Arc<ConnectionRegistry>,
    table: HashMap<&'static str, Action>,
}

impl EventRouter {
    pub fn new(
        dataset: Arc<Dataset>,
        publisher: Arc<dyn Publisher>,
        channel: impl Into<String>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        let table = InboundEvent::ALL
            .iter()
            .map(|event| (event.name(), event.action()))
            .collect();

        Self {
            dataset,
            publisher,
            channel: channel.into(),
            registry,
            table,
        }
    }

    /// Resolve an inbound event name
    pub fn resolve(&self, event: &str) -> Option<Action> {
        self.table.get(event).copied()
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Bind a newly established connection
    pub fn bind<C: Connection>(self: &Arc<Self>, connection: C) -> Result<ConnectionHandler<C>> {
        self.registry.register(connection.id())?;
        Ok(ConnectionHandler {
            router: Arc::clone(self),
            connection,
        })
    }
}

/// Router bindings for one connection, discarded at disconnect
pub struct ConnectionHandler<C: Connection> {
    router: Arc<EventRouter>,
    connection: C,
}

impl<C: Connection> ConnectionHandler<C> {
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Run `action`, returning what happened or why it failed
    pub async fn dispatch(&self, action: Action) -> Result<Outcome> {
        match action {
            Action::Emit(encoding) => {
                let dataset = Arc::clone(&self.router.dataset);
                let payload =
                    tokio::task::spawn_blocking(move || codec::encode(&dataset, encoding))
                        .await??;

                let event = OutboundEvent::for_encoding(encoding);
                let bytes = payload.len();
                self.connection.emit(event, payload)?;
                Ok(Outcome::Emitted { event, bytes })
            }
            Action::Publish => {
                let channel = self.router.channel.as_str();
                broker_client::publish(
                    self.router.publisher.as_ref(),
                    channel,
                    PublishData::Value(self.router.dataset.as_ref()),
                )
                .await?;
                Ok(Outcome::Published {
                    channel: channel.to_string(),
                })
            }
            Action::Release => {
                self.router.registry.release(self.connection.id());
                Ok(Outcome::Released)
            }
        }
    }

    /// Run `action` and log the result; failures drop the request
    pub async fn handle(&self, action: Action) {
        let id = self.connection.id();
        let started = Instant::now();
        debug!("[{}] handling {}", id, action);

        match self.dispatch(action).await {
            Ok(Outcome::Emitted { event, bytes }) => {
                info!(
                    "[{}] emitted {} ({} bytes) in {:?}",
                    id,
                    event,
                    bytes,
                    started.elapsed()
                );
            }
            Ok(Outcome::Published { channel }) => {
                info!(
                    "[{}] published {} records to '{}' in {:?}",
                    id,
                    self.router.dataset.len(),
                    channel,
                    started.elapsed()
                );
            }
            Ok(Outcome::Released) => {
                debug!("[{}] released", id);
            }
            Err(crate::BenchError::Publish(e)) => {
                warn!("[{}] publish failed ({}): {}", id, e.kind(), e);
            }
            Err(e) => {
                error!("[{}] {} failed, request dropped: {}", id, action, e);
            }
        }
    }

    /// Discard this connection's bindings
    pub fn release(&self) {
        self.router.registry.release(self.connection.id());
    }
}
