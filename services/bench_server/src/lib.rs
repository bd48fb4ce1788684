//! Fan-out Benchmark Server
//!
//! Serves one shared synthetic dataset to many WebSocket connections, either
//! pushed directly (self-describing or compact encoding) or published through
//! the broker for fan-out.

pub mod connection;
pub mod error;
pub mod etag;
pub mod registry;
pub mod router;
pub mod server;
pub mod token;

pub use connection::{Connection, OutboundEvent, OutboundFrame, WsConnection};
pub use error::{BenchError, Result};
pub use registry::ConnectionRegistry;
pub use router::{Action, ConnectionHandler, EventRouter, InboundEvent, Outcome};
pub use server::BenchServer;
pub use token::TokenIssuer;
