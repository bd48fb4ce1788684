//! # Broker Client
//!
//! Connection-pooled publish client for the broker HTTP control API, plus the
//! [`Publisher`] seam the benchmark router publishes through.
//!
//! ```rust,no_run
//! use bench_config::BrokerConfig;
//! use broker_client::{BrokerClient, PublishData};
//!
//! # async fn run() -> Result<(), broker_client::PublishError> {
//! let client = BrokerClient::new(&BrokerConfig::default())?;
//! client.publish("benchmark:public:v3", PublishData::Value(&vec![1, 2, 3])).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod pool;
pub mod publisher;
mod wire;

pub use client::BrokerClient;
pub use error::PublishError;
pub use pool::PoolStats;
pub use publisher::{publish, PublishData, Publisher, WirePayload};
