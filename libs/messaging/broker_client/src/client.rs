//! # Broker Publish Client
//!
//! ## Purpose
//!
//! Publishes payloads to broker channels over the broker's HTTP API, reusing
//! warm connections across thousands of calls. Connection setup is the cost
//! this client exists to amortize.
//!
//! ## Connection Pooling
//!
//! - **Idle reuse**: reqwest keeps up to `max_idle_per_host` connections warm
//!   per broker host, closing them after `idle_timeout`
//! - **Open ceiling**: an internal limiter caps concurrently open connections
//!   at `max_connections`
//! - **Deadline**: each publish (waiting for a slot plus the round trip) is
//!   bounded by `publish_timeout`; an expired call drops its request, which
//!   discards the connection instead of returning it to the pool
//!
//! ## Failure Policy
//!
//! Timeouts, network failures and broker rejections come back as distinct
//! [`PublishError`] kinds. Nothing is retried here.

use crate::error::PublishError;
use crate::pool::{ConnectionLimiter, PoolStats};
use crate::publisher::{self, PublishData, Publisher, WirePayload};
use crate::wire;
use async_trait::async_trait;
use bench_config::BrokerConfig;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Connection-pooled client for one broker endpoint
#[derive(Debug)]
pub struct BrokerClient {
    http: reqwest::Client,
    endpoint: Url,
    authorization: HeaderValue,
    publish_timeout: Duration,
    client_timeout: Duration,
    limiter: ConnectionLimiter,
}

impl BrokerClient {
    /// Create a client with explicit pool tuning from `config`
    pub fn new(config: &BrokerConfig) -> Result<Self, PublishError> {
        if config.max_connections == 0 {
            return Err(PublishError::InvalidConfig(
                "max_connections must be positive".to_string(),
            ));
        }

        let endpoint = Url::parse(&config.api_url).map_err(|e| {
            PublishError::InvalidConfig(format!("invalid broker URL '{}': {}", config.api_url, e))
        })?;

        let mut authorization = HeaderValue::from_str(&format!("apikey {}", config.api_key))
            .map_err(|e| PublishError::InvalidConfig(format!("invalid API key: {}", e)))?;
        authorization.set_sensitive(true);

        let http = reqwest::Client::builder()
            .pool_idle_timeout(config.idle_timeout())
            .pool_max_idle_per_host(config.max_idle_per_host)
            .timeout(config.client_timeout())
            .tcp_keepalive(config.tcp_keepalive())
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                PublishError::InvalidConfig(format!("failed to create HTTP client: {}", e))
            })?;

        info!(
            endpoint = %endpoint,
            max_connections = config.max_connections,
            max_idle_per_host = config.max_idle_per_host,
            publish_timeout_ms = config.publish_timeout_ms,
            "Broker client initialized"
        );

        Ok(Self {
            http,
            endpoint,
            authorization,
            publish_timeout: config.publish_timeout(),
            client_timeout: config.client_timeout(),
            limiter: ConnectionLimiter::new(config.max_connections),
        })
    }

    /// Publish `data` to `channel`. Values are encoded to JSON and sent as
    /// `data`; pre-encoded bytes are sent unmodified as `b64data`
    pub async fn publish<T: Serialize + ?Sized>(
        &self,
        channel: &str,
        data: PublishData<'_, T>,
    ) -> Result<(), PublishError> {
        publisher::publish(self, channel, data).await
    }

    pub fn stats(&self) -> PoolStats {
        self.limiter.stats()
    }

    pub fn publish_timeout(&self) -> Duration {
        self.publish_timeout
    }

    pub fn client_timeout(&self) -> Duration {
        self.client_timeout
    }

    async fn send(&self, channel: &str, body: Vec<u8>) -> Result<(), PublishError> {
        let _connection = self.limiter.acquire(channel).await?;

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, self.authorization.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::from_reqwest(e, channel, self.client_timeout))?;

        let status = response.status();
        let reply = response
            .bytes()
            .await
            .map_err(|e| PublishError::from_reqwest(e, channel, self.client_timeout))?;

        if !status.is_success() {
            return Err(PublishError::Rejected {
                channel: channel.to_string(),
                status: status.as_u16(),
                reason: String::from_utf8_lossy(&reply).trim().to_string(),
            });
        }

        wire::check_reply(channel, status.as_u16(), &reply)
    }
}

#[async_trait]
impl Publisher for BrokerClient {
    async fn publish_payload(
        &self,
        channel: &str,
        payload: WirePayload,
    ) -> Result<(), PublishError> {
        let body = wire::publish_request(channel, &payload)?;
        let started = Instant::now();

        let result = match tokio::time::timeout(self.publish_timeout, self.send(channel, body)).await
        {
            Ok(result) => result,
            Err(_) => Err(PublishError::Timeout {
                channel: channel.to_string(),
                after: self.publish_timeout,
            }),
        };

        self.limiter.record(&result);
        debug!(
            channel,
            kind = payload.kind(),
            bytes = payload.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "publish finished"
        );
        result
    }
}
