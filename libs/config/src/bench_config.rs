//! Benchmark Configuration Module
//!
//! Loads configuration from an optional TOML (or JSON) file with
//! environment-variable overrides. Every section falls back to the values in
//! [`crate::defaults`], so an empty file (or no file) is a valid configuration.

use crate::defaults;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable prefix, e.g. `BENCH__BROKER__API_KEY`
pub const ENV_PREFIX: &str = "BENCH";
const ENV_SEPARATOR: &str = "__";

/// Main benchmark configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub broker: BrokerConfig,
    pub token: TokenConfig,
}

/// WebSocket/HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,

    /// Enable CORS for web browsers
    pub enable_cors: bool,

    /// Maximum number of concurrent WebSocket connections
    pub max_connections: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Number of records generated at startup
    pub size: usize,
}

/// Broker publish client settings.
///
/// Pool sizing is the performance-critical parameter under benchmark load, so
/// every knob is spelled out here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Broker HTTP API endpoint
    pub api_url: String,

    /// Pre-shared API key sent with every publish
    pub api_key: String,

    /// Channel the dataset is published to
    pub channel: String,

    /// Idle connections kept per broker host
    pub max_idle_per_host: usize,

    /// Upper bound on concurrently open publish connections
    pub max_connections: usize,

    /// Deadline for a whole publish call, including waiting for a connection
    pub publish_timeout_ms: u64,

    /// HTTP client request timeout
    pub client_timeout_ms: u64,

    /// Idle pooled connections are dropped after this many seconds
    pub idle_timeout_secs: u64,

    pub tcp_keepalive_secs: u64,
}

/// Client token issuance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// HMAC secret shared with the broker
    pub secret: String,
    pub ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::server::BIND_ADDRESS.to_string(),
            port: defaults::server::PORT,
            enable_cors: true,
            max_connections: defaults::server::MAX_CONNECTIONS,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            size: defaults::dataset::SIZE,
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::broker::API_URL.to_string(),
            api_key: defaults::broker::API_KEY.to_string(),
            channel: defaults::broker::CHANNEL.to_string(),
            max_idle_per_host: defaults::broker::MAX_IDLE_PER_HOST,
            max_connections: defaults::broker::MAX_CONNECTIONS,
            publish_timeout_ms: defaults::broker::PUBLISH_TIMEOUT_MS,
            client_timeout_ms: defaults::broker::CLIENT_TIMEOUT_MS,
            idle_timeout_secs: defaults::broker::IDLE_TIMEOUT_SECS,
            tcp_keepalive_secs: defaults::broker::TCP_KEEPALIVE_SECS,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: defaults::token::SECRET.to_string(),
            ttl_secs: defaults::token::TTL_SECS,
        }
    }
}

impl BrokerConfig {
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_millis(self.client_timeout_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn tcp_keepalive(&self) -> Duration {
        Duration::from_secs(self.tcp_keepalive_secs)
    }
}

impl TokenConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl BenchConfig {
    /// Load configuration from an optional file with environment overrides.
    ///
    /// The file format follows its extension (`.toml`, `.json`). A path that
    /// is given but missing is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading configuration file: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // Override with environment variables (BENCH__ prefix)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let mut config: BenchConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.expand_env_vars()?;
        config.validate()?;
        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Expand `$VAR` / `${VAR}` references in broker and token credentials
    pub fn expand_env_vars(&mut self) -> Result<()> {
        self.broker.api_url = shellexpand::env(&self.broker.api_url)
            .context("Failed to expand broker API URL")?
            .into_owned();
        self.broker.api_key = shellexpand::env(&self.broker.api_key)
            .context("Failed to expand broker API key")?
            .into_owned();
        self.token.secret = shellexpand::env(&self.token.secret)
            .context("Failed to expand token secret")?
            .into_owned();
        Ok(())
    }

    /// Reject values that would make the benchmark meaningless
    pub fn validate(&self) -> Result<()> {
        if self.dataset.size == 0 {
            bail!("dataset.size must be positive");
        }
        if self.broker.max_connections == 0 {
            bail!("broker.max_connections must be positive");
        }
        if self.broker.publish_timeout_ms == 0 {
            bail!("broker.publish_timeout_ms must be positive");
        }
        // The reqwest deadline backs up the publish deadline, never undercuts it
        if self.broker.client_timeout_ms < self.broker.publish_timeout_ms {
            bail!(
                "broker.client_timeout_ms ({}) must be at least broker.publish_timeout_ms ({})",
                self.broker.client_timeout_ms,
                self.broker.publish_timeout_ms
            );
        }
        if self.broker.channel.is_empty() {
            bail!("broker.channel must not be empty");
        }
        if self.server.max_connections == 0 {
            bail!("server.max_connections must be positive");
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}
