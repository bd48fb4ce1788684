//! Service configuration defaults
//!
//! Default values shared by the benchmark server and the broker client.

/// WebSocket server defaults
pub mod server {
    pub const BIND_ADDRESS: &str = "127.0.0.1";
    pub const PORT: u16 = 3002;

    /// Maximum concurrent WebSocket connections
    pub const MAX_CONNECTIONS: usize = 1000;
}

/// Dataset defaults
pub mod dataset {
    /// Records generated at startup
    pub const SIZE: usize = 5000;
}

/// Broker (Centrifugo HTTP API) defaults
pub mod broker {
    pub const API_URL: &str = "http://localhost:8000/api";
    pub const API_KEY: &str = "api_key";
    pub const CHANNEL: &str = "benchmark:public:v3";

    /// Idle connections kept warm per broker host
    pub const MAX_IDLE_PER_HOST: usize = 100;

    /// Concurrently open (in-flight) publish connections
    pub const MAX_CONNECTIONS: usize = 100;

    /// Deadline for one publish call (milliseconds)
    pub const PUBLISH_TIMEOUT_MS: u64 = 2_000;

    /// HTTP client request timeout (milliseconds)
    pub const CLIENT_TIMEOUT_MS: u64 = 5_000;

    /// Idle pooled connections are closed after this long (seconds)
    pub const IDLE_TIMEOUT_SECS: u64 = 90;

    pub const TCP_KEEPALIVE_SECS: u64 = 60;
}

/// Client token defaults
pub mod token {
    pub const SECRET: &str = "secret";

    /// 24 hours
    pub const TTL_SECS: u64 = 86_400;
}
