//! # Fan-out Benchmark Configuration
//!
//! Centralized configuration and defaults for the benchmark services.
//!
//! ## Features
//!
//! - **Defaults**: the values the benchmark was tuned with (see [`defaults`])
//! - **Layered loading**: optional TOML/JSON file, then `BENCH__`-prefixed
//!   environment variables
//! - **Explicit pool tuning**: broker pool sizes and timeouts are plain fields,
//!   never implicit HTTP library defaults
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bench_config::BenchConfig;
//!
//! let config = BenchConfig::load(None).unwrap();
//! println!("publishing to {}", config.broker.channel);
//! ```

pub mod bench_config;
pub mod defaults;

pub use bench_config::{BenchConfig, BrokerConfig, DatasetConfig, ServerConfig, TokenConfig};
