//! # Benchmark Types Library
//!
//! Record schema and the synthetic dataset shared by every delivery path of the
//! fan-out benchmark.
//!
//! ## Quick Start
//! ```rust
//! use types::{generate, DEFAULT_DATASET_SIZE};
//!
//! let dataset = generate(DEFAULT_DATASET_SIZE).unwrap();
//! assert_eq!(dataset.len(), 5000);
//! assert_eq!(dataset.records()[42].name, "User 42");
//! ```
//!
//! ## Integration Points
//!
//! - **codec**: encodes a [`Dataset`] as self-describing JSON or compact positional bytes
//! - **broker-client**: publishes the dataset to the broker as JSON
//! - **bench server**: generates the dataset once at startup and shares it behind an `Arc`

pub mod errors;
pub mod generator;
pub mod record;

pub use errors::DatasetError;
pub use generator::{generate, generate_at, DEFAULT_DATASET_SIZE};
pub use record::{Dataset, Metadata, Preferences, Record};
