//! Error types for dataset generation

use thiserror::Error;

/// Errors that can occur while generating a benchmark dataset
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DatasetError {
    /// A dataset must contain at least one record
    #[error("Dataset size must be positive, got {requested}")]
    Empty { requested: usize },
}
