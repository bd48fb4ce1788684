//! Error types for the benchmark server

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Encoding error: {0}")]
    Codec(#[from] codec::CodecError),

    #[error("Publish error: {0}")]
    Publish(#[from] broker_client::PublishError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] types::DatasetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] warp::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },
}

pub type Result<T> = std::result::Result<T, BenchError>;
