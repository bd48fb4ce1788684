//! Encoding errors
//!
//! An encoding failure is fatal to the single request that triggered it and
//! never to the process: callers log the error and drop the request without
//! emitting a partial payload.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON encoding or decoding failed
    #[error("Self-describing codec error: {0}")]
    SelfDescribing(#[from] serde_json::Error),

    /// Positional MessagePack encoding failed
    #[error("Compact encode error: {0}")]
    CompactEncode(#[from] rmp_serde::encode::Error),

    /// Positional MessagePack decoding failed, including row shape mismatches
    #[error("Compact decode error: {0}")]
    CompactDecode(#[from] rmp_serde::decode::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
