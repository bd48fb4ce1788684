//! Publish failure kinds
//!
//! Each kind is distinct so callers can tell a slow broker from an unreachable
//! one. Nothing in this crate retries; retry policy belongs to the caller.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Publish to '{channel}' timed out after {after:?}")]
    Timeout { channel: String, after: Duration },

    #[error("Network error publishing to '{channel}': {message}")]
    Network { channel: String, message: String },

    #[error("Broker rejected publish to '{channel}' (status {status}): {reason}")]
    Rejected {
        channel: String,
        status: u16,
        reason: String,
    },

    #[error("Failed to encode publish payload: {0}")]
    Encoding(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PublishError {
    /// Short label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            PublishError::Timeout { .. } => "timeout",
            PublishError::Network { .. } => "network",
            PublishError::Rejected { .. } => "rejected",
            PublishError::Encoding(_) => "encoding",
            PublishError::InvalidConfig(_) => "config",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PublishError::Timeout { .. })
    }

    /// Classify a transport error; `client_timeout` is the reqwest-level
    /// deadline, the only one reqwest itself can report as expired
    pub(crate) fn from_reqwest(err: reqwest::Error, channel: &str, client_timeout: Duration) -> Self {
        if err.is_timeout() {
            PublishError::Timeout {
                channel: channel.to_string(),
                after: client_timeout,
            }
        } else {
            PublishError::Network {
                channel: channel.to_string(),
                message: err.to_string(),
            }
        }
    }
}
