//! Publisher abstraction
//!
//! The router depends on [`Publisher`] rather than on [`crate::BrokerClient`]
//! so it can be driven against in-process stubs. The payload kind travels with
//! the bytes: JSON produced by the client goes out as the command's `data`,
//! caller-encoded bytes go out as `b64data`, whatever they contain.

use crate::error::PublishError;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

/// Payload bytes tagged with how the broker command must carry them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WirePayload {
    /// Well-formed JSON, spliced into `data` without re-parsing
    Json(Bytes),
    /// Opaque bytes, sent base64-encoded in `b64data`
    Binary(Bytes),
}

impl WirePayload {
    pub fn bytes(&self) -> &Bytes {
        match self {
            WirePayload::Json(bytes) | WirePayload::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WirePayload::Json(_) => "json",
            WirePayload::Binary(_) => "binary",
        }
    }
}

/// Delivers an encoded payload to a named broker channel
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish_payload(&self, channel: &str, payload: WirePayload)
        -> Result<(), PublishError>;
}

/// What to publish: pre-encoded bytes, or a value the client should encode
#[derive(Debug)]
pub enum PublishData<'a, T: ?Sized> {
    /// Sent as-is, as binary data
    Encoded(Bytes),
    /// Serialized to JSON before sending
    Value(&'a T),
}

impl PublishData<'static, ()> {
    /// Pre-encoded bytes, no value type involved
    pub fn encoded(bytes: impl Into<Bytes>) -> Self {
        PublishData::Encoded(bytes.into())
    }
}

impl<T: Serialize + ?Sized> PublishData<'_, T> {
    pub fn into_wire(self) -> Result<WirePayload, PublishError> {
        match self {
            PublishData::Encoded(bytes) => Ok(WirePayload::Binary(bytes)),
            PublishData::Value(value) => serde_json::to_vec(value)
                .map(|json| WirePayload::Json(Bytes::from(json)))
                .map_err(|e| PublishError::Encoding(e.to_string())),
        }
    }
}

/// Encode `data` if needed and publish it through `publisher`
pub async fn publish<P, T>(
    publisher: &P,
    channel: &str,
    data: PublishData<'_, T>,
) -> Result<(), PublishError>
where
    P: Publisher + ?Sized,
    T: Serialize + ?Sized,
{
    let payload = data.into_wire()?;
    publisher.publish_payload(channel, payload).await
}
