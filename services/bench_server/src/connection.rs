//! WebSocket connection capability and frame layout
//!
//! Inbound text frames carry either `{"event":"<name>","data":...}` or a bare
//! event name; `data` is ignored. Outbound frames:
//!
//! ```text
//! response-json    text   {"event":"response-json","data":<self-describing payload>}
//! response-buffer  binary [name_len: u8][name bytes][compact payload]
//! ```
//!
//! Payload bytes are spliced into the frame as produced by the codec, never
//! re-encoded.

use crate::error::{BenchError, Result};
use codec::{EncodedPayload, Encoding};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Response events emitted back to a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboundEvent {
    ResponseJson,
    ResponseBuffer,
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::ResponseJson => "response-json",
            OutboundEvent::ResponseBuffer => "response-buffer",
        }
    }

    /// The response event paired with an encoding
    pub fn for_encoding(encoding: Encoding) -> Self {
        match encoding {
            Encoding::SelfDescribing => OutboundEvent::ResponseJson,
            Encoding::Compact => OutboundEvent::ResponseBuffer,
        }
    }
}

impl fmt::Display for OutboundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A live connection as the router sees it: an identity and an emit operation
pub trait Connection: Send + Sync + 'static {
    fn id(&self) -> Uuid;

    fn emit(&self, event: OutboundEvent, payload: EncodedPayload) -> Result<()>;
}

/// Wire frame ready for the socket writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    Text(String),
    Binary(Vec<u8>),
}

impl OutboundFrame {
    /// Lay out `payload` under `event` according to its encoding
    pub fn encode(event: OutboundEvent, payload: &EncodedPayload) -> Result<Self> {
        let name = event.name();
        match payload.encoding() {
            Encoding::SelfDescribing => {
                let json = std::str::from_utf8(payload.bytes()).map_err(|e| {
                    BenchError::Connection {
                        message: format!("self-describing payload is not UTF-8: {}", e),
                    }
                })?;
                let mut text = String::with_capacity(json.len() + name.len() + 20);
                text.push_str(r#"{"event":""#);
                text.push_str(name);
                text.push_str(r#"","data":"#);
                text.push_str(json);
                text.push('}');
                Ok(OutboundFrame::Text(text))
            }
            Encoding::Compact => {
                let name_len = u8::try_from(name.len()).map_err(|_| BenchError::Connection {
                    message: format!("event name too long: {}", name),
                })?;
                let mut frame = Vec::with_capacity(1 + name.len() + payload.len());
                frame.push(name_len);
                frame.extend_from_slice(name.as_bytes());
                frame.extend_from_slice(payload.bytes());
                Ok(OutboundFrame::Binary(frame))
            }
        }
    }

    /// Split a binary frame into its event name and payload
    pub fn split_binary(frame: &[u8]) -> Option<(&str, &[u8])> {
        let (&name_len, rest) = frame.split_first()?;
        let name_len = usize::from(name_len);
        if rest.len() < name_len {
            return None;
        }
        let (name, payload) = rest.split_at(name_len);
        Some((std::str::from_utf8(name).ok()?, payload))
    }

    pub fn len(&self) -> usize {
        match self {
            OutboundFrame::Text(text) => text.len(),
            OutboundFrame::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<OutboundFrame> for warp::ws::Message {
    fn from(frame: OutboundFrame) -> Self {
        match frame {
            OutboundFrame::Text(text) => warp::ws::Message::text(text),
            OutboundFrame::Binary(bytes) => warp::ws::Message::binary(bytes),
        }
    }
}

#[derive(Deserialize)]
struct InboundEnvelope {
    event: String,
    #[serde(default)]
    #[allow(dead_code)]
    data: Option<IgnoredAny>,
}

/// Extract the event name from an inbound text frame
pub fn parse_inbound(text: &str) -> Option<Cow<'_, str>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') {
        return serde_json::from_str::<InboundEnvelope>(trimmed)
            .ok()
            .map(|envelope| Cow::Owned(envelope.event));
    }
    Some(Cow::Borrowed(trimmed))
}

/// WebSocket connection handle; frames are queued to the socket writer task
pub struct WsConnection {
    id: Uuid,
    sender: mpsc::UnboundedSender<OutboundFrame>,
}

impl WsConnection {
    pub fn new(sender: mpsc::UnboundedSender<OutboundFrame>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
        }
    }
}

impl Connection for WsConnection {
    fn id(&self) -> Uuid {
        self.id
    }

    fn emit(&self, event: OutboundEvent, payload: EncodedPayload) -> Result<()> {
        let frame = OutboundFrame::encode(event, &payload)?;
        self.sender
            .send(frame)
            .map_err(|_| BenchError::Connection {
                message: format!("Failed to emit {} to connection {}", event, self.id),
            })
    }
}
