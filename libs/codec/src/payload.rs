//! Encoding tags and encoded payloads

use bytes::Bytes;
use std::fmt;

/// Which encoder produced a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Every value tagged by field name (JSON)
    SelfDescribing,
    /// Positional field values only, no names
    Compact,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::SelfDescribing => "self-describing",
            Encoding::Compact => "compact",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bytes produced by one encode call, tagged with their encoding.
///
/// Owned by the call that produced it and never cached: every request
/// re-encodes the full dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    encoding: Encoding,
    bytes: Bytes,
}

impl EncodedPayload {
    pub fn new(encoding: Encoding, bytes: impl Into<Bytes>) -> Self {
        Self {
            encoding,
            bytes: bytes.into(),
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
