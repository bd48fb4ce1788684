//! # Benchmark Payload Codec
//!
//! ## Purpose
//!
//! Serialization dispatcher for the benchmark dataset. Produces one of two
//! competing encodings on demand, reading the shared dataset without mutating it:
//!
//! - **Self-describing**: JSON, every value tagged by field name. The baseline,
//!   larger and human-inspectable.
//! - **Compact**: positional tuples with no field names (see [`compact`]).
//!   Smaller, but decoders must know the field order out of band.
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → bench server (direct emit)
//!     ↑           ↓
//!  Dataset   EncodedPayload
//! ```
//!
//! Nothing here caches: each call re-encodes the full dataset, which is the
//! cost the benchmark measures.

pub mod compact;
pub mod error;
pub mod payload;
pub mod self_describing;

pub use compact::{decode_compact, encode_compact};
pub use error::{CodecError, Result};
pub use payload::{EncodedPayload, Encoding};
pub use self_describing::{decode_self_describing, encode_self_describing};

use types::{Dataset, Record};

/// Encode `dataset` with the requested encoding
pub fn encode(dataset: &Dataset, encoding: Encoding) -> Result<EncodedPayload> {
    match encoding {
        Encoding::SelfDescribing => encode_self_describing(dataset),
        Encoding::Compact => encode_compact(dataset),
    }
}

/// Decode a payload produced by [`encode`]
pub fn decode(payload: &EncodedPayload) -> Result<Vec<Record>> {
    match payload.encoding() {
        Encoding::SelfDescribing => decode_self_describing(payload.bytes()),
        Encoding::Compact => decode_compact(payload.bytes()),
    }
}
