//! Self-describing (JSON) encoding of the dataset

use crate::error::Result;
use crate::payload::{EncodedPayload, Encoding};
use tracing::trace;
use types::{Dataset, Record};

/// Encode the dataset as a JSON array of named-field objects
pub fn encode_self_describing(dataset: &Dataset) -> Result<EncodedPayload> {
    let bytes = serde_json::to_vec(dataset)?;
    trace!(records = dataset.len(), bytes = bytes.len(), "encoded self-describing payload");
    Ok(EncodedPayload::new(Encoding::SelfDescribing, bytes))
}

pub fn decode_self_describing(bytes: &[u8]) -> Result<Vec<Record>> {
    Ok(serde_json::from_slice(bytes)?)
}
