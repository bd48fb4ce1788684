//! # Compact Positional Encoding
//!
//! Every record and nested block is written as a tuple of its field values with
//! no field names. Encoder and decoder must agree on this exact order:
//!
//! ```text
//! record      = (id, name, email, bio, active, roles, metadata)
//! metadata    = (lastLogin, preferences)
//! preferences = (theme, notifications)
//! ```
//!
//! The tuples are serialized as MessagePack arrays, so every row carries its
//! element count and every value its type marker. Any MessagePack decoder can
//! read the payload given the field order above, and a decoder expecting a
//! different field count fails instead of misreading the bytes.

use crate::error::Result;
use crate::payload::{EncodedPayload, Encoding};
use serde::{Serialize, Serializer};
use tracing::trace;
use types::{Dataset, Metadata, Preferences, Record};

type PreferencesRow<'a> = (&'a str, bool);
type MetadataRow<'a> = (&'a str, PreferencesRow<'a>);
type RecordRow<'a> = (u64, &'a str, &'a str, &'a str, bool, &'a [String], MetadataRow<'a>);

type OwnedRecordRow = (u64, String, String, String, bool, Vec<String>, (String, (String, bool)));

fn record_row(record: &Record) -> RecordRow<'_> {
    let metadata = &record.metadata;
    (
        record.id,
        record.name.as_str(),
        record.email.as_str(),
        record.bio.as_str(),
        record.active,
        record.roles.as_slice(),
        (
            metadata.last_login.as_str(),
            (
                metadata.preferences.theme.as_str(),
                metadata.preferences.notifications,
            ),
        ),
    )
}

fn from_row(row: OwnedRecordRow) -> Record {
    let (id, name, email, bio, active, roles, (last_login, (theme, notifications))) = row;
    Record {
        id,
        name,
        email,
        bio,
        active,
        roles,
        metadata: Metadata {
            last_login,
            preferences: Preferences {
                theme,
                notifications,
            },
        },
    }
}

/// Serializes a dataset as a sequence of record rows without materializing them
struct Rows<'a>(&'a Dataset);

impl Serialize for Rows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(record_row))
    }
}

/// Encode the dataset as positional rows
pub fn encode_compact(dataset: &Dataset) -> Result<EncodedPayload> {
    let bytes = rmp_serde::to_vec(&Rows(dataset))?;
    trace!(records = dataset.len(), bytes = bytes.len(), "encoded compact payload");
    Ok(EncodedPayload::new(Encoding::Compact, bytes))
}

/// Decode positional rows back into records
pub fn decode_compact(bytes: &[u8]) -> Result<Vec<Record>> {
    let rows: Vec<OwnedRecordRow> = rmp_serde::from_slice(bytes)?;
    Ok(rows.into_iter().map(from_row).collect())
}
