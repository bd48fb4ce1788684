//! # Synthetic Dataset Generator
//!
//! Builds the fixed-shape benchmark payload. Every text field is derived from
//! the record identifier so payload size is reproducible; the only
//! non-deterministic value is the generation timestamp, stamped once and shared
//! by every record.

use crate::errors::DatasetError;
use crate::record::{Dataset, Metadata, Preferences, Record};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

/// Record count used by the benchmark server unless configured otherwise
pub const DEFAULT_DATASET_SIZE: usize = 5000;

const ROLES: [&str; 3] = ["user", "editor", "viewer"];
const THEME: &str = "dark";

/// Generate `count` records stamped with the current wall-clock time
pub fn generate(count: usize) -> Result<Dataset, DatasetError> {
    generate_at(count, Utc::now())
}

/// Generate `count` records stamped with `generated_at`
pub fn generate_at(count: usize, generated_at: DateTime<Utc>) -> Result<Dataset, DatasetError> {
    if count == 0 {
        return Err(DatasetError::Empty { requested: count });
    }
    let last_login = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let records: Vec<Record> = (0..count as u64)
        .map(|id| build_record(id, &last_login))
        .collect();

    debug!(count = records.len(), %last_login, "generated dataset");
    Ok(Dataset::from_records(records))
}

fn build_record(id: u64, last_login: &str) -> Record {
    Record {
        id,
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        bio: format!(
            "This is a bio for user {id}. It contains some random text to increase the payload size. Lorem ipsum dolor sit amet."
        ),
        active: id % 2 == 0,
        roles: ROLES.iter().map(|r| r.to_string()).collect(),
        metadata: Metadata {
            last_login: last_login.to_string(),
            preferences: Preferences {
                theme: THEME.to_string(),
                notifications: true,
            },
        },
    }
}
