//! Record schema
//!
//! JSON field names are camelCase (`lastLogin`), matching what browser
//! consumers of the self-describing encoding expect.

use serde::{Deserialize, Serialize};

/// One user record in the benchmark payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub active: bool,
    pub roles: Vec<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// RFC 3339 timestamp, stamped once when the dataset is generated
    pub last_login: String,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: String,
    pub notifications: bool,
}

/// Ordered, immutable collection of records.
///
/// Serializes as a plain sequence. There are no mutating accessors: once
/// generated, a dataset is only ever read (usually through an `Arc<Dataset>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            id: 7,
            name: "User 7".to_string(),
            email: "user7@example.com".to_string(),
            bio: "bio".to_string(),
            active: false,
            roles: vec!["user".to_string()],
            metadata: Metadata {
                last_login: "2026-01-01T00:00:00Z".to_string(),
                preferences: Preferences {
                    theme: "dark".to_string(),
                    notifications: true,
                },
            },
        }
    }

    #[test]
    fn test_json_field_names_are_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["metadata"]["lastLogin"], "2026-01-01T00:00:00Z");
        assert_eq!(json["metadata"]["preferences"]["notifications"], true);
        assert!(json["metadata"].get("last_login").is_none());
    }

    #[test]
    fn test_dataset_serializes_as_sequence() {
        let dataset = Dataset::from_records(vec![sample(), sample()]);
        let json = serde_json::to_value(&dataset).unwrap();
        assert_eq!(json.as_array().map(|a| a.len()), Some(2));
    }
}
