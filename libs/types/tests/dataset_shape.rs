//! Wire shape of the generated dataset as clients see it in JSON

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

#[test]
fn test_record_json_shape() {
    let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    let dataset = types::generate_at(2, at).unwrap();
    let value = serde_json::to_value(&dataset).unwrap();

    let records = value.as_array().expect("dataset serializes as an array");
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[1],
        json!({
            "id": 1,
            "name": "User 1",
            "email": "user1@example.com",
            "bio": "This is a bio for user 1. It contains some random text to increase the payload size. Lorem ipsum dolor sit amet.",
            "active": false,
            "roles": ["user", "editor", "viewer"],
            "metadata": {
                "lastLogin": "2024-05-06T07:08:09Z",
                "preferences": {"theme": "dark", "notifications": true}
            }
        })
    );
}

#[test]
fn test_every_record_shares_the_timestamp() {
    let dataset = types::generate(50).unwrap();
    let value: Value = serde_json::to_value(&dataset).unwrap();

    let first = &value[0]["metadata"]["lastLogin"];
    assert!(first.is_string());
    assert!(value
        .as_array()
        .unwrap()
        .iter()
        .all(|record| &record["metadata"]["lastLogin"] == first));
}

#[test]
fn test_dataset_round_trips_through_json() {
    let dataset = types::generate(10).unwrap();
    let text = serde_json::to_string(&dataset).unwrap();
    let back: types::Dataset = serde_json::from_str(&text).unwrap();
    assert_eq!(back, dataset);
}
