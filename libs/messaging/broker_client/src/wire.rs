//! Broker HTTP API wire format
//!
//! Request: `{"method":"publish","params":{"channel":..,"data":..}}`. JSON
//! payloads are spliced into `data` byte for byte; binary payloads are sent
//! base64-encoded in `b64data`.
//!
//! Reply: `{"result":{..}}` on success. Any non-null `error` member is a
//! rejection, whatever its shape; the usual form is
//! `{"error":{"code":..,"message":..}}`.

use crate::error::PublishError;
use crate::publisher::WirePayload;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::Value;

const COMMAND_PREFIX: &[u8] = br#"{"method":"publish","params":{"channel":"#;

#[derive(Deserialize)]
struct PublishReply {
    #[serde(default)]
    error: Option<Value>,
}

/// Build the request body for publishing `payload` to `channel`
pub(crate) fn publish_request(
    channel: &str,
    payload: &WirePayload,
) -> Result<Vec<u8>, PublishError> {
    // base64 grows binary payloads by a third
    let capacity = COMMAND_PREFIX.len() + channel.len() + payload.len() * 4 / 3 + 32;
    let mut body = Vec::with_capacity(capacity);
    body.extend_from_slice(COMMAND_PREFIX);
    serde_json::to_writer(&mut body, channel)
        .map_err(|e| PublishError::Encoding(e.to_string()))?;

    match payload {
        WirePayload::Json(json) => {
            if json.is_empty() {
                return Err(PublishError::Encoding("empty JSON payload".to_string()));
            }
            body.extend_from_slice(br#","data":"#);
            body.extend_from_slice(json);
        }
        WirePayload::Binary(bytes) => {
            body.extend_from_slice(br#","b64data":""#);
            body.extend_from_slice(STANDARD.encode(bytes).as_bytes());
            body.push(b'"');
        }
    }

    body.extend_from_slice(b"}}");
    Ok(body)
}

fn rejection_reason(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(fields) => {
            let message = fields.get("message").and_then(Value::as_str);
            match (fields.get("code"), message) {
                (Some(code), Some(message)) => format!("broker error {code}: {message}"),
                (Some(code), None) => format!("broker error {code}"),
                (None, Some(message)) => message.to_string(),
                (None, None) => error.to_string(),
            }
        }
        other => other.to_string(),
    }
}

/// Inspect a 2xx reply body for a broker-level error
pub(crate) fn check_reply(channel: &str, status: u16, body: &[u8]) -> Result<(), PublishError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    match serde_json::from_slice::<PublishReply>(body) {
        Ok(PublishReply { error: Some(error) }) => Err(PublishError::Rejected {
            channel: channel.to_string(),
            status,
            reason: rejection_reason(&error),
        }),
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::debug!("Ignoring non-JSON broker reply for '{}': {}", channel, e);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;

    fn json_payload(text: &'static str) -> WirePayload {
        WirePayload::Json(Bytes::from_static(text.as_bytes()))
    }

    fn reason_for(body: &[u8]) -> String {
        match check_reply("news", 200, body) {
            Err(PublishError::Rejected { status, reason, .. }) => {
                assert_eq!(status, 200);
                reason
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_json_payload_goes_into_data() {
        let body = publish_request("news", &json_payload(r#"[{"id":1}]"#)).unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            parsed,
            json!({"method": "publish", "params": {"channel": "news", "data": [{"id": 1}]}})
        );
    }

    #[test]
    fn test_binary_payload_goes_into_b64data() {
        let payload = WirePayload::Binary(Bytes::from_static(&[0xff, 0x00, 0x10]));
        let body = publish_request("news", &payload).unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["params"]["b64data"], "/wAQ");
        assert!(parsed["params"].get("data").is_none());
    }

    #[test]
    fn test_binary_payload_that_parses_as_json_stays_binary() {
        let payload = WirePayload::Binary(Bytes::from_static(b"123"));
        let body = publish_request("news", &payload).unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["params"]["b64data"], "MTIz");
        assert!(parsed["params"].get("data").is_none());
    }

    #[test]
    fn test_channel_is_escaped() {
        let body = publish_request(r#"a"b"#, &json_payload("{}")).unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["params"]["channel"], r#"a"b"#);
    }

    #[test]
    fn test_empty_json_payload_is_encoding_error() {
        let err = publish_request("news", &WirePayload::Json(Bytes::new())).unwrap_err();
        assert_eq!(err.kind(), "encoding");
    }

    #[test]
    fn test_reply_error_is_rejection() {
        let reason = reason_for(br#"{"error":{"code":102,"message":"unknown channel"}}"#);
        assert!(reason.contains("102"));
        assert!(reason.contains("unknown channel"));
    }

    #[test]
    fn test_reply_error_without_numeric_code_is_rejection() {
        assert_eq!(
            reason_for(br#"{"error":{"message":"internal server error"}}"#),
            "internal server error"
        );
        let reason = reason_for(br#"{"error":{"code":"100","message":"internal"}}"#);
        assert!(reason.contains("100") && reason.contains("internal"));
        assert_eq!(reason_for(br#"{"error":"permission denied"}"#), "permission denied");
    }

    #[test]
    fn test_empty_or_result_reply_is_success() {
        assert!(check_reply("news", 200, b"").is_ok());
        assert!(check_reply("news", 200, br#"{"result":{}}"#).is_ok());
        assert!(check_reply("news", 200, br#"{"error":null,"result":{}}"#).is_ok());
        assert!(check_reply("news", 200, b"{}").is_ok());
    }
}
