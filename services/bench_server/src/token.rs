//! Client token issuance
//!
//! Signs HS256 tokens that browser clients present when subscribing to the
//! broker directly. The publish pipeline never produces or consumes these.

use crate::error::Result;
use bench_config::TokenConfig;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            key: EncodingKey::from_secret(config.secret.as_bytes()),
            ttl: config.ttl(),
        }
    }

    /// Issue a token for a fresh throwaway subject (`user-<unix nanos>`)
    pub fn issue(&self) -> Result<String> {
        let now = Utc::now();
        let nanos = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
        self.issue_for(&format!("user-{}", nanos))
    }

    pub fn issue_for(&self, subject: &str) -> Result<String> {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        let claims = Claims {
            sub: subject.to_string(),
            exp: now.saturating_add(self.ttl.as_secs()),
        };
        Ok(jsonwebtoken::encode(&Header::default(), &claims, &self.key)?)
    }
}
