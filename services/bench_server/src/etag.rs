//! ETag demo resource
//!
//! A fixed 500 KiB text body served with a strong ETag, so clients can compare
//! a full transfer against a `304 Not Modified` revalidation.

use bytes::Bytes;

const BODY_LEN: usize = 500 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EtagReply {
    NotModified,
    Full { body: Bytes },
}

#[derive(Debug, Clone)]
pub struct EtagDemo {
    body: Bytes,
    etag: String,
}

impl EtagDemo {
    pub fn new() -> Self {
        let body = Bytes::from("A".repeat(BODY_LEN));
        let etag = format!("\"{:x}\"", md5::compute(&body));
        Self { body, etag }
    }

    /// Quoted ETag value
    pub fn etag(&self) -> &str {
        &self.etag
    }

    pub fn respond(&self, if_none_match: Option<&str>) -> EtagReply {
        match if_none_match {
            Some(tag) if tag.trim() == self.etag => EtagReply::NotModified,
            _ => EtagReply::Full {
                body: self.body.clone(),
            },
        }
    }
}

impl Default for EtagDemo {
    fn default() -> Self {
        Self::new()
    }
}
