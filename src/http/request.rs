//! Request decoding and correlation.
//!
//! # Responsibilities
//! - Decode the webhook body into a `Candidate`
//! - Assign a request ID (UUID v4) and propagate it to the response
//!
//! # Design Decisions
//! - Content-Type is not checked; any body that starts with a JSON object
//!   is accepted
//! - Only the first JSON value is read; anything after it is ignored
//! - A `null` body is an empty candidate
//! - Keys match case-insensitively, the last duplicate wins, and `null`
//!   values leave a field unset
//! - Missing fields decode to empty strings, unknown fields are ignored
//! - Request ID added as early as possible for tracing

use std::fmt;

use axum::http::{HeaderMap, HeaderName};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Webhook payload describing one match attempt.
///
/// Only `page` and `link` take part in matching. The other fields are
/// accepted so senders can include them, but nothing reads them yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub page: String,
    pub link: String,
    pub rule: String,
    /// The `type` field.
    pub kind: String,
    pub extra: String,
}

/// Error decoding a webhook body.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty body")]
    Empty,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Candidate {
    /// Decode the first JSON value of a request body.
    pub fn from_body(body: &[u8]) -> Result<Self, DecodeError> {
        serde_json::Deserializer::from_slice(body)
            .into_iter::<Candidate>()
            .next()
            .ok_or(DecodeError::Empty)?
            .map_err(DecodeError::from)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key.to_lowercase().as_str() {
            "page" => Some(&mut self.page),
            "link" => Some(&mut self.link),
            "rule" => Some(&mut self.rule),
            "type" => Some(&mut self.kind),
            "extra" => Some(&mut self.extra),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Candidate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CandidateVisitor)
    }
}

struct CandidateVisitor;

impl<'de> Visitor<'de> for CandidateVisitor {
    type Value = Candidate;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a candidate object or null")
    }

    fn visit_unit<E>(self) -> Result<Candidate, E>
    where
        E: de::Error,
    {
        Ok(Candidate::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Candidate, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut candidate = Candidate::default();
        while let Some(key) = map.next_key::<String>()? {
            match candidate.field_mut(&key) {
                Some(slot) => {
                    if let Some(value) = map.next_value::<Option<String>>()? {
                        *slot = value;
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(candidate)
    }
}

/// Layer that stamps `x-request-id` on requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Read the request ID set by [`set_request_id_layer`].
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full() {
        let body = br#"{"page":"p","link":"l","rule":"r","type":"t","extra":"e"}"#;
        let candidate = Candidate::from_body(body).unwrap();
        assert_eq!(candidate.page, "p");
        assert_eq!(candidate.link, "l");
        assert_eq!(candidate.rule, "r");
        assert_eq!(candidate.kind, "t");
        assert_eq!(candidate.extra, "e");
    }

    #[test]
    fn test_decode_partial_and_unknown_fields() {
        let candidate = Candidate::from_body(br#"{"link":"l","other":1}"#).unwrap();
        assert_eq!(candidate.page, "");
        assert_eq!(candidate.link, "l");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(Candidate::from_body(b""), Err(DecodeError::Empty)));
        assert!(matches!(Candidate::from_body(b"  \n"), Err(DecodeError::Empty)));
        assert!(matches!(Candidate::from_body(b"not json"), Err(DecodeError::Json(_))));
        assert!(Candidate::from_body(br#"{"page": 5}"#).is_err());
        assert!(Candidate::from_body(br#""page""#).is_err());
        assert!(Candidate::from_body(br#"[]"#).is_err());
        assert!(Candidate::from_body(br#"{"page":"p""#).is_err());
    }

    #[test]
    fn test_decode_null_body() {
        assert_eq!(Candidate::from_body(b"null").unwrap(), Candidate::default());
    }

    #[test]
    fn test_decode_ignores_trailing_data() {
        let candidate = Candidate::from_body(br#"{"page":"p","link":"l"} trailing"#).unwrap();
        assert_eq!(candidate.page, "p");
        assert_eq!(candidate.link, "l");

        let candidate = Candidate::from_body(b"{\"link\":\"a\"}\n{\"link\":\"b\"}").unwrap();
        assert_eq!(candidate.link, "a");
    }

    #[test]
    fn test_decode_keys_case_insensitive() {
        let candidate = Candidate::from_body(br#"{"Page":"p","LINK":"l","Type":"t"}"#).unwrap();
        assert_eq!(candidate.page, "p");
        assert_eq!(candidate.link, "l");
        assert_eq!(candidate.kind, "t");
    }

    #[test]
    fn test_decode_duplicate_and_null_values() {
        let candidate =
            Candidate::from_body(br#"{"link":"first","link":"second","page":"p","page":null}"#)
                .unwrap();
        assert_eq!(candidate.link, "second");
        assert_eq!(candidate.page, "p");
    }

    #[test]
    fn test_request_id_fallback() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
        headers.insert(X_REQUEST_ID, "abc".parse().unwrap());
        assert_eq!(request_id(&headers), "abc");
    }
}
