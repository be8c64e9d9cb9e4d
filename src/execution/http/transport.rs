//! HTTP transport abstraction.
//!
//! Providers never talk to `reqwest` directly. They hand a [`TransportRequest`]
//! to an injectable [`HttpTransport`] and get back the raw status, headers and
//! body. A transport must not judge the HTTP status: non-2xx answers are
//! returned as ordinary responses and interpreted by the response handlers.

use crate::error::TransportError;
use crate::types::HttpMethod;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Where the request parameters travel. A request carries exactly one of the
/// two encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    /// Parameters appended to the URL query string.
    Query(Vec<(String, String)>),
    /// Parameters sent as an `application/x-www-form-urlencoded` body.
    Form(Vec<(String, String)>),
}

impl RequestPayload {
    pub fn pairs(&self) -> &[(String, String)] {
        match self {
            RequestPayload::Query(pairs) | RequestPayload::Form(pairs) => pairs,
        }
    }
}

/// Transport-level request data.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub request_id: String,
    pub method: HttpMethod,
    pub url: String,
    pub payload: RequestPayload,
    pub headers: HeaderMap,
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct RawHttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawHttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Canonical reason phrase for the status code, empty when unknown.
    pub fn reason_phrase(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("")
    }

    /// All values of a header joined with `", "`, empty when absent.
    pub fn header_line(&self, name: &str) -> String {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Custom HTTP transport.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<RawHttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_line_joins_repeated_values() {
        let response = RawHttpResponse::new(200)
            .with_header("content-type", "text/plain")
            .with_header("Content-Type", "charset=utf-8");

        assert_eq!(response.header_line("content-type"), "text/plain, charset=utf-8");
        assert_eq!(response.header_line("x-missing"), "");
    }

    #[test]
    fn reason_phrase_follows_status() {
        assert_eq!(RawHttpResponse::new(404).reason_phrase(), "Not Found");
        assert_eq!(RawHttpResponse::new(204).reason_phrase(), "No Content");
        assert_eq!(RawHttpResponse::new(299).reason_phrase(), "");
    }
}
