//! Response parsing
//!
//! [`ResponseParser`] turns a [`RawHttpResponse`] into normalized data once
//! and remembers the outcome, failures included.

use super::form::parse_query;
use super::path::lookup;
use super::value::is_empty;
use crate::error::{CannotParseResponse, DebugData};
use crate::execution::http::RawHttpResponse;
use serde_json::Value;
use std::sync::OnceLock;

const JSON_MARKERS: [&str; 2] = ["application/json", "+json"];
const TEXT_MARKERS: [&str; 3] = ["text/html", "text/plain", "application/x-www-form-urlencoded"];

/// Lazily parsed view over one HTTP response.
#[derive(Debug)]
pub struct ResponseParser {
    response: RawHttpResponse,
    body: OnceLock<String>,
    data: OnceLock<Result<Option<Value>, CannotParseResponse>>,
}

impl ResponseParser {
    pub fn new(response: RawHttpResponse) -> Self {
        Self {
            response,
            body: OnceLock::new(),
            data: OnceLock::new(),
        }
    }

    pub fn response(&self) -> &RawHttpResponse {
        &self.response
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    /// Raw `Content-Type` header line, empty when absent.
    pub fn content_type(&self) -> String {
        self.response.header_line("content-type")
    }

    /// Trimmed response body text.
    pub fn body(&self) -> &str {
        self.body
            .get_or_init(|| String::from_utf8_lossy(&self.response.body).trim().to_string())
    }

    pub fn is_http_success(&self) -> bool {
        (200..300).contains(&self.response.status)
    }

    pub fn assert_http_success(&self) -> Result<(), CannotParseResponse> {
        if self.is_http_success() {
            return Ok(());
        }
        Err(CannotParseResponse::new(format!(
            "Service error: {} {}",
            self.response.status,
            self.response.reason_phrase()
        )))
    }

    /// Parsed data; `None` for a 204 response.
    ///
    /// The first call does the work, later calls return the same outcome.
    pub fn data(&self) -> Result<Option<&Value>, CannotParseResponse> {
        match self.data.get_or_init(|| self.parse()) {
            Ok(data) => Ok(data.as_ref()),
            Err(error) => Err(error.clone()),
        }
    }

    /// Value at `path` in the parsed data, `None` when absent or null.
    pub fn get(&self, path: &str) -> Result<Option<&Value>, CannotParseResponse> {
        Ok(self.data()?.and_then(|data| lookup(data, path)))
    }

    /// `http_code`, `content_type` and `body` of the response.
    pub fn debug_context(&self) -> DebugData {
        let mut debug = DebugData::new();
        debug.insert("http_code".into(), Value::from(self.response.status));
        debug.insert("content_type".into(), Value::String(self.content_type()));
        debug.insert("body".into(), Value::String(self.body().to_string()));
        debug
    }

    fn parse(&self) -> Result<Option<Value>, CannotParseResponse> {
        self.assert_http_success()?;

        if self.response.status == 204 {
            return Ok(None);
        }

        let content_type = self.content_type().to_ascii_lowercase();
        if JSON_MARKERS.iter().any(|marker| content_type.contains(marker)) {
            return self.parse_json().map(Some);
        }
        if content_type.trim().is_empty()
            || TEXT_MARKERS.iter().any(|marker| content_type.contains(marker))
        {
            return self.parse_text().map(Some);
        }

        Err(CannotParseResponse::new(
            "Unable to parse response of this content type",
        ))
    }

    fn parse_json(&self) -> Result<Value, CannotParseResponse> {
        match serde_json::from_slice::<Value>(&self.response.body) {
            Ok(value) if !is_empty(&value) => Ok(value),
            _ => Err(CannotParseResponse::new("Invalid JSON response")),
        }
    }

    fn parse_text(&self) -> Result<Value, CannotParseResponse> {
        let body = self.body();
        if body.is_empty() {
            return Err(CannotParseResponse::new("Empty text response"));
        }
        Ok(Value::Object(parse_query(body)))
    }
}
