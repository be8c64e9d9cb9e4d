//! HTTP Headers Utility
//!
//! Common utilities for building request headers across all providers.

use crate::error::ProvisionError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    /// Create a new header builder
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add Bearer token authorization
    pub fn with_bearer_auth(self, token: &str) -> Result<Self, ProvisionError> {
        self.with_authorization(format!("Bearer {token}"))
    }

    /// Add Basic authorization from a username and password
    pub fn with_basic_auth(self, username: &str, password: &str) -> Result<Self, ProvisionError> {
        let credentials = STANDARD.encode(format!("{username}:{password}"));
        self.with_authorization(format!("Basic {credentials}"))
    }

    fn with_authorization(mut self, value: String) -> Result<Self, ProvisionError> {
        let mut auth_value = HeaderValue::from_str(&value).map_err(|e| {
            ProvisionError::Configuration(format!("Invalid authorization credentials: {e}"))
        })?;
        auth_value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, auth_value);
        Ok(self)
    }

    /// Add a custom header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ProvisionError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ProvisionError::Configuration(format!("Invalid header name '{name}': {e}"))
        })?;
        self.headers.insert(
            header_name,
            HeaderValue::from_str(value).map_err(|e| {
                ProvisionError::Configuration(format!("Invalid header value '{value}': {e}"))
            })?,
        );
        Ok(self)
    }

    /// Add multiple custom headers from a HashMap
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, ProvisionError> {
        for (key, value) in custom_headers {
            self = self.with_header(key, value)?;
        }
        Ok(self)
    }

    /// Build the final HeaderMap
    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
