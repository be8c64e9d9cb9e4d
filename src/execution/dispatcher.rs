//! Request dispatcher
//!
//! Turns `(method, url, params)` into a [`TransportRequest`]: flattens the
//! `extra` bag, picks query string or form body by method and attaches
//! credentials. The returned response is handed back untouched whatever its
//! status; interpreting it is the response handlers' job.

use super::encoding::{encode_params, merge_extra};
use super::http::{HttpHeaderBuilder, HttpTransport, RawHttpResponse, RequestPayload, TransportRequest};
use crate::error::ProvisionError;
use crate::types::HttpMethod;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Credentials attached to every dispatched request.
#[derive(Clone)]
pub enum Credentials {
    /// `Authorization: Bearer <token>`
    Bearer(SecretString),
    /// `Authorization: Basic base64(<username>:<password>)`
    Basic {
        username: String,
        password: SecretString,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Bearer(_) => f.write_str("Bearer([REDACTED])"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Sends provider requests through an [`HttpTransport`].
#[derive(Clone)]
pub struct RequestDispatcher {
    provider_id: String,
    transport: Arc<dyn HttpTransport>,
    credentials: Option<Credentials>,
    debug: bool,
}

impl RequestDispatcher {
    pub fn new(provider_id: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            provider_id: provider_id.into(),
            transport,
            credentials: None,
            debug: false,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Log request parameters and response bodies.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Send one request and return the raw response.
    ///
    /// Only failures to obtain a response at all are errors.
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        params: Map<String, Value>,
    ) -> Result<RawHttpResponse, ProvisionError> {
        let pairs = encode_params(&merge_extra(params));
        let request_id = uuid::Uuid::new_v4().to_string();

        if self.debug {
            tracing::debug!(
                target: "provision_licenses::http",
                provider = %self.provider_id,
                request_id = %request_id,
                params = ?pairs,
                "request parameters"
            );
        }

        let payload = if method.sends_query() {
            RequestPayload::Query(pairs)
        } else {
            RequestPayload::Form(pairs)
        };

        let request = TransportRequest {
            request_id: request_id.clone(),
            method,
            url: url.to_string(),
            payload,
            headers: self.headers()?,
        };

        tracing::debug!(
            target: "provision_licenses::http",
            provider = %self.provider_id,
            request_id = %request_id,
            method = %method,
            url = %url,
            "sending request"
        );

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(
                    target: "provision_licenses::http",
                    provider = %self.provider_id,
                    request_id = %request_id,
                    url = %url,
                    error = %error,
                    "request failed"
                );
                return Err(error.into());
            }
        };

        tracing::debug!(
            target: "provision_licenses::http",
            provider = %self.provider_id,
            request_id = %request_id,
            url = %url,
            status = response.status,
            "response received"
        );

        if self.debug {
            tracing::debug!(
                target: "provision_licenses::http",
                provider = %self.provider_id,
                request_id = %request_id,
                body = %String::from_utf8_lossy(&response.body),
                "response body"
            );
        }

        Ok(response)
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap, ProvisionError> {
        let builder = HttpHeaderBuilder::new();
        let builder = match &self.credentials {
            Some(Credentials::Bearer(token)) => builder.with_bearer_auth(token.expose_secret())?,
            Some(Credentials::Basic { username, password }) => {
                builder.with_basic_auth(username, password.expose_secret())?
            }
            None => builder,
        };
        Ok(builder.build())
    }
}

impl fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("provider_id", &self.provider_id)
            .field("credentials", &self.credentials)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
