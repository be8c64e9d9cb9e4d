//! HTTP client utilities
//!
//! Unified `reqwest::Client` construction and the default [`HttpTransport`]
//! built on top of it.

use super::transport::{HttpTransport, RawHttpResponse, RequestPayload, TransportRequest};
use crate::error::{ProvisionError, TransportError};
use crate::execution::http::headers::HttpHeaderBuilder;
use crate::types::HttpConfig;
use async_trait::async_trait;
use std::sync::OnceLock;

/// Build an HTTP client from HttpConfig
///
/// # Example
/// ```rust,ignore
/// use provision_licenses::types::HttpConfig;
/// use provision_licenses::execution::http::client::build_http_client_from_config;
///
/// let client = build_http_client_from_config(&HttpConfig::default())?;
/// ```
pub fn build_http_client_from_config(config: &HttpConfig) -> Result<reqwest::Client, ProvisionError> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| ProvisionError::Configuration(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    if !config.headers.is_empty() {
        let headers = HttpHeaderBuilder::new()
            .with_custom_headers(&config.headers)?
            .build();
        builder = builder.default_headers(headers);
    }

    builder
        .build()
        .map_err(|e| TransportError::Client(e.to_string()).into())
}

/// [`HttpTransport`] backed by `reqwest`.
///
/// The client is created on first use and reused for every later request.
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    config: HttpConfig,
    client: OnceLock<reqwest::Client>,
}

impl ReqwestTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    /// Use an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(client);
        Self {
            config: HttpConfig::default(),
            client: cell,
        }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn client(&self) -> Result<&reqwest::Client, TransportError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let built = build_http_client_from_config(&self.config).map_err(|e| match e {
            ProvisionError::Transport(inner) => inner,
            other => TransportError::Client(other.to_string()),
        })?;
        Ok(self.client.get_or_init(|| built))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawHttpResponse, TransportError> {
        let client = self.client()?;
        let builder = client
            .request(request.method.into(), &request.url)
            .headers(request.headers);
        let builder = match &request.payload {
            RequestPayload::Query(pairs) => builder.query(pairs),
            RequestPayload::Form(pairs) => builder.form(pairs),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RawHttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;
    use reqwest::header::HeaderMap;
    use std::time::Duration;

    fn request(method: HttpMethod, url: String, payload: RequestPayload) -> TransportRequest {
        TransportRequest {
            request_id: "test".to_string(),
            method,
            url,
            payload,
            headers: HeaderMap::new(),
        }
    }

    #[test]
    fn test_build_http_client_default() {
        assert!(build_http_client_from_config(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_build_http_client_with_timeout() {
        let config = HttpConfig {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            ..Default::default()
        };
        assert!(build_http_client_from_config(&config).is_ok());
    }

    #[test]
    fn test_build_http_client_rejects_invalid_header() {
        let mut config = HttpConfig::default();
        config
            .headers
            .insert("bad header".to_string(), "value".to_string());

        let result = build_http_client_from_config(&config);
        assert!(matches!(result, Err(ProvisionError::Configuration(_))));
    }

    #[tokio::test]
    async fn get_sends_query_pairs() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/licenses")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("license_key".into(), "LK 1".into()),
                mockito::Matcher::UrlEncoded("verbose".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{\"ok\":true}")
            .expect(1)
            .create_async()
            .await;

        let transport = ReqwestTransport::default();
        let response = transport
            .send(request(
                HttpMethod::Get,
                format!("{}/licenses", server.url()),
                RequestPayload::Query(vec![
                    ("license_key".into(), "LK 1".into()),
                    ("verbose".into(), "1".into()),
                ]),
            ))
            .await
            .expect("request should succeed");

        assert_eq!(response.status, 200);
        assert_eq!(response.header_line("content-type"), "application/json");
        assert_eq!(&response.body[..], b"{\"ok\":true}");
    }

    #[tokio::test]
    async fn post_sends_form_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/licenses")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(mockito::Matcher::UrlEncoded(
                "customer_email".into(),
                "a@x.com".into(),
            ))
            .with_status(201)
            .with_body("license_key=LK-1")
            .expect(1)
            .create_async()
            .await;

        let transport = ReqwestTransport::default();
        let response = transport
            .send(request(
                HttpMethod::Post,
                format!("{}/licenses", server.url()),
                RequestPayload::Form(vec![("customer_email".into(), "a@x.com".into())]),
            ))
            .await
            .expect("request should succeed");

        assert_eq!(response.status, 201);
        assert_eq!(&response.body[..], b"license_key=LK-1");
    }

    #[tokio::test]
    async fn error_statuses_are_returned_not_raised() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/licenses")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let transport = ReqwestTransport::default();
        let response = transport
            .send(request(
                HttpMethod::Delete,
                format!("{}/licenses", server.url()),
                RequestPayload::Form(vec![]),
            ))
            .await
            .expect("5xx is still a response");

        assert_eq!(response.status, 500);
        assert_eq!(response.reason_phrase(), "Internal Server Error");
    }

    #[tokio::test]
    async fn connection_failures_are_transport_errors() {
        let transport = ReqwestTransport::new(
            HttpConfig::builder()
                .connect_timeout(Some(Duration::from_millis(200)))
                .build(),
        );
        let result = transport
            .send(request(
                HttpMethod::Get,
                "http://127.0.0.1:9/unreachable".to_string(),
                RequestPayload::Query(vec![]),
            ))
            .await;

        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
