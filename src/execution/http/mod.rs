//! HTTP execution layer
//!
//! Transport abstraction, the default `reqwest` transport and header helpers.

pub mod client;
pub mod headers;
pub mod transport;

pub use client::{ReqwestTransport, build_http_client_from_config};
pub use headers::HttpHeaderBuilder;
pub use transport::{HttpTransport, RawHttpResponse, RequestPayload, TransportRequest};
