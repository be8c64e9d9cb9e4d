//! Execution Layer
//!
//! Everything between a provider operation and the wire: parameter encoding,
//! request dispatch and the HTTP transport.

pub mod dispatcher;
pub mod encoding;
pub mod http;

pub use dispatcher::{Credentials, RequestDispatcher};
