//! Response interpretation
//!
//! Parsing of raw service responses and the handlers that turn them into a
//! success signal or domain values.

pub mod form;
pub mod handlers;
pub mod parser;
pub mod path;
pub mod value;

pub use handlers::{
    DefaultResponseHandler, LicenseKeyResponseHandler, ResponseHandler, UsageDataResponseHandler,
};
pub use parser::ResponseParser;
