//! Providers
//!
//! Concrete [`LicenseProvider`](crate::traits::LicenseProvider) backends.
//!
//! - [`generic`]: endpoints, methods and credentials taken from configuration
//! - [`cpanel`]: cPanel manage2 reseller API

pub mod cpanel;
mod flags;
pub mod generic;
