//! provision-licenses
//!
//! A single provisioning interface for software license keys. Every backend,
//! whether a configurable set of REST endpoints or a vendor licensing API,
//! implements [`LicenseProvider`] and therefore exposes the same lifecycle
//! operations: create, change package, usage data, reissue, suspend,
//! unsuspend, terminate and renew.
//!
//! # Example
//!
//! ```rust,ignore
//! use provision_licenses::prelude::*;
//!
//! let configuration = GenericConfiguration::builder()
//!     .access_token("secret")
//!     .create_endpoint("https://licenses.example.com/create", HttpMethod::Post)
//!     .build()?;
//!
//! let provider = GenericProvider::new(configuration);
//! let created = provider
//!     .create(CreateParams::new("Jane Doe", "jane@example.com").with_package_identifier("pro"))
//!     .await?;
//! println!("license key: {}", created.license_key);
//! ```
#![deny(unsafe_code)]

pub mod error;
pub mod execution;
pub mod providers;
pub mod response;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, ProvisionError, Result};
pub use traits::LicenseProvider;

/// Commonly used types.
pub mod prelude {
    pub use crate::error::{ErrorKind, FailureReason, OperationFailed, ProvisionError};
    pub use crate::execution::http::{HttpTransport, RawHttpResponse, ReqwestTransport};
    pub use crate::providers::cpanel::{CpanelConfiguration, CpanelProvider};
    pub use crate::providers::generic::{
        EndpointConfig, GenericConfiguration, GenericProvider, Operation,
    };
    pub use crate::traits::LicenseProvider;
    pub use crate::types::{
        ChangePackageParams, ChangePackageResult, CreateParams, CreateResult, CustomerIdentifier,
        EmptyResult, GetUsageParams, GetUsageResult, HttpConfig, HttpMethod, ProviderInfo,
        ReissueParams, ReissueResult, RenewParams, RenewResult, SuspendParams, TerminateParams,
        UnsuspendParams,
    };
}
