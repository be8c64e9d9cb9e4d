//! Core Types
//!
//! Input and output records of the provisioning operations, provider metadata
//! and HTTP configuration.

pub mod http;
pub mod params;
pub mod results;

pub use http::{HttpConfig, HttpConfigBuilder, HttpMethod};
pub use params::{
    ChangePackageParams, CreateParams, CustomerIdentifier, ExtraParams, GetUsageParams,
    ReissueParams, RenewParams, SuspendParams, TerminateParams, UnsuspendParams,
};
pub use results::{
    ChangePackageResult, CreateResult, EmptyResult, GetUsageResult, ReissueResult, RenewResult,
};

use serde::{Deserialize, Serialize};

/// Descriptive metadata about a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub description: String,
    pub logo_url: Option<String>,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            logo_url: None,
        }
    }

    pub fn with_logo_url(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }
}

/// Metadata about the software-licenses category every provider belongs to.
pub fn category_info() -> ProviderInfo {
    ProviderInfo::new(
        "Software Licenses",
        "Provision category for various providers of software licenses",
    )
}
