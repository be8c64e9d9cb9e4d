//! Operation output records.

use super::params::CustomerIdentifier;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of creating a license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateResult {
    pub license_key: String,
    /// Secondary service identifier, if any
    pub service_identifier: Option<String>,
    /// Service package identifier, if any
    pub package_identifier: Option<String>,
    /// Service customer identifier, if any
    pub customer_identifier: Option<CustomerIdentifier>,
    pub message: Option<String>,
}

impl CreateResult {
    pub fn new(license_key: impl Into<String>) -> Self {
        Self {
            license_key: license_key.into(),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Result of moving a license key to another package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangePackageResult {
    pub license_key: String,
    pub package_identifier: Option<String>,
    pub message: Option<String>,
}

impl ChangePackageResult {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Usage stats of a license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetUsageResult {
    /// Number of units used by this license
    pub units_consumed: Option<i64>,
    /// Detailed usage data
    pub usage_data: Option<Value>,
    pub message: Option<String>,
}

/// Result of reissuing a license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReissueResult {
    pub license_key: String,
    pub message: Option<String>,
}

/// Result of renewing a license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenewResult {
    pub license_key: String,
    pub package_identifier: Option<String>,
    pub message: Option<String>,
}

/// Result of operations that return nothing but an optional message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyResult {
    pub message: Option<String>,
}

impl EmptyResult {
    /// Result carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}
