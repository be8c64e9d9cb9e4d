//! Operation input records.
//!
//! Records serialize with snake_case keys and omit absent optional fields, so
//! the serialized form is exactly the parameter set sent to an endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extra key/value pairs merged into the outbound request.
pub type ExtraParams = Map<String, Value>;

/// Service customer identifier, which backends return as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerIdentifier {
    Int(i64),
    Text(String),
}

impl From<i64> for CustomerIdentifier {
    fn from(value: i64) -> Self {
        CustomerIdentifier::Int(value)
    }
}

impl From<&str> for CustomerIdentifier {
    fn from(value: &str) -> Self {
        CustomerIdentifier::Text(value.to_string())
    }
}

impl From<String> for CustomerIdentifier {
    fn from(value: String) -> Self {
        CustomerIdentifier::Text(value)
    }
}

/// Parameters for creating a new license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateParams {
    /// Name of the customer
    pub customer_name: String,
    /// Email address of the customer
    pub customer_email: String,
    /// Company name of the customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Service customer identifier, if already created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_identifier: Option<CustomerIdentifier>,
    /// Secondary service identifier to use, if known up-front
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_identifier: Option<String>,
    /// Service package identifier, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_identifier: Option<String>,
    /// IP address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Any extra data to pass to the service endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraParams>,
}

impl CreateParams {
    pub fn new(customer_name: impl Into<String>, customer_email: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            ..Default::default()
        }
    }

    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    pub fn with_customer_identifier(mut self, id: impl Into<CustomerIdentifier>) -> Self {
        self.customer_identifier = Some(id.into());
        self
    }

    pub fn with_service_identifier(mut self, id: impl Into<String>) -> Self {
        self.service_identifier = Some(id.into());
        self
    }

    pub fn with_package_identifier(mut self, id: impl Into<String>) -> Self {
        self.package_identifier = Some(id.into());
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Parameters for moving a license key to another package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangePackageParams {
    pub license_key: String,
    pub package_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_identifier: Option<CustomerIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraParams>,
}

impl ChangePackageParams {
    pub fn new(license_key: impl Into<String>, package_identifier: impl Into<String>) -> Self {
        Self {
            license_key: license_key.into(),
            package_identifier: package_identifier.into(),
            ..Default::default()
        }
    }

    pub fn with_customer_identifier(mut self, id: impl Into<CustomerIdentifier>) -> Self {
        self.customer_identifier = Some(id.into());
        self
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Parameters for fetching usage stats of a license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetUsageParams {
    pub license_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_identifier: Option<CustomerIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraParams>,
}

impl GetUsageParams {
    pub fn new(license_key: impl Into<String>) -> Self {
        Self {
            license_key: license_key.into(),
            ..Default::default()
        }
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Parameters for reissuing an existing license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReissueParams {
    pub license_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_identifier: Option<CustomerIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraParams>,
}

impl ReissueParams {
    pub fn new(license_key: impl Into<String>) -> Self {
        Self {
            license_key: license_key.into(),
            ..Default::default()
        }
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Parameters for suspending a license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuspendParams {
    pub license_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_identifier: Option<CustomerIdentifier>,
    /// Reason for the suspension, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraParams>,
}

impl SuspendParams {
    pub fn new(license_key: impl Into<String>) -> Self {
        Self {
            license_key: license_key.into(),
            ..Default::default()
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Parameters for unsuspending a license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnsuspendParams {
    pub license_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_identifier: Option<CustomerIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraParams>,
}

impl UnsuspendParams {
    pub fn new(license_key: impl Into<String>) -> Self {
        Self {
            license_key: license_key.into(),
            ..Default::default()
        }
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Parameters for terminating (deleting) a license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminateParams {
    pub license_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_identifier: Option<CustomerIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraParams>,
}

impl TerminateParams {
    pub fn new(license_key: impl Into<String>) -> Self {
        Self {
            license_key: license_key.into(),
            ..Default::default()
        }
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Parameters for renewing a license key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenewParams {
    pub license_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_identifier: Option<CustomerIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_identifier: Option<String>,
    /// Billing cycle in months, if applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraParams>,
}

impl RenewParams {
    pub fn new(license_key: impl Into<String>) -> Self {
        Self {
            license_key: license_key.into(),
            ..Default::default()
        }
    }

    pub fn with_billing_cycle_months(mut self, months: u32) -> Self {
        self.billing_cycle_months = Some(months);
        self
    }
}
