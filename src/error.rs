//! Error Handling Module
//!
//! Every operation returns [`ProvisionError`] on failure. Low-level response
//! parsing problems ([`CannotParseResponse`]) never reach callers directly:
//! response handlers wrap them into [`OperationFailed`] together with a debug
//! bundle describing the offending response.
//!
//! # Example
//!
//! ```rust,ignore
//! use provision_licenses::error::{ErrorKind, ProvisionError};
//!
//! let error = ProvisionError::NotConfigured("No suspend endpoint set in this configuration".into());
//! assert_eq!(error.kind(), ErrorKind::NotConfigured);
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

/// Structured diagnostic context attached to failures.
pub type DebugData = Map<String, Value>;

/// Result type for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Coarse classification of a [`ProvisionError`], for callers that branch on
/// the failure without matching the full enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service answered but signalled failure, or its answer was unusable.
    OperationFailed,
    /// The response did not contain a valid license key.
    ResponseMissingLicenseKey,
    /// The response did not contain usable usage data.
    ResponseMissingUsageData,
    /// A provider step rejected the request.
    ProvisionFunction,
    /// The operation has no endpoint in this configuration.
    NotConfigured,
    /// The backend does not support the operation.
    NotSupported,
    /// The configuration is invalid.
    Configuration,
    /// The request never produced an HTTP response.
    Transport,
}

/// Unable to parse the given response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CannotParseResponse {
    message: String,
}

impl CannotParseResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Which expectation a failed response did not meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The response indicates that the operation failed in some way.
    Generic,
    /// Response was invalid and/or did not contain a license key.
    MissingLicenseKey,
    /// Response was invalid and/or did not contain usage data.
    MissingUsageData,
}

/// Response indicates that the operation failed in some way.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct OperationFailed {
    pub reason: FailureReason,
    pub message: String,
    /// `http_code`, `content_type`, `body` and the offending key/value.
    pub debug: DebugData,
    #[source]
    pub cause: CannotParseResponse,
}

impl OperationFailed {
    pub fn new(reason: FailureReason, cause: CannotParseResponse, debug: DebugData) -> Self {
        Self {
            reason,
            message: cause.message().to_string(),
            debug,
            cause,
        }
    }
}

/// Failures that never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("{0}")]
    Other(String),
}

/// Provisioning error
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    OperationFailed(#[from] OperationFailed),

    /// Generic domain failure raised by a provider step.
    #[error("{message}")]
    ProvisionFunction { message: String, data: DebugData },

    #[error("{0}")]
    NotConfigured(String),

    #[error("{0}")]
    NotSupported(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ProvisionError {
    /// Create a provider-step failure without extra data.
    pub fn provision_function(message: impl Into<String>) -> Self {
        Self::ProvisionFunction {
            message: message.into(),
            data: DebugData::new(),
        }
    }

    /// Create a provider-step failure carrying diagnostic data.
    pub fn provision_function_with_data(message: impl Into<String>, data: DebugData) -> Self {
        Self::ProvisionFunction {
            message: message.into(),
            data,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OperationFailed(failed) => match failed.reason {
                FailureReason::Generic => ErrorKind::OperationFailed,
                FailureReason::MissingLicenseKey => ErrorKind::ResponseMissingLicenseKey,
                FailureReason::MissingUsageData => ErrorKind::ResponseMissingUsageData,
            },
            Self::ProvisionFunction { .. } => ErrorKind::ProvisionFunction,
            Self::NotConfigured(_) => ErrorKind::NotConfigured,
            Self::NotSupported(_) => ErrorKind::NotSupported,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Diagnostic data attached to the error, if any.
    pub fn debug_data(&self) -> Option<&DebugData> {
        match self {
            Self::OperationFailed(failed) => Some(&failed.debug),
            Self::ProvisionFunction { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Whether this failure comes from the remote service's answer rather than
    /// from configuration or connectivity.
    pub fn is_operation_failure(&self) -> bool {
        matches!(self, Self::OperationFailed(_))
    }
}

impl From<validator::ValidationErrors> for ProvisionError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Configuration(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn operation_failed_keeps_cause_and_message() {
        let cause = CannotParseResponse::new("Operation failed");
        let error: ProvisionError =
            OperationFailed::new(FailureReason::Generic, cause.clone(), DebugData::new()).into();

        assert_eq!(error.to_string(), "Operation failed");
        assert_eq!(error.kind(), ErrorKind::OperationFailed);
        assert!(error.is_operation_failure());
        assert_eq!(
            error.source().map(|s| s.to_string()),
            Some("Operation failed".to_string())
        );
    }

    #[test]
    fn failure_reason_maps_to_specialised_kinds() {
        let missing_key: ProvisionError = OperationFailed::new(
            FailureReason::MissingLicenseKey,
            CannotParseResponse::new("x"),
            DebugData::new(),
        )
        .into();
        let missing_usage: ProvisionError = OperationFailed::new(
            FailureReason::MissingUsageData,
            CannotParseResponse::new("x"),
            DebugData::new(),
        )
        .into();

        assert_eq!(missing_key.kind(), ErrorKind::ResponseMissingLicenseKey);
        assert_eq!(missing_usage.kind(), ErrorKind::ResponseMissingUsageData);
    }

    #[test]
    fn provision_function_carries_data() {
        let mut data = DebugData::new();
        data.insert("response".into(), Value::String("oops".into()));
        let error = ProvisionError::provision_function_with_data("Unknown Provider API Error", data);

        assert_eq!(error.kind(), ErrorKind::ProvisionFunction);
        assert_eq!(error.to_string(), "Unknown Provider API Error");
        assert_eq!(error.debug_data().unwrap()["response"], "oops");
    }

    #[test]
    fn configuration_errors_are_prefixed() {
        let error = ProvisionError::Configuration("create_endpoint_url is required".into());
        assert_eq!(
            error.to_string(),
            "Configuration error: create_endpoint_url is required"
        );
        assert!(error.debug_data().is_none());
    }
}
