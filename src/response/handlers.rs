//! Response handlers
//!
//! Each handler wraps a [`ResponseParser`] and decides what a successful
//! answer looks like for one kind of operation. Every failure, including a
//! failure to parse at all, comes out as [`ProvisionError::OperationFailed`]
//! carrying the response's debug context.

use super::parser::ResponseParser;
use super::value::{is_empty, scalar_to_string, to_integer};
use crate::error::{CannotParseResponse, DebugData, FailureReason, OperationFailed, ProvisionError};
use crate::execution::http::RawHttpResponse;
use crate::types::CustomerIdentifier;
use serde_json::Value;

/// Keys inspected, in order, for a success flag.
const RESULT_KEYS: [&str; 2] = ["success", "result"];

/// Common behaviour of all response handlers.
pub trait ResponseHandler {
    /// Kind of failure this handler reports.
    const FAILURE: FailureReason;

    fn parser(&self) -> &ResponseParser;

    /// Check that the response signals success.
    fn assert_response_success(&self) -> Result<(), ProvisionError>;

    /// Parsed response data, `None` for an empty 204 answer.
    fn data(&self) -> Result<Option<&Value>, ProvisionError> {
        self.parser()
            .data()
            .map_err(|cause| self.failure(cause, DebugData::new()))
    }

    /// Value at `path` in the parsed data.
    fn get(&self, path: &str) -> Result<Option<&Value>, ProvisionError> {
        self.parser()
            .get(path)
            .map_err(|cause| self.failure(cause, DebugData::new()))
    }

    fn body(&self) -> &str {
        self.parser().body()
    }

    /// Wrap `cause` with the response debug context plus `extra`.
    fn failure(&self, cause: CannotParseResponse, extra: DebugData) -> ProvisionError {
        let mut debug = self.parser().debug_context();
        debug.extend(extra);
        OperationFailed::new(Self::FAILURE, cause, debug).into()
    }
}

fn is_success_value(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_i64() == Some(1) && !number.is_f64(),
        Value::String(text) => matches!(text.as_str(), "success" | "ok" | "true" | "1"),
        _ => false,
    }
}

/// Reads a generic success flag from `success` or `result`.
#[derive(Debug)]
pub struct DefaultResponseHandler {
    parser: ResponseParser,
}

impl DefaultResponseHandler {
    pub fn new(response: RawHttpResponse) -> Self {
        Self {
            parser: ResponseParser::new(response),
        }
    }

    fn result_failure(&self, message: &str, key: Option<&str>, value: Option<&Value>) -> ProvisionError {
        let mut debug = DebugData::new();
        debug.insert("result_key".into(), key.map_or(Value::Null, Value::from));
        debug.insert("result_value".into(), value.cloned().unwrap_or(Value::Null));
        self.failure(CannotParseResponse::new(message), debug)
    }
}

impl ResponseHandler for DefaultResponseHandler {
    const FAILURE: FailureReason = FailureReason::Generic;

    fn parser(&self) -> &ResponseParser {
        &self.parser
    }

    /// Success when the response has no data, or when the first present of
    /// `success`/`result` is one of `"success"`, `"ok"`, `true`, `"true"`,
    /// `1` or `"1"`.
    fn assert_response_success(&self) -> Result<(), ProvisionError> {
        let data = self.parser.data().map_err(|cause| {
            let mut debug = DebugData::new();
            debug.insert("result_key".into(), Value::Null);
            debug.insert("result_value".into(), Value::Null);
            self.failure(cause, debug)
        })?;

        if data.is_none() {
            return Ok(());
        }

        for key in RESULT_KEYS {
            let Some(value) = self.get(key)? else {
                continue;
            };
            if is_success_value(value) {
                return Ok(());
            }
            return Err(self.result_failure("Operation failed", Some(key), Some(value)));
        }

        Err(self.result_failure("Unable to parse result from service response", None, None))
    }
}

/// Extracts a license key and identifiers.
#[derive(Debug)]
pub struct LicenseKeyResponseHandler {
    parser: ResponseParser,
}

impl LicenseKeyResponseHandler {
    pub const LICENSE_KEY: &'static str = "license_key";

    pub fn new(response: RawHttpResponse) -> Self {
        Self {
            parser: ResponseParser::new(response),
        }
    }

    /// Non-empty scalar at `property`, in string form.
    pub fn get_license_key(&self, property: &str) -> Result<String, ProvisionError> {
        let value = self.get(property)?;

        match value {
            Some(found) if !is_empty(found) => {
                if let Some(key) = scalar_to_string(found) {
                    return Ok(key);
                }
            }
            _ => {}
        }

        let mut debug = DebugData::new();
        debug.insert(property.to_string(), value.cloned().unwrap_or(Value::Null));
        Err(self.failure(
            CannotParseResponse::new(format!(
                "Unable to parse valid {property} from service response"
            )),
            debug,
        ))
    }

    pub fn get_service_identifier(&self) -> Result<Option<String>, ProvisionError> {
        Ok(self.get("service_identifier")?.and_then(scalar_to_string))
    }

    pub fn get_package_identifier(&self) -> Result<Option<String>, ProvisionError> {
        Ok(self.get("package_identifier")?.and_then(scalar_to_string))
    }

    pub fn get_customer_identifier(&self) -> Result<Option<CustomerIdentifier>, ProvisionError> {
        Ok(self.get("customer_identifier")?.and_then(|value| match value {
            Value::Number(number) => number.as_i64().map(CustomerIdentifier::Int),
            Value::String(text) => Some(CustomerIdentifier::Text(text.clone())),
            _ => None,
        }))
    }
}

impl ResponseHandler for LicenseKeyResponseHandler {
    const FAILURE: FailureReason = FailureReason::MissingLicenseKey;

    fn parser(&self) -> &ResponseParser {
        &self.parser
    }

    fn assert_response_success(&self) -> Result<(), ProvisionError> {
        self.get_license_key(Self::LICENSE_KEY).map(|_| ())
    }
}

/// Extracts a consumed-units counter.
#[derive(Debug)]
pub struct UsageDataResponseHandler {
    parser: ResponseParser,
}

impl UsageDataResponseHandler {
    pub const UNITS_CONSUMED: &'static str = "units_consumed";

    pub fn new(response: RawHttpResponse) -> Self {
        Self {
            parser: ResponseParser::new(response),
        }
    }

    /// Numeric value at `property`, truncated to an integer.
    pub fn get_units_consumed(&self, property: &str) -> Result<i64, ProvisionError> {
        let value = self.get(property)?;

        if let Some(units) = value.and_then(to_integer) {
            return Ok(units);
        }

        let mut debug = DebugData::new();
        debug.insert(property.to_string(), value.cloned().unwrap_or(Value::Null));
        Err(self.failure(
            CannotParseResponse::new(format!("Unable to parse {property} from service response")),
            debug,
        ))
    }
}

impl ResponseHandler for UsageDataResponseHandler {
    const FAILURE: FailureReason = FailureReason::MissingUsageData;

    fn parser(&self) -> &ResponseParser {
        &self.parser
    }

    fn assert_response_success(&self) -> Result<(), ProvisionError> {
        self.get_units_consumed(Self::UNITS_CONSUMED).map(|_| ())
    }
}
