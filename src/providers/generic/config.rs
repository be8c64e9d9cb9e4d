//! Generic provider configuration
//!
//! A [`GenericConfiguration`] names one endpoint per operation. It is built
//! either from the flat key set a host application stores
//! ([`GenericConfigurationData`]) or with [`GenericConfigurationBuilder`], and
//! is validated once at construction.

use crate::error::ProvisionError;
use crate::providers::flags::loose_bool;
use crate::types::HttpMethod;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use validator::{Validate, ValidateUrl, ValidationError};

/// Operations a generic configuration can route to an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    ChangePackage,
    GetUsageData,
    Reissue,
    Suspend,
    Unsuspend,
    Terminate,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Create,
        Operation::ChangePackage,
        Operation::GetUsageData,
        Operation::Reissue,
        Operation::Suspend,
        Operation::Unsuspend,
        Operation::Terminate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::ChangePackage => "change_package",
            Operation::GetUsageData => "get_usage_data",
            Operation::Reissue => "reissue",
            Operation::Suspend => "suspend",
            Operation::Unsuspend => "unsuspend",
            Operation::Terminate => "terminate",
        }
    }

    /// Methods an endpoint for this operation may use.
    pub fn allowed_methods(&self) -> &'static [HttpMethod] {
        match self {
            Operation::Create => &[
                HttpMethod::Post,
                HttpMethod::Put,
                HttpMethod::Patch,
                HttpMethod::Get,
            ],
            _ => &HttpMethod::ALL,
        }
    }

    /// Error message returned when the operation has no endpoint.
    pub fn not_configured_message(&self) -> &'static str {
        match self {
            Operation::Create => "No create endpoint set in this configuration",
            Operation::ChangePackage => "No change package endpoint set in this configuration",
            Operation::GetUsageData => "No usage data endpoint set in this configuration",
            Operation::Reissue => "Reissuance of this license is not possible",
            Operation::Suspend => "No suspend endpoint set in this configuration",
            Operation::Unsuspend => "No unsuspend endpoint set in this configuration",
            Operation::Terminate => "No terminate endpoint set in this configuration",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how one operation is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    url: String,
    http_method: HttpMethod,
    enabled: bool,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>, http_method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            http_method,
            enabled: true,
        }
    }

    /// An operation this configuration does not offer.
    pub fn disabled() -> Self {
        Self {
            url: String::new(),
            http_method: HttpMethod::Post,
            enabled: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn checked(operation: Operation, url: &str, http_method: HttpMethod) -> Result<Self, ProvisionError> {
        if !url.validate_url() {
            return Err(ProvisionError::Configuration(format!(
                "{operation} endpoint URL '{url}' is not a valid URL"
            )));
        }
        check_method(operation, http_method)?;
        Ok(Self::new(url, http_method))
    }
}

fn check_method(operation: Operation, http_method: HttpMethod) -> Result<(), ProvisionError> {
    let allowed = operation.allowed_methods();
    if allowed.contains(&http_method) {
        return Ok(());
    }
    let names = allowed
        .iter()
        .map(|method| method.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ProvisionError::Configuration(format!(
        "{operation} endpoint HTTP method must be one of: {names}"
    )))
}

fn parse_method(operation: Operation, raw: &str) -> Result<HttpMethod, ProvisionError> {
    let http_method = raw.parse::<HttpMethod>()?;
    check_method(operation, http_method)?;
    Ok(http_method)
}

/// Flat configuration keys as stored by a host application.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_required_endpoints"))]
pub struct GenericConfigurationData {
    /// Access bearer token to send in requests
    #[serde(default, deserialize_with = "secret_or_none")]
    pub access_token: Option<SecretString>,
    /// Endpoint which creates a license key
    #[validate(url)]
    pub create_endpoint_url: String,
    pub create_endpoint_http_method: String,

    #[serde(default, deserialize_with = "loose_bool")]
    pub has_change_package: bool,
    #[serde(default, deserialize_with = "blank_or_none")]
    #[validate(url)]
    pub change_package_endpoint_url: Option<String>,
    #[serde(default, deserialize_with = "blank_or_none")]
    pub change_package_endpoint_http_method: Option<String>,

    #[serde(default, deserialize_with = "loose_bool")]
    pub has_usage_data: bool,
    #[serde(default, deserialize_with = "blank_or_none")]
    #[validate(url)]
    pub get_usage_data_endpoint_url: Option<String>,
    #[serde(default, deserialize_with = "blank_or_none")]
    pub get_usage_data_endpoint_http_method: Option<String>,

    #[serde(default, deserialize_with = "loose_bool")]
    pub has_reissue: bool,
    #[serde(default, deserialize_with = "blank_or_none")]
    #[validate(url)]
    pub reissue_endpoint_url: Option<String>,
    #[serde(default, deserialize_with = "blank_or_none")]
    pub reissue_endpoint_http_method: Option<String>,

    /// Governs both suspend and unsuspend
    #[serde(default, deserialize_with = "loose_bool")]
    pub has_suspension: bool,
    #[serde(default, deserialize_with = "blank_or_none")]
    #[validate(url)]
    pub suspend_endpoint_url: Option<String>,
    #[serde(default, deserialize_with = "blank_or_none")]
    pub suspend_endpoint_http_method: Option<String>,
    #[serde(default, deserialize_with = "blank_or_none")]
    #[validate(url)]
    pub unsuspend_endpoint_url: Option<String>,
    #[serde(default, deserialize_with = "blank_or_none")]
    pub unsuspend_endpoint_http_method: Option<String>,

    #[serde(default, deserialize_with = "loose_bool")]
    pub has_termination: bool,
    #[serde(default, deserialize_with = "blank_or_none")]
    #[validate(url)]
    pub terminate_endpoint_url: Option<String>,
    #[serde(default, deserialize_with = "blank_or_none")]
    pub terminate_endpoint_http_method: Option<String>,

    /// Log request parameters and response bodies
    #[serde(default, deserialize_with = "loose_bool")]
    pub debug: bool,
}

impl GenericConfigurationData {
    /// `(operation, flag, url, method)` for every optional operation.
    fn optional_endpoints(&self) -> [(Operation, bool, Option<&str>, Option<&str>); 6] {
        [
            (
                Operation::ChangePackage,
                self.has_change_package,
                self.change_package_endpoint_url.as_deref(),
                self.change_package_endpoint_http_method.as_deref(),
            ),
            (
                Operation::GetUsageData,
                self.has_usage_data,
                self.get_usage_data_endpoint_url.as_deref(),
                self.get_usage_data_endpoint_http_method.as_deref(),
            ),
            (
                Operation::Reissue,
                self.has_reissue,
                self.reissue_endpoint_url.as_deref(),
                self.reissue_endpoint_http_method.as_deref(),
            ),
            (
                Operation::Suspend,
                self.has_suspension,
                self.suspend_endpoint_url.as_deref(),
                self.suspend_endpoint_http_method.as_deref(),
            ),
            (
                Operation::Unsuspend,
                self.has_suspension,
                self.unsuspend_endpoint_url.as_deref(),
                self.unsuspend_endpoint_http_method.as_deref(),
            ),
            (
                Operation::Terminate,
                self.has_termination,
                self.terminate_endpoint_url.as_deref(),
                self.terminate_endpoint_http_method.as_deref(),
            ),
        ]
    }
}

fn validate_required_endpoints(data: &GenericConfigurationData) -> Result<(), ValidationError> {
    if data.create_endpoint_http_method.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message("create_endpoint_http_method is required".into()));
    }

    for (operation, enabled, url, method) in data.optional_endpoints() {
        if !enabled {
            continue;
        }
        if url.is_none() {
            return Err(ValidationError::new("required_if").with_message(
                format!("{operation} endpoint URL is required when the endpoint is enabled").into(),
            ));
        }
        if method.is_none() {
            return Err(ValidationError::new("required_if").with_message(
                format!("{operation} endpoint HTTP method is required when the endpoint is enabled")
                    .into(),
            ));
        }
    }
    Ok(())
}

/// Validated, immutable endpoint configuration.
#[derive(Debug, Clone)]
pub struct GenericConfiguration {
    access_token: Option<SecretString>,
    create: EndpointConfig,
    change_package: EndpointConfig,
    get_usage_data: EndpointConfig,
    reissue: EndpointConfig,
    suspend: EndpointConfig,
    unsuspend: EndpointConfig,
    terminate: EndpointConfig,
    debug: bool,
}

impl GenericConfiguration {
    pub fn builder() -> GenericConfigurationBuilder {
        GenericConfigurationBuilder::default()
    }

    /// Build from a JSON object of flat configuration keys.
    pub fn from_value(value: Value) -> Result<Self, ProvisionError> {
        let data: GenericConfigurationData = serde_json::from_value(value)
            .map_err(|e| ProvisionError::Configuration(e.to_string()))?;
        Self::try_from(data)
    }

    pub fn endpoint(&self, operation: Operation) -> &EndpointConfig {
        match operation {
            Operation::Create => &self.create,
            Operation::ChangePackage => &self.change_package,
            Operation::GetUsageData => &self.get_usage_data,
            Operation::Reissue => &self.reissue,
            Operation::Suspend => &self.suspend,
            Operation::Unsuspend => &self.unsuspend,
            Operation::Terminate => &self.terminate,
        }
    }

    fn endpoint_mut(&mut self, operation: Operation) -> &mut EndpointConfig {
        match operation {
            Operation::Create => &mut self.create,
            Operation::ChangePackage => &mut self.change_package,
            Operation::GetUsageData => &mut self.get_usage_data,
            Operation::Reissue => &mut self.reissue,
            Operation::Suspend => &mut self.suspend,
            Operation::Unsuspend => &mut self.unsuspend,
            Operation::Terminate => &mut self.terminate,
        }
    }

    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token.as_ref()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    fn with_create(create: EndpointConfig) -> Self {
        Self {
            access_token: None,
            create,
            change_package: EndpointConfig::disabled(),
            get_usage_data: EndpointConfig::disabled(),
            reissue: EndpointConfig::disabled(),
            suspend: EndpointConfig::disabled(),
            unsuspend: EndpointConfig::disabled(),
            terminate: EndpointConfig::disabled(),
            debug: false,
        }
    }
}

impl TryFrom<GenericConfigurationData> for GenericConfiguration {
    type Error = ProvisionError;

    fn try_from(data: GenericConfigurationData) -> Result<Self, Self::Error> {
        data.validate()?;

        let create_method = parse_method(Operation::Create, &data.create_endpoint_http_method)?;
        let mut configuration = Self::with_create(EndpointConfig::checked(
            Operation::Create,
            &data.create_endpoint_url,
            create_method,
        )?);

        for (operation, enabled, url, method) in data.optional_endpoints() {
            let method = method
                .map(|raw| parse_method(operation, raw))
                .transpose()?;
            if !enabled {
                continue;
            }
            let (Some(url), Some(method)) = (url, method) else {
                return Err(ProvisionError::Configuration(format!(
                    "{operation} endpoint is enabled but incomplete"
                )));
            };
            *configuration.endpoint_mut(operation) = EndpointConfig::checked(operation, url, method)?;
        }

        configuration.access_token = checked_token(data.access_token)?;
        configuration.debug = data.debug;
        Ok(configuration)
    }
}

/// The token must fit in an `Authorization: Bearer` header.
fn checked_token(token: Option<SecretString>) -> Result<Option<SecretString>, ProvisionError> {
    if let Some(secret) = &token {
        HeaderValue::from_str(&format!("Bearer {}", secret.expose_secret())).map_err(|_| {
            ProvisionError::Configuration(
                "access_token is not a valid HTTP header value".to_string(),
            )
        })?;
    }
    Ok(token)
}

/// Builder for [`GenericConfiguration`].
#[derive(Debug, Default)]
pub struct GenericConfigurationBuilder {
    access_token: Option<SecretString>,
    endpoints: Vec<(Operation, String, HttpMethod)>,
    debug: bool,
}

impl GenericConfigurationBuilder {
    pub fn access_token<S: Into<String>>(mut self, token: S) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn create_endpoint(self, url: impl Into<String>, http_method: HttpMethod) -> Self {
        self.endpoint(Operation::Create, url, http_method)
    }

    /// Route `operation` to `url`. Setting an operation twice keeps the last.
    pub fn endpoint(
        mut self,
        operation: Operation,
        url: impl Into<String>,
        http_method: HttpMethod,
    ) -> Self {
        self.endpoints.retain(|(existing, _, _)| *existing != operation);
        self.endpoints.push((operation, url.into(), http_method));
        self
    }

    /// Route suspend and unsuspend together.
    pub fn suspension_endpoints(
        self,
        suspend_url: impl Into<String>,
        suspend_method: HttpMethod,
        unsuspend_url: impl Into<String>,
        unsuspend_method: HttpMethod,
    ) -> Self {
        self.endpoint(Operation::Suspend, suspend_url, suspend_method)
            .endpoint(Operation::Unsuspend, unsuspend_url, unsuspend_method)
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn build(self) -> Result<GenericConfiguration, ProvisionError> {
        let Some((_, create_url, create_method)) = self
            .endpoints
            .iter()
            .find(|(operation, _, _)| *operation == Operation::Create)
        else {
            return Err(ProvisionError::Configuration(
                "create endpoint is required".to_string(),
            ));
        };

        let mut configuration = GenericConfiguration::with_create(EndpointConfig::checked(
            Operation::Create,
            create_url,
            *create_method,
        )?);

        for (operation, url, method) in &self.endpoints {
            if *operation == Operation::Create {
                continue;
            }
            *configuration.endpoint_mut(*operation) = EndpointConfig::checked(*operation, url, *method)?;
        }

        if configuration.suspend.is_enabled() != configuration.unsuspend.is_enabled() {
            return Err(ProvisionError::Configuration(
                "suspend and unsuspend endpoints must be configured together".to_string(),
            ));
        }

        configuration.access_token = checked_token(self.access_token)?;
        configuration.debug = self.debug;
        Ok(configuration)
    }
}

fn secret_or_none<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_or_none(deserializer)?.map(SecretString::from))
}

fn blank_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "create_endpoint_url": "https://licenses.example.com/create",
            "create_endpoint_http_method": "post"
        })
    }

    fn with(mut base: Value, extra: Value) -> Value {
        let (Value::Object(base_map), Value::Object(extra_map)) = (&mut base, extra) else {
            panic!("objects expected");
        };
        base_map.extend(extra_map);
        base
    }

    #[test]
    fn minimal_configuration_only_creates() {
        let configuration = GenericConfiguration::from_value(minimal()).unwrap();

        let create = configuration.endpoint(Operation::Create);
        assert!(create.is_enabled());
        assert_eq!(create.http_method(), HttpMethod::Post);
        assert_eq!(create.url(), "https://licenses.example.com/create");

        for operation in &Operation::ALL[1..] {
            assert!(!configuration.endpoint(*operation).is_enabled(), "{operation}");
        }
        assert!(configuration.access_token().is_none());
        assert!(!configuration.debug());
    }

    #[test]
    fn full_configuration() {
        let configuration = GenericConfiguration::from_value(with(
            minimal(),
            json!({
                "access_token": "t0ken",
                "has_change_package": true,
                "change_package_endpoint_url": "https://licenses.example.com/package",
                "change_package_endpoint_http_method": "PATCH",
                "has_usage_data": "1",
                "get_usage_data_endpoint_url": "https://licenses.example.com/usage",
                "get_usage_data_endpoint_http_method": "get",
                "has_reissue": 1,
                "reissue_endpoint_url": "https://licenses.example.com/reissue",
                "reissue_endpoint_http_method": "put",
                "has_suspension": "true",
                "suspend_endpoint_url": "https://licenses.example.com/suspend",
                "suspend_endpoint_http_method": "post",
                "unsuspend_endpoint_url": "https://licenses.example.com/unsuspend",
                "unsuspend_endpoint_http_method": "post",
                "has_termination": true,
                "terminate_endpoint_url": "https://licenses.example.com/terminate",
                "terminate_endpoint_http_method": "delete",
                "debug": "0"
            }),
        ))
        .unwrap();

        for operation in Operation::ALL {
            assert!(configuration.endpoint(operation).is_enabled(), "{operation}");
        }
        assert_eq!(
            configuration.endpoint(Operation::GetUsageData).http_method(),
            HttpMethod::Get
        );
        assert_eq!(
            configuration.endpoint(Operation::Terminate).http_method(),
            HttpMethod::Delete
        );
        assert_eq!(configuration.access_token().unwrap().expose_secret(), "t0ken");
        assert!(!configuration.debug());
    }

    #[test]
    fn create_cannot_use_delete() {
        let error = GenericConfiguration::from_value(with(
            minimal(),
            json!({"create_endpoint_http_method": "delete"}),
        ))
        .unwrap_err();

        assert!(matches!(error, ProvisionError::Configuration(_)));
        assert!(error.to_string().contains("POST, PUT, PATCH, GET"));
    }

    #[test]
    fn unknown_methods_are_rejected() {
        let error = GenericConfiguration::from_value(with(
            minimal(),
            json!({"create_endpoint_http_method": "options"}),
        ))
        .unwrap_err();
        assert!(matches!(error, ProvisionError::Configuration(_)));
    }

    #[test]
    fn enabled_endpoints_need_url_and_method() {
        let error = GenericConfiguration::from_value(with(
            minimal(),
            json!({
                "has_suspension": true,
                "suspend_endpoint_url": "https://licenses.example.com/suspend",
                "suspend_endpoint_http_method": "post"
            }),
        ))
        .unwrap_err();

        assert!(matches!(error, ProvisionError::Configuration(_)));
        assert!(error.to_string().contains("unsuspend endpoint URL is required"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let error = GenericConfiguration::from_value(with(
            minimal(),
            json!({
                "has_termination": true,
                "terminate_endpoint_url": "https://licenses.example.com/terminate",
                "terminate_endpoint_http_method": "  "
            }),
        ))
        .unwrap_err();
        assert!(error.to_string().contains("terminate endpoint HTTP method is required"));
    }

    #[test]
    fn disabled_endpoints_are_ignored_when_blank() {
        let configuration = GenericConfiguration::from_value(with(
            minimal(),
            json!({
                "has_reissue": false,
                "reissue_endpoint_url": "",
                "reissue_endpoint_http_method": null
            }),
        ))
        .unwrap();
        assert!(!configuration.endpoint(Operation::Reissue).is_enabled());
    }

    #[test]
    fn malformed_urls_are_rejected() {
        let error = GenericConfiguration::from_value(with(
            minimal(),
            json!({"create_endpoint_url": "not a url"}),
        ))
        .unwrap_err();
        assert!(matches!(error, ProvisionError::Configuration(_)));

        let error = GenericConfiguration::from_value(with(
            minimal(),
            json!({"has_reissue": 7}),
        ))
        .unwrap_err();
        assert!(matches!(error, ProvisionError::Configuration(_)));
    }

    #[test]
    fn missing_create_endpoint_is_rejected() {
        let error = GenericConfiguration::from_value(json!({"has_reissue": false})).unwrap_err();
        assert!(matches!(error, ProvisionError::Configuration(_)));
    }

    #[test]
    fn debug_output_never_shows_the_token() {
        let configuration = GenericConfiguration::from_value(with(
            minimal(),
            json!({"access_token": "hunter2"}),
        ))
        .unwrap();
        assert!(!format!("{configuration:?}").contains("hunter2"));
    }

    #[test]
    fn tokens_that_cannot_be_sent_are_rejected() {
        let error = GenericConfiguration::from_value(with(
            minimal(),
            json!({"access_token": "abc\ndef"}),
        ))
        .unwrap_err();
        assert!(matches!(error, ProvisionError::Configuration(_)));
        assert!(!error.to_string().contains("abc"));

        let built = GenericConfiguration::builder()
            .access_token("abc\ndef")
            .create_endpoint("https://licenses.example.com/create", HttpMethod::Post)
            .build();
        assert!(matches!(built, Err(ProvisionError::Configuration(_))));
    }

    #[test]
    fn builder_configures_endpoints() {
        let configuration = GenericConfiguration::builder()
            .access_token("secret")
            .create_endpoint("https://x.test/create", HttpMethod::Post)
            .endpoint(Operation::Reissue, "https://x.test/reissue", HttpMethod::Post)
            .suspension_endpoints(
                "https://x.test/suspend",
                HttpMethod::Post,
                "https://x.test/unsuspend",
                HttpMethod::Post,
            )
            .debug(true)
            .build()
            .unwrap();

        assert!(configuration.endpoint(Operation::Reissue).is_enabled());
        assert!(configuration.endpoint(Operation::Unsuspend).is_enabled());
        assert!(!configuration.endpoint(Operation::Terminate).is_enabled());
        assert!(configuration.debug());
    }

    #[test]
    fn builder_requires_create() {
        let error = GenericConfiguration::builder()
            .endpoint(Operation::Terminate, "https://x.test/t", HttpMethod::Delete)
            .build()
            .unwrap_err();
        assert_eq!(error.to_string(), "Configuration error: create endpoint is required");
    }

    #[test]
    fn builder_rejects_half_configured_suspension() {
        let error = GenericConfiguration::builder()
            .create_endpoint("https://x.test/create", HttpMethod::Post)
            .endpoint(Operation::Suspend, "https://x.test/suspend", HttpMethod::Post)
            .build()
            .unwrap_err();
        assert!(matches!(error, ProvisionError::Configuration(_)));
    }

    #[test]
    fn builder_checks_methods() {
        let error = GenericConfiguration::builder()
            .create_endpoint("https://x.test/create", HttpMethod::Delete)
            .build()
            .unwrap_err();
        assert!(matches!(error, ProvisionError::Configuration(_)));
    }
}
