//! cPanel manage2 provider
//!
//! Every manage2 command is a `GET /<command>.cgi` with `output=json`.
//! License status codes: 1 active, 2 expired, 4 suspended.

use super::config::CpanelConfiguration;
use crate::error::{DebugData, ProvisionError};
use crate::execution::RequestDispatcher;
use crate::execution::dispatcher::Credentials;
use crate::execution::http::{HttpTransport, RawHttpResponse, ReqwestTransport};
use crate::response::path::lookup;
use crate::response::value::{scalar_to_string, to_integer};
use crate::traits::LicenseProvider;
use crate::types::{
    ChangePackageParams, ChangePackageResult, CreateParams, CreateResult, EmptyResult,
    GetUsageParams, GetUsageResult, HttpMethod, ProviderInfo, ReissueParams, ReissueResult,
    SuspendParams, TerminateParams, UnsuspendParams,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use validator::Validate;

const ADD_LICENSE: &str = "XMLlicenseAdd";
const LICENSE_INFO: &str = "XMLlicenseInfo";
const UPDATE_PACKAGE: &str = "XMLpackageUpdate";
const EXPIRE_LICENSE: &str = "XMLlicenseExpire";
const REACTIVATE_LICENSE: &str = "XMLlicenseReActivate";

const ACTIVE_STATUS: i64 = 1;

/// Resell, provision and manage cPanel licenses.
#[derive(Debug, Clone)]
pub struct CpanelProvider {
    configuration: CpanelConfiguration,
    dispatcher: RequestDispatcher,
}

impl CpanelProvider {
    pub const ID: &'static str = "cpanel";

    pub fn new(configuration: CpanelConfiguration) -> Result<Self, ProvisionError> {
        Self::with_transport(configuration, Arc::new(ReqwestTransport::default()))
    }

    pub fn with_transport(
        configuration: CpanelConfiguration,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ProvisionError> {
        configuration.validate()?;

        let dispatcher = RequestDispatcher::new(Self::ID, transport)
            .with_credentials(Some(Credentials::Basic {
                username: configuration.username.clone(),
                password: configuration.password.clone(),
            }))
            .with_debug(configuration.debug);

        Ok(Self {
            configuration,
            dispatcher,
        })
    }

    pub fn configuration(&self) -> &CpanelConfiguration {
        &self.configuration
    }

    /// Run a manage2 command; `None` when the service answers with an
    /// empty body.
    pub async fn make_request(
        &self,
        command: &str,
        mut query: Map<String, Value>,
    ) -> Result<Option<Value>, ProvisionError> {
        query.insert("output".into(), Value::String("json".into()));

        let url = self.configuration.command_url(command);
        let response = self.dispatcher.send(HttpMethod::Get, &url, query).await?;
        check_status(&response)?;

        let body = String::from_utf8_lossy(&response.body);
        if body.trim().is_empty() {
            return Ok(None);
        }
        parse_response_data(&body).map(Some)
    }

    async fn get_license(&self, license_key: &str) -> Result<Option<Value>, ProvisionError> {
        let mut query = Map::new();
        query.insert("liscid".into(), Value::String(license_key.to_string()));
        self.make_request(LICENSE_INFO, query).await
    }

    async fn is_license_active(&self, license_key: &str) -> Result<bool, ProvisionError> {
        let data = self.get_license(license_key).await?;
        let status = data
            .as_ref()
            .and_then(|data| lookup(data, &format!("licenses.L{license_key}.status")));

        Ok(match status {
            Some(Value::Bool(flag)) => *flag,
            Some(value) => to_integer(value) == Some(ACTIVE_STATUS),
            None => false,
        })
    }

    async fn expire_license(
        &self,
        license_key: &str,
        message: &str,
    ) -> Result<EmptyResult, ProvisionError> {
        let mut query = Map::new();
        query.insert("liscid".into(), Value::String(license_key.to_string()));
        self.make_request(EXPIRE_LICENSE, query).await?;
        Ok(EmptyResult::new(message))
    }

    async fn run_create(&self, params: CreateParams) -> Result<CreateResult, ProvisionError> {
        let package_identifier = required_package(params.package_identifier.as_deref())?;

        let mut query = Map::new();
        query.insert("packageid".into(), Value::String(package_identifier.to_string()));
        if let Some(ip) = &params.ip {
            query.insert("ip".into(), Value::String(ip.clone()));
        }
        if let Some(group_id) = self.configuration.group_id.filter(|id| *id != 0) {
            query.insert("groupid".into(), Value::from(group_id));
        }

        let data = self.make_request(ADD_LICENSE, query).await?;
        let license_key = data
            .as_ref()
            .and_then(|data| lookup(data, "licenseid"))
            .and_then(scalar_to_string)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                let mut debug = DebugData::new();
                debug.insert("response".into(), data.clone().unwrap_or(Value::Null));
                ProvisionError::provision_function_with_data(
                    "License ID missing from provider response",
                    debug,
                )
            })?;

        Ok(CreateResult {
            license_key,
            package_identifier: Some(package_identifier.to_string()),
            ..Default::default()
        }
        .with_message("License created"))
    }

    async fn run_change_package(
        &self,
        params: ChangePackageParams,
    ) -> Result<ChangePackageResult, ProvisionError> {
        let package_identifier = required_package(Some(&params.package_identifier))?;

        let license = self.get_license(&params.license_key).await?;
        let ip = license.as_ref().and_then(|data| {
            lookup(data, &format!("licenses.L{}.ip", params.license_key)).cloned()
        });

        let mut query = Map::new();
        if let Some(ip) = ip {
            query.insert("ip".into(), ip);
        }
        query.insert(
            "newpackageid".into(),
            Value::String(package_identifier.to_string()),
        );
        self.make_request(UPDATE_PACKAGE, query).await?;

        Ok(ChangePackageResult {
            license_key: params.license_key,
            package_identifier: Some(package_identifier.to_string()),
            message: None,
        }
        .with_message("Package changed"))
    }

    async fn run_suspend(&self, params: SuspendParams) -> Result<EmptyResult, ProvisionError> {
        if !self.is_license_active(&params.license_key).await? {
            return Ok(EmptyResult::new("License already suspended"));
        }
        self.expire_license(&params.license_key, "License suspended")
            .await
    }

    async fn run_unsuspend(&self, params: UnsuspendParams) -> Result<EmptyResult, ProvisionError> {
        if self.is_license_active(&params.license_key).await? {
            return Ok(EmptyResult::new("License already active"));
        }

        let mut query = Map::new();
        query.insert("liscid".into(), Value::String(params.license_key));
        self.make_request(REACTIVATE_LICENSE, query).await?;
        Ok(EmptyResult::new("License unsuspended"))
    }

    async fn run_terminate(&self, params: TerminateParams) -> Result<EmptyResult, ProvisionError> {
        if !self.is_license_active(&params.license_key).await? {
            return Ok(EmptyResult::new("License already cancelled"));
        }
        self.expire_license(&params.license_key, "License cancelled")
            .await
    }
}

fn required_package(package_identifier: Option<&str>) -> Result<&str, ProvisionError> {
    package_identifier
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ProvisionError::provision_function("Package identifier is required!"))
}

fn check_status(response: &RawHttpResponse) -> Result<(), ProvisionError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    let mut data = DebugData::new();
    data.insert("http_code".into(), Value::from(response.status));
    data.insert(
        "body".into(),
        Value::String(String::from_utf8_lossy(&response.body).trim().to_string()),
    );
    Err(ProvisionError::provision_function_with_data(
        format!(
            "Service error: {} {}",
            response.status,
            response.reason_phrase()
        ),
        data,
    ))
}

/// Decode a manage2 answer, surfacing API-level errors.
fn parse_response_data(body: &str) -> Result<Value, ProvisionError> {
    let parsed = match serde_json::from_str::<Value>(body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => {
            let mut data = DebugData::new();
            data.insert("response".into(), Value::String(body.to_string()));
            return Err(ProvisionError::provision_function_with_data(
                "Unknown Provider API Error",
                data,
            ));
        }
    };

    if let Some(message) = response_error_message(&parsed) {
        let mut data = DebugData::new();
        data.insert("response".into(), parsed);
        return Err(ProvisionError::provision_function_with_data(message, data));
    }

    Ok(parsed)
}

/// `reason` of an answer whose `status` is zero, null or absent.
fn response_error_message(data: &Value) -> Option<String> {
    let status = lookup(data, "status");
    if !status.is_none_or(loosely_zero) {
        return None;
    }

    let reason = lookup(data, "reason").and_then(scalar_to_string)?;
    if reason == "Empty license." {
        return Some("License does not exist".to_string());
    }
    Some(reason)
}

fn loosely_zero(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.trim().parse::<f64>().is_ok_and(|n| n == 0.0),
        _ => false,
    }
}

fn log_outcome<T>(operation: &str, result: &Result<T, ProvisionError>) {
    match result {
        Ok(_) => tracing::info!(
            target: "provision_licenses::provider",
            provider = CpanelProvider::ID,
            operation,
            "operation succeeded"
        ),
        Err(error) => tracing::warn!(
            target: "provision_licenses::provider",
            provider = CpanelProvider::ID,
            operation,
            kind = ?error.kind(),
            error = %error,
            "operation failed"
        ),
    }
}

#[async_trait]
impl LicenseProvider for CpanelProvider {
    fn about(&self) -> ProviderInfo {
        ProviderInfo::new(
            "CPanel",
            "Resell, provision and manage cPanel licenses with manage2",
        )
        .with_logo_url("https://api.upmind.io/images/logos/provision/cpanel-logo.png")
    }

    async fn create(&self, params: CreateParams) -> Result<CreateResult, ProvisionError> {
        let result = self.run_create(params).await;
        log_outcome("create", &result);
        result
    }

    async fn change_package(
        &self,
        params: ChangePackageParams,
    ) -> Result<ChangePackageResult, ProvisionError> {
        let result = self.run_change_package(params).await;
        log_outcome("change_package", &result);
        result
    }

    async fn get_usage_data(
        &self,
        params: GetUsageParams,
    ) -> Result<GetUsageResult, ProvisionError> {
        let result = self
            .get_license(&params.license_key)
            .await
            .map(|usage_data| GetUsageResult {
                usage_data,
                ..Default::default()
            });
        log_outcome("get_usage_data", &result);
        result
    }

    async fn reissue(&self, _params: ReissueParams) -> Result<ReissueResult, ProvisionError> {
        Err(ProvisionError::NotSupported(
            "Operation not supported".to_string(),
        ))
    }

    async fn suspend(&self, params: SuspendParams) -> Result<EmptyResult, ProvisionError> {
        let result = self.run_suspend(params).await;
        log_outcome("suspend", &result);
        result
    }

    async fn unsuspend(&self, params: UnsuspendParams) -> Result<EmptyResult, ProvisionError> {
        let result = self.run_unsuspend(params).await;
        log_outcome("unsuspend", &result);
        result
    }

    async fn terminate(&self, params: TerminateParams) -> Result<EmptyResult, ProvisionError> {
        let result = self.run_terminate(params).await;
        log_outcome("terminate", &result);
        result
    }
}
