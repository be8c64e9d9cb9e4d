//! Generic provider
//!
//! Sends each operation to the endpoint its [`GenericConfiguration`] names and
//! reads the answer with the matching response handler.

use super::config::{GenericConfiguration, Operation};
use crate::error::ProvisionError;
use crate::execution::RequestDispatcher;
use crate::execution::dispatcher::Credentials;
use crate::execution::encoding::to_param_map;
use crate::execution::http::{HttpTransport, RawHttpResponse, ReqwestTransport};
use crate::response::{
    DefaultResponseHandler, LicenseKeyResponseHandler, ResponseHandler, UsageDataResponseHandler,
};
use crate::traits::LicenseProvider;
use crate::types::{
    ChangePackageParams, ChangePackageResult, CreateParams, CreateResult, EmptyResult,
    GetUsageParams, GetUsageResult, ProviderInfo, ReissueParams, ReissueResult, SuspendParams,
    TerminateParams, UnsuspendParams,
};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// A highly-configurable provider for REST licensing backends.
#[derive(Debug, Clone)]
pub struct GenericProvider {
    configuration: GenericConfiguration,
    dispatcher: RequestDispatcher,
}

impl GenericProvider {
    pub const ID: &'static str = "generic";

    /// Create a provider using the default `reqwest` transport.
    pub fn new(configuration: GenericConfiguration) -> Self {
        Self::with_transport(configuration, Arc::new(ReqwestTransport::default()))
    }

    pub fn with_transport(
        configuration: GenericConfiguration,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let dispatcher = RequestDispatcher::new(Self::ID, transport)
            .with_credentials(configuration.access_token().cloned().map(Credentials::Bearer))
            .with_debug(configuration.debug());
        Self {
            configuration,
            dispatcher,
        }
    }

    pub fn configuration(&self) -> &GenericConfiguration {
        &self.configuration
    }

    /// Send `params` to the endpoint of `operation`.
    ///
    /// Fails with [`ProvisionError::NotConfigured`] before any network call
    /// when the operation has no endpoint.
    async fn call<P: Serialize + Sync>(
        &self,
        operation: Operation,
        params: &P,
    ) -> Result<RawHttpResponse, ProvisionError> {
        let endpoint = self.configuration.endpoint(operation);
        if !endpoint.is_enabled() {
            tracing::info!(
                target: "provision_licenses::provider",
                provider = Self::ID,
                operation = %operation,
                "operation not configured"
            );
            return Err(ProvisionError::NotConfigured(
                operation.not_configured_message().to_string(),
            ));
        }

        let params = to_param_map(params)?;
        self.dispatcher
            .send(endpoint.http_method(), endpoint.url(), params)
            .await
    }
}

fn log_outcome<T>(operation: Operation, result: &Result<T, ProvisionError>) {
    match result {
        Ok(_) => tracing::info!(
            target: "provision_licenses::provider",
            provider = GenericProvider::ID,
            operation = %operation,
            "operation succeeded"
        ),
        Err(error) => tracing::warn!(
            target: "provision_licenses::provider",
            provider = GenericProvider::ID,
            operation = %operation,
            kind = ?error.kind(),
            error = %error,
            "operation failed"
        ),
    }
}

impl GenericProvider {
    async fn run_create(&self, params: CreateParams) -> Result<CreateResult, ProvisionError> {
        let response = self.call(Operation::Create, &params).await?;
        let handler = LicenseKeyResponseHandler::new(response);

        Ok(CreateResult {
            license_key: handler.get_license_key(LicenseKeyResponseHandler::LICENSE_KEY)?,
            service_identifier: handler
                .get_service_identifier()?
                .or(params.service_identifier),
            package_identifier: handler
                .get_package_identifier()?
                .or(params.package_identifier),
            customer_identifier: handler
                .get_customer_identifier()?
                .or(params.customer_identifier),
            message: None,
        })
    }

    async fn run_change_package(
        &self,
        params: ChangePackageParams,
    ) -> Result<ChangePackageResult, ProvisionError> {
        let response = self.call(Operation::ChangePackage, &params).await?;
        let handler = LicenseKeyResponseHandler::new(response);

        Ok(ChangePackageResult {
            license_key: handler.get_license_key(LicenseKeyResponseHandler::LICENSE_KEY)?,
            package_identifier: Some(
                handler
                    .get_package_identifier()?
                    .unwrap_or(params.package_identifier),
            ),
            message: None,
        })
    }

    async fn run_get_usage_data(
        &self,
        params: GetUsageParams,
    ) -> Result<GetUsageResult, ProvisionError> {
        let response = self.call(Operation::GetUsageData, &params).await?;
        let handler = UsageDataResponseHandler::new(response);

        Ok(GetUsageResult {
            units_consumed: Some(handler.get_units_consumed(UsageDataResponseHandler::UNITS_CONSUMED)?),
            usage_data: handler.data()?.cloned(),
            message: None,
        })
    }

    async fn run_reissue(&self, params: ReissueParams) -> Result<ReissueResult, ProvisionError> {
        let response = self.call(Operation::Reissue, &params).await?;
        let handler = LicenseKeyResponseHandler::new(response);

        Ok(ReissueResult {
            license_key: handler.get_license_key(LicenseKeyResponseHandler::LICENSE_KEY)?,
            message: None,
        })
    }

    async fn run_default<P: Serialize + Sync>(
        &self,
        operation: Operation,
        params: &P,
    ) -> Result<EmptyResult, ProvisionError> {
        let response = self.call(operation, params).await?;
        DefaultResponseHandler::new(response).assert_response_success()?;
        Ok(EmptyResult::default())
    }
}

#[async_trait]
impl LicenseProvider for GenericProvider {
    fn about(&self) -> ProviderInfo {
        ProviderInfo::new(
            "Generic",
            "A highly-configurable generic provider for provisioning license keys",
        )
        .with_logo_url("https://api.upmind.io/images/logos/provision/generic-logo.png")
    }

    async fn create(&self, params: CreateParams) -> Result<CreateResult, ProvisionError> {
        let result = self.run_create(params).await;
        log_outcome(Operation::Create, &result);
        result
    }

    async fn change_package(
        &self,
        params: ChangePackageParams,
    ) -> Result<ChangePackageResult, ProvisionError> {
        let result = self.run_change_package(params).await;
        log_outcome(Operation::ChangePackage, &result);
        result
    }

    async fn get_usage_data(
        &self,
        params: GetUsageParams,
    ) -> Result<GetUsageResult, ProvisionError> {
        let result = self.run_get_usage_data(params).await;
        log_outcome(Operation::GetUsageData, &result);
        result
    }

    async fn reissue(&self, params: ReissueParams) -> Result<ReissueResult, ProvisionError> {
        let result = self.run_reissue(params).await;
        log_outcome(Operation::Reissue, &result);
        result
    }

    async fn suspend(&self, params: SuspendParams) -> Result<EmptyResult, ProvisionError> {
        let result = self.run_default(Operation::Suspend, &params).await;
        log_outcome(Operation::Suspend, &result);
        result
    }

    async fn unsuspend(&self, params: UnsuspendParams) -> Result<EmptyResult, ProvisionError> {
        let result = self.run_default(Operation::Unsuspend, &params).await;
        log_outcome(Operation::Unsuspend, &result);
        result
    }

    async fn terminate(&self, params: TerminateParams) -> Result<EmptyResult, ProvisionError> {
        let result = self.run_default(Operation::Terminate, &params).await;
        log_outcome(Operation::Terminate, &result);
        result
    }
}
