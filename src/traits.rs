//! Provider contract
//!
//! Every licensing backend implements [`LicenseProvider`]. Operations a backend
//! cannot perform return [`ProvisionError::NotSupported`]; operations a
//! configuration leaves out return [`ProvisionError::NotConfigured`].

use crate::error::ProvisionError;
use crate::types::{
    ChangePackageParams, ChangePackageResult, CreateParams, CreateResult, EmptyResult,
    GetUsageParams, GetUsageResult, ProviderInfo, ReissueParams, ReissueResult, RenewParams,
    RenewResult, SuspendParams, TerminateParams, UnsuspendParams,
};
use async_trait::async_trait;

/// License-key lifecycle operations against one backend.
#[async_trait]
pub trait LicenseProvider: Send + Sync {
    /// Describe this provider.
    fn about(&self) -> ProviderInfo;

    /// Create a new license key.
    async fn create(&self, params: CreateParams) -> Result<CreateResult, ProvisionError>;

    /// Move a license key to another package.
    async fn change_package(
        &self,
        params: ChangePackageParams,
    ) -> Result<ChangePackageResult, ProvisionError>;

    /// Get usage stats about a license key.
    async fn get_usage_data(&self, params: GetUsageParams)
    -> Result<GetUsageResult, ProvisionError>;

    /// Reissue an existing license key.
    async fn reissue(&self, params: ReissueParams) -> Result<ReissueResult, ProvisionError>;

    /// Suspend a license key.
    async fn suspend(&self, params: SuspendParams) -> Result<EmptyResult, ProvisionError>;

    /// Unsuspend a license key.
    async fn unsuspend(&self, params: UnsuspendParams) -> Result<EmptyResult, ProvisionError>;

    /// Delete a license key.
    async fn terminate(&self, params: TerminateParams) -> Result<EmptyResult, ProvisionError>;

    /// Renew a license key.
    async fn renew(&self, _params: RenewParams) -> Result<RenewResult, ProvisionError> {
        Err(ProvisionError::NotSupported(
            "Operation not supported".to_string(),
        ))
    }
}
