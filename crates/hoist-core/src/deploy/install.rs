//! Installer client.

use crate::bundle::BundleDescriptor;
use crate::error::Result;
use crate::remote::ExecutionService;
use crate::types::InstallationHandle;

/// Submit `bundle` to the execution-install service.
///
/// Consumes the descriptor: a bundle is installed at most once per run.
pub async fn install_bundle(
    execution: &dyn ExecutionService,
    bundle: BundleDescriptor,
) -> Result<InstallationHandle> {
    let digest = bundle.digest();
    let installation = execution.install(&bundle).await?;
    tracing::info!(%installation, %digest, "Installed contract bundle");
    Ok(installation)
}
