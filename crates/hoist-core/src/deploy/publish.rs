//! Publication client.

use crate::error::{DeployError, Result};
use crate::remote::Registry;
use crate::types::{InstallationHandle, RegistryKey};

/// Register `installation` under `base_name` and return the unique key.
///
/// A key that is empty or identical to the base name means the registry did
/// not add a uniqueness suffix; it is rejected as a failed call.
pub async fn publish_installation(
    registry: &dyn Registry,
    base_name: &str,
    installation: &InstallationHandle,
) -> Result<RegistryKey> {
    let key = registry.register(base_name, installation).await?;

    if key.as_str().is_empty() {
        return Err(DeployError::remote("register", "registry returned an empty key"));
    }
    if key.as_str() == base_name {
        return Err(DeployError::remote(
            "register",
            format!("registry returned the base name '{}' as key", base_name),
        ));
    }

    tracing::info!(%key, %installation, "Published installation");
    Ok(key)
}
