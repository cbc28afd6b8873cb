//! Remote service seams.
//!
//! The execution-install service, the shared registry and the wallet are
//! external collaborators. The orchestrator only depends on the traits here;
//! [`http::HttpBridge`] implements all of them over a bridge endpoint.

pub mod http;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::bundle::BundleDescriptor;
use crate::deploy::instance::{InstanceConfig, KeywordRecord};
use crate::error::{DeployError, Result};
use crate::types::{AdminInvite, InstallationHandle, IssuerHandle, RegistryKey, TimerServiceRef};

pub use http::HttpBridge;

/// Installs code and creates instances from installations.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    async fn install(&self, bundle: &BundleDescriptor) -> Result<InstallationHandle>;

    async fn make_instance(
        &self,
        installation: &InstallationHandle,
        keywords: &KeywordRecord,
        config: &InstanceConfig,
    ) -> Result<AdminInvite>;
}

/// Shared name registry.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Bind `installation` under a key derived from `base_name`.
    ///
    /// Every call yields a fresh key, even for a repeated base name.
    async fn register(
        &self,
        base_name: &str,
        installation: &InstallationHandle,
    ) -> Result<RegistryKey>;
}

/// Local wallet holding the operator's issuers.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Known issuers as ordered `(petname, issuer)` pairs.
    async fn get_issuers(&self) -> Result<Vec<(String, IssuerHandle)>>;
}

/// Remote handles the whole run depends on. Supplied once, never mutated.
#[derive(Clone)]
pub struct ReferenceBundle {
    pub execution: Arc<dyn ExecutionService>,
    pub registry: Arc<dyn Registry>,
    pub wallet: Arc<dyn Wallet>,
    pub timer_service: TimerServiceRef,
}

impl fmt::Debug for ReferenceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceBundle")
            .field("timer_service", &self.timer_service)
            .finish_non_exhaustive()
    }
}

/// Wait for the reference bundle to settle.
///
/// A rejected future surfaces as [`DeployError::UnresolvedReference`].
pub async fn resolve_references<F>(references: F) -> Result<ReferenceBundle>
where
    F: Future<Output = anyhow::Result<ReferenceBundle>>,
{
    references.await.map_err(DeployError::UnresolvedReference)
}
