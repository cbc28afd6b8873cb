//! Instance creation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::remote::ExecutionService;
use crate::types::{AdminInvite, InstallationHandle, IssuerHandle, TimerServiceRef};

/// Keyword the deployed contract expects its issuer under.
pub const TIP_KEYWORD: &str = "Tip";

/// Role keyword to issuer bindings for a new instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordRecord(BTreeMap<String, IssuerHandle>);

impl KeywordRecord {
    /// Record binding [`TIP_KEYWORD`] to `issuer`.
    pub fn tip(issuer: IssuerHandle) -> Self {
        Self(BTreeMap::from([(TIP_KEYWORD.to_string(), issuer)]))
    }

    pub fn get(&self, keyword: &str) -> Option<&IssuerHandle> {
        self.0.get(keyword)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Auxiliary configuration handed to the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfig {
    pub timer_service: TimerServiceRef,
}

impl InstanceConfig {
    pub fn new(timer_service: TimerServiceRef) -> Self {
        Self { timer_service }
    }
}

/// Instantiate `installation` with the given bindings.
pub async fn create_instance(
    execution: &dyn ExecutionService,
    installation: &InstallationHandle,
    keywords: &KeywordRecord,
    config: &InstanceConfig,
) -> Result<AdminInvite> {
    let invite = execution.make_instance(installation, keywords, config).await?;
    tracing::info!(%installation, %invite, "Created contract instance");
    Ok(invite)
}
