//! Sequential deployment pipeline.
//!
//! A run walks Resolve -> Bundle -> Install -> ResolveIssuer -> Instantiate
//! -> Register -> WriteConfig. Each step's output feeds the next; the first
//! failure ends the run. Remote side effects already produced are reported
//! with the error and are never rolled back.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::{
    InstanceConfig, KeywordRecord, create_instance, install_bundle, publish_installation,
    resolve_issuer,
};
use crate::bundle::BundleLoader;
use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::output::{GeneratedConfig, write_generated_config};
use crate::remote::{ReferenceBundle, resolve_references};
use crate::types::{AdminInvite, InstallationHandle, RegistryKey};

/// Pipeline step, used to report where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Resolve,
    Bundle,
    Install,
    ResolveIssuer,
    Instantiate,
    Register,
    WriteConfig,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Bundle => "bundle",
            Stage::Install => "install",
            Stage::ResolveIssuer => "resolve_issuer",
            Stage::Instantiate => "instantiate",
            Stage::Register => "register",
            Stage::WriteConfig => "write_config",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote state a run has created so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SideEffects {
    pub installation: Option<InstallationHandle>,
    pub instance: Option<AdminInvite>,
    pub registry_key: Option<RegistryKey>,
}

impl SideEffects {
    pub fn is_empty(&self) -> bool {
        self.installation.is_none() && self.instance.is_none() && self.registry_key.is_none()
    }
}

/// A failed run: the stage that failed, its cause, and what was left behind.
#[derive(Debug, Error)]
#[error("deployment failed at stage '{stage}'")]
pub struct PipelineError {
    pub stage: Stage,
    pub side_effects: SideEffects,
    #[source]
    pub source: DeployError,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub contract_name: String,
    pub installation: InstallationHandle,
    pub instance: AdminInvite,
    pub registry_key: RegistryKey,
    pub bundle_digest: String,
    pub config_path: PathBuf,
    pub generated: GeneratedConfig,
    pub deployed_at: DateTime<Utc>,
}

/// Runs one deployment per call to [`DeployPipeline::run`].
#[derive(Debug, Clone)]
pub struct DeployPipeline {
    config: DeployConfig,
    loader: BundleLoader,
}

impl DeployPipeline {
    pub fn new(config: DeployConfig) -> Self {
        let loader = BundleLoader::new(config.module_format.clone());
        Self { config, loader }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Execute the full sequence against the references `references` yields.
    pub async fn run<F>(&self, references: F) -> Result<DeployReport, PipelineError>
    where
        F: Future<Output = anyhow::Result<ReferenceBundle>>,
    {
        let config = &self.config;
        let mut effects = SideEffects::default();
        let fail = |stage: Stage, effects: &SideEffects, source: DeployError| {
            tracing::error!(%stage, error = %source, "Deployment step failed");
            PipelineError {
                stage,
                side_effects: effects.clone(),
                source,
            }
        };

        tracing::info!(stage = %Stage::Resolve, "Resolving remote references");
        let refs = resolve_references(references)
            .await
            .map_err(|e| fail(Stage::Resolve, &effects, e))?;

        tracing::info!(
            stage = %Stage::Bundle,
            path = %config.contract_path.display(),
            "Bundling contract"
        );
        let bundle = self
            .loader
            .load(&config.contract_path)
            .await
            .map_err(|e| fail(Stage::Bundle, &effects, e))?;
        let bundle_digest = bundle.digest();

        tracing::info!(stage = %Stage::Install, "Installing bundle");
        let installation = install_bundle(refs.execution.as_ref(), bundle)
            .await
            .map_err(|e| fail(Stage::Install, &effects, e))?;
        effects.installation = Some(installation.clone());

        tracing::info!(
            stage = %Stage::ResolveIssuer,
            petname = %config.issuer_petname,
            "Resolving issuer"
        );
        let issuer = resolve_issuer(refs.wallet.as_ref(), &config.issuer_petname)
            .await
            .map_err(|e| fail(Stage::ResolveIssuer, &effects, e))?;

        tracing::info!(stage = %Stage::Instantiate, "Creating instance");
        let keywords = KeywordRecord::tip(issuer);
        let instance_config = InstanceConfig::new(refs.timer_service.clone());
        let instance = create_instance(
            refs.execution.as_ref(),
            &installation,
            &keywords,
            &instance_config,
        )
        .await
        .map_err(|e| fail(Stage::Instantiate, &effects, e))?;
        effects.instance = Some(instance.clone());

        tracing::info!(
            stage = %Stage::Register,
            name = %config.contract_name,
            "Registering installation"
        );
        let registry_key =
            publish_installation(refs.registry.as_ref(), &config.contract_name, &installation)
                .await
                .map_err(|e| fail(Stage::Register, &effects, e))?;
        effects.registry_key = Some(registry_key.clone());

        tracing::info!(stage = %Stage::WriteConfig, "Writing generated config");
        let generated = GeneratedConfig::new(
            config.contract_name.clone(),
            registry_key.clone(),
            &config.bridge_url,
            &config.api_url,
        );
        write_generated_config(&config.output_path, &generated, &config.provenance())
            .await
            .map_err(|e| fail(Stage::WriteConfig, &effects, e))?;

        Ok(DeployReport {
            contract_name: config.contract_name.clone(),
            installation,
            instance,
            registry_key,
            bundle_digest,
            config_path: config.output_path.clone(),
            generated,
            deployed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(Stage::ResolveIssuer.to_string(), "resolve_issuer");
        assert_eq!(
            serde_json::to_string(&Stage::WriteConfig).unwrap(),
            "\"write_config\""
        );
    }

    #[test]
    fn empty_side_effects() {
        let mut effects = SideEffects::default();
        assert!(effects.is_empty());
        effects.installation = Some(InstallationHandle::new("installation#1"));
        assert!(!effects.is_empty());
    }
}
