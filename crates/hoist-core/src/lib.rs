//! Hoist Core Library
//!
//! Deploys a contract into a shared remote execution environment: bundles
//! the source, installs it, instantiates it against a wallet issuer, publishes
//! the installation in the registry and writes the constants downstream UI
//! and API layers read.

pub mod bundle;
pub mod config;
pub mod deploy;
pub mod error;
pub mod output;
pub mod remote;
pub mod types;

pub use error::{ConfigError, DeployError, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigFile, ConfigOverrides, DeployConfig, Environment};

    // Pipeline
    pub use crate::deploy::{
        DeployPipeline, DeployReport, InstanceConfig, IssuerMap, KeywordRecord, PipelineError,
        SideEffects, Stage,
    };

    // Remote services
    pub use crate::remote::{
        ExecutionService, HttpBridge, ReferenceBundle, Registry, Wallet, resolve_references,
    };

    // Artifacts
    pub use crate::bundle::{BundleDescriptor, BundleLoader};
    pub use crate::output::GeneratedConfig;
    pub use crate::types::{
        AdminInvite, InstallationHandle, IssuerHandle, RegistryKey, TimerServiceRef,
    };

    // Errors
    pub use crate::error::{ConfigError, DeployError};
}
