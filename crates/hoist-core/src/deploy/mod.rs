//! The deployment steps and the pipeline that sequences them.
//!
//! Each step wraps exactly one remote call. None of them retry: installs,
//! instantiations and registrations are not safe to repeat blindly.

pub mod install;
pub mod instance;
pub mod issuer;
pub mod pipeline;
pub mod publish;

pub use install::install_bundle;
pub use instance::{InstanceConfig, KeywordRecord, TIP_KEYWORD, create_instance};
pub use issuer::{IssuerMap, resolve_issuer};
pub use pipeline::{DeployPipeline, DeployReport, PipelineError, SideEffects, Stage};
pub use publish::publish_installation;
