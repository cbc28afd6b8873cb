//! Error types for deployment runs.
//!
//! Every variant is fatal to a run: the pipeline never retries or recovers
//! locally, because each step may already have produced a remote side effect.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors raised while assembling a [`crate::config::DeployConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors surfaced by the individual deployment steps.
#[derive(Error, Debug)]
pub enum DeployError {
    /// The future yielding the remote reference bundle was rejected.
    #[error("remote references could not be resolved: {0:#}")]
    UnresolvedReference(anyhow::Error),

    /// Reading the contract source or writing the generated artifact failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote service rejected the request, or the call failed in transit.
    #[error("remote call '{operation}' failed: {message}")]
    RemoteCall {
        operation: &'static str,
        message: String,
    },

    /// The configured issuer petname is not known to the wallet.
    #[error(
        "issuer petname '{petname}' not found in wallet (known: {})",
        .available.join(", ")
    )]
    NotFound {
        petname: String,
        available: Vec<String>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DeployError {
    /// Build a [`DeployError::RemoteCall`] from any displayable failure.
    pub fn remote(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::RemoteCall {
            operation,
            message: err.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
