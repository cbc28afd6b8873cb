//! Deployment configuration.
//!
//! Values are layered, highest precedence first:
//! - explicit overrides (CLI flags)
//! - process environment (issuer petname only)
//! - `hoist.toml` in the project root
//! - built-in defaults

pub mod env;
pub mod file;

use std::path::{Path, PathBuf};

use url::Url;

use crate::bundle::DEFAULT_MODULE_FORMAT;
use crate::error::ConfigError;

pub use env::{Environment, ISSUER_PETNAME_VAR};
pub use file::ConfigFile;

pub const CONFIG_FILE_NAME: &str = "hoist.toml";
pub const DEFAULT_CONTRACT_NAME: &str = "encouragement";
pub const DEFAULT_CONTRACT_PATH: &str = "contract/src/contract.js";
pub const DEFAULT_ISSUER_PETNAME: &str = "moola";
pub const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_OUTPUT_PATH: &str = "ui/public/conf/installationConstants.js";

/// Per-invocation overrides, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub contract_name: Option<String>,
    pub contract_path: Option<PathBuf>,
    pub issuer_petname: Option<String>,
    pub bridge_url: Option<String>,
    pub api_url: Option<String>,
    pub output_path: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contract_name(mut self, name: impl Into<String>) -> Self {
        self.contract_name = Some(name.into());
        self
    }

    pub fn with_contract_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.contract_path = Some(path.into());
        self
    }

    pub fn with_issuer_petname(mut self, petname: impl Into<String>) -> Self {
        self.issuer_petname = Some(petname.into());
        self
    }

    pub fn with_bridge_url(mut self, url: impl Into<String>) -> Self {
        self.bridge_url = Some(url.into());
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

/// Fully resolved settings for one deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Base name the installation is published under.
    pub contract_name: String,
    pub contract_path: PathBuf,
    pub module_format: String,
    pub issuer_petname: String,
    pub bridge_url: Url,
    pub api_url: Url,
    /// Where the generated constants file is written.
    pub output_path: PathBuf,
}

impl DeployConfig {
    /// Built-in defaults rooted at `project_root`.
    pub fn with_defaults(project_root: &Path) -> Result<Self, ConfigError> {
        Self::resolve(
            project_root,
            &ConfigFile::default(),
            &Environment::default(),
            &ConfigOverrides::default(),
        )
    }

    /// Load `hoist.toml` (or `config_path`) and layer env and overrides on top.
    ///
    /// The default config file may be absent; an explicit `config_path` must exist.
    pub fn load(
        project_root: &Path,
        config_path: Option<&Path>,
        env: &Environment,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => ConfigFile::load(&resolve_path(project_root, path))?,
            None => ConfigFile::load_or_default(&project_root.join(CONFIG_FILE_NAME))?,
        };
        Self::resolve(project_root, &file, env, overrides)
    }

    pub fn resolve(
        project_root: &Path,
        file: &ConfigFile,
        env: &Environment,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let contract_name = non_empty(
            "contract_name",
            overrides
                .contract_name
                .clone()
                .or_else(|| file.contract_name.clone())
                .unwrap_or_else(|| DEFAULT_CONTRACT_NAME.to_string()),
        )?;

        let issuer_petname = non_empty(
            "issuer_petname",
            overrides
                .issuer_petname
                .clone()
                .or_else(|| env.issuer_petname.clone())
                .or_else(|| file.issuer_petname.clone())
                .unwrap_or_else(|| DEFAULT_ISSUER_PETNAME.to_string()),
        )?;

        let module_format = non_empty(
            "module_format",
            file.module_format
                .clone()
                .unwrap_or_else(|| DEFAULT_MODULE_FORMAT.to_string()),
        )?;

        let bridge_url = parse_http_url(
            "bridge_url",
            overrides
                .bridge_url
                .as_deref()
                .or(file.bridge_url.as_deref())
                .unwrap_or(DEFAULT_BRIDGE_URL),
        )?;

        let api_url = parse_http_url(
            "api_url",
            overrides
                .api_url
                .as_deref()
                .or(file.api_url.as_deref())
                .unwrap_or(DEFAULT_API_URL),
        )?;

        let contract_path = overrides
            .contract_path
            .clone()
            .or_else(|| file.contract_path.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTRACT_PATH));

        let output_path = overrides
            .output_path
            .clone()
            .or_else(|| file.output_path.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

        Ok(Self {
            contract_name,
            contract_path: resolve_path(project_root, &contract_path),
            module_format,
            issuer_petname,
            bridge_url,
            api_url,
            output_path: resolve_path(project_root, &output_path),
        })
    }

    /// Provenance annotation written into the generated artifact.
    pub fn provenance(&self) -> String {
        self.contract_path.display().to_string()
    }
}

fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_http_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: format!("'{}' is not a valid URL: {}", raw, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme '{}', expected http or https", other),
        }),
    }
}
