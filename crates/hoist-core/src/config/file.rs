//! `hoist.toml` loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Optional project settings. Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub contract_name: Option<String>,
    pub contract_path: Option<String>,
    pub module_format: Option<String>,
    pub issuer_petname: Option<String>,
    pub bridge_url: Option<String>,
    pub api_url: Option<String>,
    pub output_path: Option<String>,
}

impl ConfigFile {
    /// Load a config file that must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content, path)
    }

    /// Load `path`, treating a missing file as an empty config.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
