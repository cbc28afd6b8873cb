//! Generated constants consumed by the UI and API layers.
//!
//! The artifact is a directly importable module:
//!
//! ```text
//! // GENERATED FROM /path/to/contract.js
//! export default {
//!   "CONTRACT_NAME": "encouragement",
//!   "INSTALLATION_REG_KEY": "encouragement_3",
//!   "BRIDGE_URL": "http://127.0.0.1:8000",
//!   "API_URL": "http://127.0.0.1:8000"
//! };
//! ```

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeployError, Result};
use crate::types::RegistryKey;

const PROVENANCE_PREFIX: &str = "// GENERATED FROM ";
const EXPORT_PREFIX: &str = "export default";

/// The four constants handed to downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct GeneratedConfig {
    pub contract_name: String,
    pub installation_reg_key: RegistryKey,
    pub bridge_url: String,
    pub api_url: String,
}

impl GeneratedConfig {
    pub fn new(
        contract_name: impl Into<String>,
        installation_reg_key: RegistryKey,
        bridge_url: &Url,
        api_url: &Url,
    ) -> Self {
        Self {
            contract_name: contract_name.into(),
            installation_reg_key,
            bridge_url: display_url(bridge_url),
            api_url: display_url(api_url),
        }
    }

    /// Render as an importable module annotated with `provenance`.
    ///
    /// Control characters in `provenance` are escaped so the header stays a
    /// single comment line.
    pub fn render(&self, provenance: &str) -> Result<String> {
        let body = serde_json::to_string_pretty(self)
            .map_err(|e| DeployError::io(provenance, io::Error::other(e)))?;
        Ok(format!(
            "{}{}\n{} {};\n",
            PROVENANCE_PREFIX,
            provenance.escape_debug(),
            EXPORT_PREFIX,
            body
        ))
    }

    /// Parse a rendered artifact back into its record.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        let code: String = content
            .lines()
            .filter(|line| !line.trim_start().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        let code = code.trim();
        let code = code.strip_prefix(EXPORT_PREFIX).unwrap_or(code).trim();
        let code = code.strip_suffix(';').unwrap_or(code);
        serde_json::from_str(code)
    }
}

/// Provenance recorded in an artifact's header, if present.
pub fn provenance_of(content: &str) -> Option<&str> {
    content
        .lines()
        .next()
        .and_then(|line| line.strip_prefix(PROVENANCE_PREFIX))
        .map(str::trim)
}

/// Write `record` to `path`, replacing any previous content.
///
/// Parent directories are not created; a missing one is an I/O error.
pub async fn write_generated_config(
    path: &Path,
    record: &GeneratedConfig,
    provenance: &str,
) -> Result<()> {
    let content = record.render(provenance)?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| DeployError::io(path, e))?;
    tracing::info!(path = %path.display(), "Wrote generated config");
    Ok(())
}

/// Read and parse a previously generated artifact.
pub async fn read_generated_config(path: &Path) -> Result<GeneratedConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DeployError::io(path, e))?;
    GeneratedConfig::parse(&content)
        .map_err(|e| DeployError::io(path, io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Bare origins render without the trailing slash `Url` adds.
fn display_url(url: &Url) -> String {
    let s = url.as_str();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        s.trim_end_matches('/').to_string()
    } else {
        s.to_string()
    }
}
