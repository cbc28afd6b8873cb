//! Contract bundling.
//!
//! Reads a contract module from disk and packages it into a portable
//! descriptor the remote execution service can install.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, Result};

/// Module format understood by the remote execution service.
pub const DEFAULT_MODULE_FORMAT: &str = "getExport";

/// Source text plus the module format tag it was packaged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleDescriptor {
    pub source: String,
    pub module_format: String,
}

impl BundleDescriptor {
    pub fn new(source: impl Into<String>, module_format: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            module_format: module_format.into(),
        }
    }

    /// Content digest of the bundled source (blake3, hex).
    pub fn digest(&self) -> String {
        blake3::hash(self.source.as_bytes()).to_hex().to_string()
    }
}

/// Packages contract source files into [`BundleDescriptor`]s.
#[derive(Debug, Clone)]
pub struct BundleLoader {
    module_format: String,
}

impl Default for BundleLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_FORMAT)
    }
}

impl BundleLoader {
    pub fn new(module_format: impl Into<String>) -> Self {
        Self {
            module_format: module_format.into(),
        }
    }

    pub fn module_format(&self) -> &str {
        &self.module_format
    }

    /// Read `path` and package its contents.
    ///
    /// Fails with [`DeployError::Io`] if the file is missing or unreadable.
    pub async fn load(&self, path: &Path) -> Result<BundleDescriptor> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DeployError::io(path, e))?;

        let bundle = BundleDescriptor::new(source, self.module_format.clone());
        tracing::debug!(
            path = %path.display(),
            bytes = bundle.source.len(),
            digest = %bundle.digest(),
            "Bundled contract source"
        );
        Ok(bundle)
    }
}
