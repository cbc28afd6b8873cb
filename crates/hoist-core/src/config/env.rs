//! Process environment inputs.

use std::env::VarError;

use crate::error::ConfigError;

/// Variable selecting the issuer petname used for the `Tip` keyword.
pub const ISSUER_PETNAME_VAR: &str = "TIP_ISSUER_PETNAME";

/// Environment values read once at startup and passed in explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub issuer_petname: Option<String>,
}

impl Environment {
    /// Read from the process environment.
    ///
    /// A value that is set but not valid UTF-8 is an error rather than unset.
    pub fn from_process() -> Result<Self, ConfigError> {
        let petname = petname_from_var(std::env::var(ISSUER_PETNAME_VAR))?;
        Ok(Self::from_lookup(|_| petname.clone()))
    }

    /// Build from an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            issuer_petname: lookup(ISSUER_PETNAME_VAR).filter(|v| !v.trim().is_empty()),
        }
    }
}

fn petname_from_var(value: Result<String, VarError>) -> Result<Option<String>, ConfigError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidValue {
            field: ISSUER_PETNAME_VAR,
            reason: format!("not valid UTF-8: {:?}", raw),
        }),
    }
}
