//! Issuer resolution against the wallet.

use crate::error::{DeployError, Result};
use crate::remote::Wallet;
use crate::types::IssuerHandle;

/// Petname to issuer mapping rebuilt from the wallet's ordered pairs.
///
/// Keeps first-seen order. A repeated petname replaces the earlier issuer
/// in place, the same way inserting into a map would.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuerMap {
    entries: Vec<(String, IssuerHandle)>,
}

impl IssuerMap {
    pub fn get(&self, petname: &str) -> Option<&IssuerHandle> {
        self.entries
            .iter()
            .find(|(name, _)| name == petname)
            .map(|(_, issuer)| issuer)
    }

    pub fn petnames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, IssuerHandle)> for IssuerMap {
    fn from_iter<I: IntoIterator<Item = (String, IssuerHandle)>>(iter: I) -> Self {
        let mut entries: Vec<(String, IssuerHandle)> = Vec::new();
        for (petname, issuer) in iter {
            match entries.iter_mut().find(|(name, _)| *name == petname) {
                Some(existing) => existing.1 = issuer,
                None => entries.push((petname, issuer)),
            }
        }
        Self { entries }
    }
}

/// Look up the issuer registered in the wallet under `petname`.
pub async fn resolve_issuer(wallet: &dyn Wallet, petname: &str) -> Result<IssuerHandle> {
    let issuers: IssuerMap = wallet.get_issuers().await?.into_iter().collect();
    tracing::debug!(count = issuers.len(), "Fetched wallet issuers");

    match issuers.get(petname) {
        Some(issuer) => {
            tracing::info!(petname, %issuer, "Resolved issuer");
            Ok(issuer.clone())
        }
        None => Err(DeployError::NotFound {
            petname: petname.to_string(),
            available: issuers.petnames().map(str::to_string).collect(),
        }),
    }
}
