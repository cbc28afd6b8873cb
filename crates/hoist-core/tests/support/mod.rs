//! In-memory remote services for integration tests.
//!
//! All fakes share one call log so tests can assert on ordering and on which
//! calls never happened.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use hoist_core::bundle::BundleDescriptor;
use hoist_core::config::{ConfigFile, ConfigOverrides, DeployConfig, Environment};
use hoist_core::deploy::{InstanceConfig, KeywordRecord};
use hoist_core::error::{DeployError, Result};
use hoist_core::remote::{ExecutionService, ReferenceBundle, Registry, Wallet};
use hoist_core::types::{AdminInvite, InstallationHandle, IssuerHandle, RegistryKey, TimerServiceRef};

pub const CONTRACT_SOURCE: &str = "export const start = zcf => ({ creatorFacet: {} });\n";

pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Default)]
struct ChainState {
    next_id: u64,
    installations: HashMap<InstallationHandle, String>,
    instances: Vec<(InstallationHandle, AdminInvite)>,
    registry: HashMap<RegistryKey, InstallationHandle>,
}

/// Execution service plus registry sharing one id counter.
#[derive(Debug, Clone)]
pub struct FakeChain {
    log: CallLog,
    state: Arc<Mutex<ChainState>>,
    expected_keywords: BTreeSet<String>,
    reject_install: Option<String>,
    echo_base_name: bool,
    empty_key: bool,
}

impl FakeChain {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            state: Arc::new(Mutex::new(ChainState::default())),
            expected_keywords: BTreeSet::from(["Tip".to_string()]),
            reject_install: None,
            echo_base_name: false,
            empty_key: false,
        }
    }

    pub fn rejecting_install(mut self, reason: &str) -> Self {
        self.reject_install = Some(reason.to_string());
        self
    }

    pub fn expecting_keywords(mut self, keywords: &[&str]) -> Self {
        self.expected_keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Registry that hands back the base name unchanged.
    pub fn echoing_base_name(mut self) -> Self {
        self.echo_base_name = true;
        self
    }

    /// Registry that accepts the registration but returns an empty key.
    pub fn returning_empty_key(mut self) -> Self {
        self.empty_key = true;
        self
    }

    pub fn registered(&self, key: &RegistryKey) -> Option<InstallationHandle> {
        self.state.lock().unwrap().registry.get(key).cloned()
    }

    pub fn instance_count(&self) -> usize {
        self.state.lock().unwrap().instances.len()
    }

    fn next_id(&self) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        state.next_id
    }

    fn record(&self, call: &str) {
        self.log.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl ExecutionService for FakeChain {
    async fn install(&self, bundle: &BundleDescriptor) -> Result<InstallationHandle> {
        self.record("install");
        if let Some(reason) = &self.reject_install {
            return Err(DeployError::remote("install", reason));
        }
        let handle = InstallationHandle::new(format!("installation#{}", self.next_id()));
        self.state
            .lock()
            .unwrap()
            .installations
            .insert(handle.clone(), bundle.source.clone());
        Ok(handle)
    }

    async fn make_instance(
        &self,
        installation: &InstallationHandle,
        keywords: &KeywordRecord,
        config: &InstanceConfig,
    ) -> Result<AdminInvite> {
        self.record("makeInstance");
        if !self
            .state
            .lock()
            .unwrap()
            .installations
            .contains_key(installation)
        {
            return Err(DeployError::remote(
                "makeInstance",
                format!("unknown installation {}", installation),
            ));
        }
        let given: BTreeSet<String> = keywords.keywords().map(str::to_string).collect();
        if given != self.expected_keywords {
            return Err(DeployError::remote(
                "makeInstance",
                format!("keywords {:?} do not match {:?}", given, self.expected_keywords),
            ));
        }
        if config.timer_service.as_str().is_empty() {
            return Err(DeployError::remote("makeInstance", "missing timer service"));
        }
        let invite = AdminInvite::new(format!("invite#{}", self.next_id()));
        self.state
            .lock()
            .unwrap()
            .instances
            .push((installation.clone(), invite.clone()));
        Ok(invite)
    }
}

#[async_trait]
impl Registry for FakeChain {
    async fn register(
        &self,
        base_name: &str,
        installation: &InstallationHandle,
    ) -> Result<RegistryKey> {
        self.record("register");
        let key = if self.empty_key {
            RegistryKey::new("")
        } else if self.echo_base_name {
            RegistryKey::new(base_name)
        } else {
            RegistryKey::new(format!("{}_{}", base_name, self.next_id()))
        };
        self.state
            .lock()
            .unwrap()
            .registry
            .insert(key.clone(), installation.clone());
        Ok(key)
    }
}

#[derive(Debug, Clone)]
pub struct FakeWallet {
    log: CallLog,
    issuers: Vec<(String, IssuerHandle)>,
}

impl FakeWallet {
    pub fn new(log: CallLog, petnames: &[&str]) -> Self {
        let issuers = petnames
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), IssuerHandle::new(format!("issuer#{}", i))))
            .collect();
        Self { log, issuers }
    }
}

#[async_trait]
impl Wallet for FakeWallet {
    async fn get_issuers(&self) -> Result<Vec<(String, IssuerHandle)>> {
        self.log.lock().unwrap().push("getIssuers".to_string());
        Ok(self.issuers.clone())
    }
}

/// A deployment environment: fakes, their shared log, and a project dir.
pub struct Harness {
    pub temp: TempDir,
    pub log: CallLog,
    pub chain: FakeChain,
    pub wallet: FakeWallet,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_petnames(&["moola", "simolean"])
    }

    pub fn with_petnames(petnames: &[&str]) -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let log: CallLog = Arc::default();
        let chain = FakeChain::new(log.clone());
        let wallet = FakeWallet::new(log.clone(), petnames);
        Self {
            temp,
            log,
            chain,
            wallet,
        }
    }

    pub fn project_root(&self) -> &Path {
        self.temp.path()
    }

    /// Write the contract source and the output directory in their default spots.
    pub fn scaffold(&self) -> PathBuf {
        let contract = self.project_root().join("contract/src/contract.js");
        std::fs::create_dir_all(contract.parent().unwrap()).unwrap();
        std::fs::write(&contract, CONTRACT_SOURCE).unwrap();
        std::fs::create_dir_all(self.project_root().join("ui/public/conf")).unwrap();
        contract
    }

    pub fn config(&self) -> DeployConfig {
        self.config_with(&Environment::default(), &ConfigOverrides::default())
    }

    pub fn config_with(&self, env: &Environment, overrides: &ConfigOverrides) -> DeployConfig {
        DeployConfig::resolve(self.project_root(), &ConfigFile::default(), env, overrides)
            .expect("valid config")
    }

    pub fn bundle(&self) -> ReferenceBundle {
        ReferenceBundle {
            execution: Arc::new(self.chain.clone()),
            registry: Arc::new(self.chain.clone()),
            wallet: Arc::new(self.wallet.clone()),
            timer_service: TimerServiceRef::new("timer#0"),
        }
    }

    pub async fn references(&self) -> anyhow::Result<ReferenceBundle> {
        Ok(self.bundle())
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}
