//! HTTP bridge transport for the remote services.
//!
//! Every call is a JSON `POST` against the bridge; replies are wrapped in an
//! `{"ok": ...}` / `{"error": "..."}` envelope. Keyed containers such as the
//! wallet's issuer set travel as ordered pairs.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{ExecutionService, ReferenceBundle, Registry, Wallet};
use crate::bundle::BundleDescriptor;
use crate::deploy::instance::{InstanceConfig, KeywordRecord};
use crate::error::{DeployError, Result};
use crate::types::{AdminInvite, InstallationHandle, IssuerHandle, RegistryKey, TimerServiceRef};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Reply<T> {
    Ok(T),
    Error(String),
}

impl<T> Reply<T> {
    fn into_result(self, operation: &'static str) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Error(message) => Err(DeployError::RemoteCall { operation, message }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct References {
    timer_service: TimerServiceRef,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MakeInstanceRequest<'a> {
    installation: &'a InstallationHandle,
    issuer_keyword_record: &'a KeywordRecord,
    config: &'a InstanceConfig,
}

#[derive(Debug, Deserialize)]
struct MakeInstanceReply {
    invite: AdminInvite,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    handle: &'a InstallationHandle,
}

/// Client for a bridge exposing the execution service, registry and wallet.
#[derive(Debug, Clone)]
pub struct HttpBridge {
    client: reqwest::Client,
    base: Url,
}

impl HttpBridge {
    pub fn new(mut base: Url) -> anyhow::Result<Self> {
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("hoist/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Connect to the bridge and fetch the reference bundle.
    ///
    /// This is the future handed to [`super::resolve_references`].
    pub async fn connect(base: Url) -> anyhow::Result<ReferenceBundle> {
        let bridge = Arc::new(Self::new(base)?);
        let url = bridge.endpoint("references")?;

        let response = bridge
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to reach bridge at {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch references: HTTP {} from {}",
                response.status(),
                url
            );
        }

        let reply: Reply<References> = response
            .json()
            .await
            .context("Failed to parse references response")?;
        let references = reply.into_result("references")?;

        tracing::debug!(
            bridge = %bridge.base,
            timer = %references.timer_service,
            "Connected to bridge"
        );

        Ok(ReferenceBundle {
            execution: bridge.clone(),
            registry: bridge.clone(),
            wallet: bridge,
            timer_service: references.timer_service,
        })
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Invalid bridge endpoint: {}", path))
    }

    async fn call<B, T>(&self, operation: &'static str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .endpoint(path)
            .map_err(|e| DeployError::remote(operation, format!("{e:#}")))?;

        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| DeployError::remote(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DeployError::remote(
                operation,
                format!("HTTP {} from {}: {}", status, url, detail.trim()),
            ));
        }

        let reply: Reply<T> = response
            .json()
            .await
            .map_err(|e| DeployError::remote(operation, e))?;
        reply.into_result(operation)
    }
}

#[async_trait]
impl ExecutionService for HttpBridge {
    async fn install(&self, bundle: &BundleDescriptor) -> Result<InstallationHandle> {
        self.call("install", "execution/install", bundle).await
    }

    async fn make_instance(
        &self,
        installation: &InstallationHandle,
        keywords: &KeywordRecord,
        config: &InstanceConfig,
    ) -> Result<AdminInvite> {
        let request = MakeInstanceRequest {
            installation,
            issuer_keyword_record: keywords,
            config,
        };
        let reply: MakeInstanceReply = self
            .call("makeInstance", "execution/make-instance", &request)
            .await?;
        Ok(reply.invite)
    }
}

#[async_trait]
impl Registry for HttpBridge {
    async fn register(
        &self,
        base_name: &str,
        installation: &InstallationHandle,
    ) -> Result<RegistryKey> {
        let request = RegisterRequest {
            name: base_name,
            handle: installation,
        };
        self.call("register", "registry/register", &request).await
    }
}

#[async_trait]
impl Wallet for HttpBridge {
    async fn get_issuers(&self) -> Result<Vec<(String, IssuerHandle)>> {
        self.call("getIssuers", "wallet/issuers", &serde_json::json!({}))
            .await
    }
}
