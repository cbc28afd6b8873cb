//! Step-level behavior of the installer, issuer, instance and publication clients.

mod support;

use std::sync::Arc;

use hoist_core::bundle::BundleDescriptor;
use hoist_core::deploy::{
    InstanceConfig, KeywordRecord, create_instance, install_bundle, publish_installation,
    resolve_issuer,
};
use hoist_core::error::DeployError;
use hoist_core::types::{InstallationHandle, IssuerHandle, TimerServiceRef};

use support::{CONTRACT_SOURCE, CallLog, FakeChain, FakeWallet};

fn bundle() -> BundleDescriptor {
    BundleDescriptor::new(CONTRACT_SOURCE, "getExport")
}

#[tokio::test]
async fn install_then_instantiate_yields_registrable_handle() {
    let log = CallLog::default();
    let chain = FakeChain::new(log.clone());

    let installation = install_bundle(&chain, bundle()).await.unwrap();
    let keywords = KeywordRecord::tip(IssuerHandle::new("issuer#0"));
    let config = InstanceConfig::new(TimerServiceRef::new("timer#0"));
    create_instance(&chain, &installation, &keywords, &config)
        .await
        .unwrap();
    let key = publish_installation(&chain, "encouragement", &installation)
        .await
        .unwrap();

    assert_eq!(chain.registered(&key), Some(installation));
}

#[tokio::test]
async fn same_base_name_registers_under_distinct_keys() {
    let chain = FakeChain::new(CallLog::default());
    let installation = install_bundle(&chain, bundle()).await.unwrap();

    let first = publish_installation(&chain, "encouragement", &installation)
        .await
        .unwrap();
    let second = publish_installation(&chain, "encouragement", &installation)
        .await
        .unwrap();

    assert_ne!(first, second);
    assert_ne!(first.as_str(), "encouragement");
    assert_ne!(second.as_str(), "encouragement");
}

#[tokio::test]
async fn key_equal_to_base_name_is_rejected() {
    let chain = FakeChain::new(CallLog::default()).echoing_base_name();
    let installation = install_bundle(&chain, bundle()).await.unwrap();

    let err = publish_installation(&chain, "encouragement", &installation)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::RemoteCall {
            operation: "register",
            ..
        }
    ));
}

#[tokio::test]
async fn empty_key_is_rejected() {
    let chain = FakeChain::new(CallLog::default()).returning_empty_key();
    let installation = install_bundle(&chain, bundle()).await.unwrap();

    let err = publish_installation(&chain, "encouragement", &installation)
        .await
        .unwrap_err();

    match err {
        DeployError::RemoteCall { operation, message } => {
            assert_eq!(operation, "register");
            assert!(message.contains("empty"), "message: {message}");
        }
        other => panic!("expected RemoteCall, got {other:?}"),
    }
}

#[tokio::test]
async fn instance_from_foreign_handle_fails() {
    let chain = FakeChain::new(CallLog::default());
    let keywords = KeywordRecord::tip(IssuerHandle::new("issuer#0"));
    let config = InstanceConfig::new(TimerServiceRef::new("timer#0"));

    let err = create_instance(
        &chain,
        &InstallationHandle::new("installation#999"),
        &keywords,
        &config,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("unknown installation"));
    assert_eq!(chain.instance_count(), 0);
}

#[tokio::test]
async fn resolve_issuer_picks_configured_petname() {
    let wallet = FakeWallet::new(CallLog::default(), &["quatloos", "moola"]);

    let issuer = resolve_issuer(&wallet, "moola").await.unwrap();

    assert_eq!(issuer, IssuerHandle::new("issuer#1"));
}

#[tokio::test]
async fn resolve_issuer_reports_missing_petname() {
    let wallet = FakeWallet::new(CallLog::default(), &[]);

    let err = resolve_issuer(&wallet, "moola").await.unwrap_err();

    match err {
        DeployError::NotFound { petname, available } => {
            assert_eq!(petname, "moola");
            assert!(available.is_empty());
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn trait_objects_share_one_backend() {
    let log = CallLog::default();
    let chain = Arc::new(FakeChain::new(log.clone()));
    let execution: Arc<dyn hoist_core::remote::ExecutionService> = chain.clone();
    let registry: Arc<dyn hoist_core::remote::Registry> = chain.clone();

    let installation = install_bundle(execution.as_ref(), bundle()).await.unwrap();
    let key = publish_installation(registry.as_ref(), "encouragement", &installation)
        .await
        .unwrap();

    assert_eq!(chain.registered(&key), Some(installation));
    assert_eq!(*log.lock().unwrap(), vec!["install", "register"]);
}
