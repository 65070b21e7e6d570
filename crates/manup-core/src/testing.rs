//! Collaborator doubles shared by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use manup_host::{
    Alert, CacheError, CacheStore, Dialog, DialogChoice, LinkLauncher, MetadataSource,
    PlatformPolicy, PolicyMetadata, SourceError,
};
use manup_platform::PlatformId;

pub(crate) fn policy(minimum: &str, latest: &str, enabled: bool) -> PlatformPolicy {
    PlatformPolicy {
        minimum_version: minimum.to_string(),
        latest_version: latest.to_string(),
        update_url: "https://example.com/update".to_string(),
        enabled,
    }
}

pub(crate) fn metadata_for(platform: PlatformId, policy: PlatformPolicy) -> PolicyMetadata {
    PolicyMetadata::new().with_platform(platform, policy)
}

pub(crate) struct StubSource {
    result: Result<PolicyMetadata, SourceError>,
    pub(crate) calls: AtomicUsize,
}

impl StubSource {
    pub(crate) fn ok(metadata: PolicyMetadata) -> Self {
        Self {
            result: Ok(metadata),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn err(error: SourceError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MetadataSource for StubSource {
    async fn fetch(&self) -> Result<PolicyMetadata, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.result.clone()
    }
}

pub(crate) struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::backend("unavailable"))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), CacheError> {
        Err(CacheError::backend("unavailable"))
    }
}

/// Answers alerts with a scripted sequence of choices. Once the script runs
/// out the dialog stays open, like a user who never taps anything.
pub(crate) struct ScriptedDialog {
    choices: Vec<DialogChoice>,
    pub(crate) shown: Mutex<Vec<Alert>>,
}

impl ScriptedDialog {
    pub(crate) fn new(choices: Vec<DialogChoice>) -> Self {
        Self {
            choices,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn shown(&self) -> Vec<Alert> {
        self.shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Dialog for ScriptedDialog {
    async fn show(&self, alert: &Alert) -> DialogChoice {
        let next = {
            let mut shown = self
                .shown
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            shown.push(alert.clone());
            self.choices.get(shown.len() - 1).copied()
        };
        tokio::task::yield_now().await;
        match next {
            Some(choice) => choice,
            None => std::future::pending().await,
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingLauncher {
    pub(crate) opened: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub(crate) fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl LinkLauncher for RecordingLauncher {
    fn open(&self, url: &str) {
        self.opened
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(url.to_string());
    }
}
