use async_trait::async_trait;

use crate::error::{CacheError, SourceError};
use crate::types::{Alert, DialogChoice, PolicyMetadata, TranslationKey};

/// Where the policy document is retrieved from.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self) -> Result<PolicyMetadata, SourceError>;
}

/// Persistent string key-value store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;
}

/// Shows an alert and reports which button the user pressed.
///
/// `show` should stay pending until the user acts. Implementations may stay
/// pending for good on alerts without buttons; the gate treats those as
/// blocking either way. A mandatory alert is shown again after each
/// "update", with a short pause in between.
#[async_trait]
pub trait Dialog: Send + Sync {
    async fn show(&self, alert: &Alert) -> DialogChoice;
}

pub trait Translator: Send + Sync {
    /// Localized text for `key`, or `None` to use the builtin English text.
    fn translate(&self, key: TranslationKey) -> Option<String>;
}

/// Opens an update link outside the application. Fire-and-forget.
pub trait LinkLauncher: Send + Sync {
    fn open(&self, url: &str);
}

#[async_trait]
pub trait ReadinessSignal: Send + Sync {
    /// Resolves once the host can show UI.
    async fn ready(&self);
}

#[async_trait]
pub trait AppIdentity: Send + Sync {
    async fn version(&self) -> String;
    async fn name(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReady;

#[async_trait]
impl ReadinessSignal for AlwaysReady {
    async fn ready(&self) {}
}

/// Identity known at build time, typically from `CARGO_PKG_*`.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    pub name: String,
    pub version: String,
}

impl StaticIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

#[async_trait]
impl AppIdentity for StaticIdentity {
    async fn version(&self) -> String {
        self.version.clone()
    }

    async fn name(&self) -> String {
        self.name.clone()
    }
}
