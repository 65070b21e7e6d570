use std::collections::BTreeMap;
use std::fmt;

use manup_platform::PlatformId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Version thresholds and enablement for a single platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformPolicy {
    /// Inclusive lower bound; anything older must update before continuing.
    #[serde(rename = "minimum", alias = "minimumVersion")]
    pub minimum_version: String,
    /// Currently recommended version.
    #[serde(rename = "latest", alias = "latestVersion")]
    pub latest_version: String,
    /// Store link opened when the user chooses to update.
    #[serde(rename = "url", alias = "updateUrl")]
    pub update_url: String,
    /// `false` puts the app in maintenance mode regardless of version.
    pub enabled: bool,
}

/// The remote policy document: one optional branch per platform key.
///
/// Branches are kept as raw JSON and only decoded when a platform is looked
/// up, so keys this release does not understand (other platforms, schema
/// markers) never make the document unreadable. They also round-trip through
/// the cache unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyMetadata {
    entries: BTreeMap<String, Value>,
}

impl PolicyMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_platform(mut self, platform: PlatformId, policy: PlatformPolicy) -> Self {
        let branch = json!({
            "minimum": policy.minimum_version,
            "latest": policy.latest_version,
            "url": policy.update_url,
            "enabled": policy.enabled,
        });
        self.entries.insert(platform.as_str().to_string(), branch);
        self
    }

    /// Decode the branch for `platform`. An absent or `null` branch is
    /// `Ok(None)`.
    ///
    /// # Errors
    /// Returns the decode error when the branch exists but is not a valid
    /// policy.
    pub fn platform(
        &self,
        platform: PlatformId,
    ) -> Result<Option<PlatformPolicy>, serde_json::Error> {
        match self.entries.get(platform.as_str()) {
            None | Some(Value::Null) => Ok(None),
            Some(branch) => PlatformPolicy::deserialize(branch).map(Some),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Maintenance,
    Mandatory,
    Optional,
}

impl AlertKind {
    #[must_use]
    pub fn title_key(self) -> TranslationKey {
        match self {
            AlertKind::Maintenance => TranslationKey::MaintenanceTitle,
            AlertKind::Mandatory => TranslationKey::MandatoryTitle,
            AlertKind::Optional => TranslationKey::OptionalTitle,
        }
    }

    #[must_use]
    pub fn text_key(self) -> TranslationKey {
        match self {
            AlertKind::Maintenance => TranslationKey::MaintenanceText,
            AlertKind::Mandatory => TranslationKey::MandatoryText,
            AlertKind::Optional => TranslationKey::OptionalText,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationKey {
    MaintenanceTitle,
    MaintenanceText,
    MandatoryTitle,
    MandatoryText,
    OptionalTitle,
    OptionalText,
    ButtonUpdate,
    ButtonLater,
}

impl TranslationKey {
    pub const ALL: [TranslationKey; 8] = [
        TranslationKey::MaintenanceTitle,
        TranslationKey::MaintenanceText,
        TranslationKey::MandatoryTitle,
        TranslationKey::MandatoryText,
        TranslationKey::OptionalTitle,
        TranslationKey::OptionalText,
        TranslationKey::ButtonUpdate,
        TranslationKey::ButtonLater,
    ];

    /// Dotted key used by translation catalogs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TranslationKey::MaintenanceTitle => "maintenance.title",
            TranslationKey::MaintenanceText => "maintenance.text",
            TranslationKey::MandatoryTitle => "mandatory.title",
            TranslationKey::MandatoryText => "mandatory.text",
            TranslationKey::OptionalTitle => "optional.title",
            TranslationKey::OptionalText => "optional.text",
            TranslationKey::ButtonUpdate => "buttons.update",
            TranslationKey::ButtonLater => "buttons.later",
        }
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Update,
    Later,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertButton {
    pub label: String,
    pub choice: DialogChoice,
}

/// Fully rendered alert handed to the host's dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub text: String,
    pub buttons: Vec<AlertButton>,
    pub update_url: String,
}
