use std::path::Path;

use log::warn;
use manup_core::RecheckPolicy;
use manup_platform::AppPaths;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSettings {
    /// Location of the policy document.
    #[serde(default)]
    pub url: String,

    /// Prefix of the cache key, `"<namespace>.manup"`.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub recheck: RecheckPolicy,

    /// Forces a platform branch instead of the compile target's.
    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_namespace() -> String {
    "app".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            namespace: default_namespace(),
            http_timeout_secs: default_http_timeout(),
            recheck: RecheckPolicy::default(),
            platform: None,
            cache_enabled: true,
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl GateSettings {
    /// Load settings from the application's config directory, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load(paths: &AppPaths) -> Self {
        let settings_path = paths.settings_file();
        match Self::load_from_path(&settings_path) {
            Ok(settings) => settings,
            Err(error) => {
                warn!(
                    "Ignoring settings at {}: {error}",
                    settings_path.display()
                );
                Self::default()
            }
        }
    }

    /// Read settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|error| SettingsError::io("read", error))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write settings as pretty JSON, creating the parent directory.
    ///
    /// # Errors
    /// Returns an error when the directory or file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|error| SettingsError::io("create directory for", error))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|error| SettingsError::io("write", error))?;
        Ok(())
    }
}
