use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime platforms a policy document can carry a branch for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Ios,
    Android,
    Windows,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl PlatformId {
    pub const ALL: [PlatformId; 3] = [PlatformId::Ios, PlatformId::Android, PlatformId::Windows];

    /// Key of this platform's branch in the policy document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformId::Ios => "ios",
            PlatformId::Android => "android",
            PlatformId::Windows => "windows",
        }
    }

    /// The platform this binary was compiled for, if it is one the gate
    /// recognizes.
    #[must_use]
    pub fn current() -> Option<Self> {
        if cfg!(target_os = "ios") {
            Some(PlatformId::Ios)
        } else if cfg!(target_os = "android") {
            Some(PlatformId::Android)
        } else if cfg!(target_os = "windows") {
            Some(PlatformId::Windows)
        } else {
            None
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PlatformId::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}
