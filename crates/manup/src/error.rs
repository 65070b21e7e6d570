use manup_platform::{AppPathsError, UnknownPlatform};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to {action} settings: {source}")]
    Io {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SettingsError {
    pub(crate) fn io(action: &'static str, source: std::io::Error) -> Self {
        Self::Io { action, source }
    }
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error("invalid platform override: {0}")]
    InvalidPlatform(#[from] UnknownPlatform),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("failed to locate application directories: {0}")]
    Paths(#[from] AppPathsError),
}
