use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppPathsError {
    #[error("Could not determine home directory")]
    HomeDirUnavailable,
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,
    #[error("Could not determine cache directory")]
    CacheDirUnavailable,
    #[error("Could not determine data directory")]
    DataDirUnavailable,
}

/// Where a host app keeps the gate's settings, policy cache and log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the per-user directories for `app_dir`.
    ///
    /// # Errors
    /// Returns an error when the platform does not report one of the base
    /// directories.
    pub fn for_app(app_dir: &str) -> Result<Self, AppPathsError> {
        #[cfg(target_os = "macos")]
        {
            let support = dirs::home_dir()
                .ok_or(AppPathsError::HomeDirUnavailable)?
                .join("Library");
            Ok(Self {
                config_dir: support.join("Application Support").join(app_dir),
                cache_dir: support.join("Caches").join(app_dir),
                data_dir: support.join("Application Support").join(app_dir),
            })
        }

        #[cfg(not(target_os = "macos"))]
        {
            let under = |base: Option<PathBuf>, missing: AppPathsError| {
                base.map(|base| base.join(app_dir)).ok_or(missing)
            };
            Ok(Self {
                config_dir: under(dirs::config_dir(), AppPathsError::ConfigDirUnavailable)?,
                cache_dir: under(dirs::cache_dir(), AppPathsError::CacheDirUnavailable)?,
                data_dir: under(dirs::data_dir(), AppPathsError::DataDirUnavailable)?,
            })
        }
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    #[must_use]
    pub fn metadata_cache_file(&self) -> PathBuf {
        self.cache_dir.join("manup-cache.json")
    }

    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("debug.log")
    }
}
