use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use manup_core::{Collaborators, HttpMetadataSource, MetadataStore, ValidationCoordinator};
use manup_host::{
    AlwaysReady, AppIdentity, CacheStore, Dialog, LinkLauncher, ReadinessSignal, Translator,
};
use manup_platform::{AppPaths, PlatformId};

use crate::browser::SystemBrowser;
use crate::cache::FileCacheStore;
use crate::error::GateError;
use crate::logging::init_logging;
use crate::settings::GateSettings;

/// Assembles a [`ValidationCoordinator`] from settings and host pieces.
///
/// Only the dialog and the app identity are required; everything else has a
/// default: immediate readiness, builtin English text, the system browser,
/// and a file cache under the app's cache directory.
pub struct GateBuilder {
    settings: GateSettings,
    dialog: Arc<dyn Dialog>,
    identity: Arc<dyn AppIdentity>,
    readiness: Arc<dyn ReadinessSignal>,
    translator: Option<Arc<dyn Translator>>,
    launcher: Arc<dyn LinkLauncher>,
    cache_path: Option<PathBuf>,
    client: Option<reqwest::Client>,
}

impl GateBuilder {
    pub fn new(
        settings: GateSettings,
        dialog: Arc<dyn Dialog>,
        identity: Arc<dyn AppIdentity>,
    ) -> Self {
        Self {
            settings,
            dialog,
            identity,
            readiness: Arc::new(AlwaysReady),
            translator: None,
            launcher: Arc::new(SystemBrowser),
            cache_path: None,
            client: None,
        }
    }

    /// Start from the settings file in `paths`, caching the policy in the
    /// app's cache directory.
    pub fn from_paths(
        paths: &AppPaths,
        dialog: Arc<dyn Dialog>,
        identity: Arc<dyn AppIdentity>,
    ) -> Self {
        let settings = GateSettings::load(paths);
        Self::new(settings, dialog, identity).cache_path(paths.metadata_cache_file())
    }

    /// Entry point for a host app: resolve its directories from `app_dir`,
    /// load its settings and install file logging as those settings ask.
    ///
    /// # Errors
    /// Returns an error when the platform's base directories are unknown.
    pub fn for_app(
        app_dir: &str,
        dialog: Arc<dyn Dialog>,
        identity: Arc<dyn AppIdentity>,
    ) -> Result<Self, GateError> {
        let paths = AppPaths::for_app(app_dir)?;
        let builder = Self::from_paths(&paths, dialog, identity);
        init_logging(&paths, &builder.settings);
        Ok(builder)
    }

    #[must_use]
    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    #[must_use]
    pub fn readiness(mut self, readiness: Arc<dyn ReadinessSignal>) -> Self {
        self.readiness = readiness;
        self
    }

    #[must_use]
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    #[must_use]
    pub fn launcher(mut self, launcher: Arc<dyn LinkLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Use `path` for the file cache instead of the per-app cache directory.
    #[must_use]
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the coordinator.
    ///
    /// # Errors
    /// Returns an error for an unknown platform override or when the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<ValidationCoordinator, GateError> {
        let platform = match self.settings.platform.as_deref() {
            Some(name) => Some(name.parse::<PlatformId>()?),
            None => PlatformId::current(),
        };
        debug!(
            "Update gate for platform {}",
            platform.map_or("unknown", PlatformId::as_str)
        );

        let client = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .build()
                .map_err(GateError::HttpClient)?,
        };
        let source = HttpMetadataSource::new(client, self.settings.url.clone())
            .with_timeout(Duration::from_secs(self.settings.http_timeout_secs));

        let cache = if self.settings.cache_enabled {
            cache_store(self.cache_path, &self.settings.namespace)
        } else {
            None
        };
        let store = MetadataStore::new(Arc::new(source), cache, &self.settings.namespace);

        Ok(ValidationCoordinator::new(
            Collaborators {
                store,
                dialog: self.dialog,
                launcher: self.launcher,
                identity: self.identity,
                readiness: self.readiness,
                translator: self.translator,
                platform,
            },
            self.settings.recheck,
        ))
    }
}

fn cache_store(path: Option<PathBuf>, namespace: &str) -> Option<Arc<dyn CacheStore>> {
    let path = match path {
        Some(path) => path,
        None => match AppPaths::for_app(namespace) {
            Ok(paths) => paths.metadata_cache_file(),
            Err(error) => {
                warn!("Update policy cache disabled: {error}");
                return None;
            }
        },
    };
    Some(Arc::new(FileCacheStore::new(path)))
}
