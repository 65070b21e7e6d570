//! Single-flight orchestration of the update check.
//!
//! The first [`ValidationCoordinator::validate`] call spawns the pipeline
//! (readiness → fetch → select → classify → present) as a Tokio task; every
//! other call, concurrent or later, awaits that same task's outcome.
//!
//! Blocking outcomes are modelled literally: for a mandatory update or
//! maintenance mode the pipeline never settles, so callers of `validate`
//! stay pending for the rest of the process. There is no timeout and no
//! cancellation path.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, error, info, warn};
use manup_host::{
    Alert, AlertKind, AppIdentity, Dialog, DialogChoice, LinkLauncher, ReadinessSignal,
    Translator,
};
use manup_platform::PlatformId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::alert::build_alert;
use crate::decision::{Classification, classify};
use crate::select::{SelectError, select_platform};
use crate::store::{MetadataStore, StoreError};
use crate::version::VersionError;

/// How a settled check lets the application continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The running version satisfies the policy.
    UpToDate,
    /// An optional update was offered and the user chose "later".
    UpdateDeferred,
    /// The check itself failed; the gate fails open.
    FailedOpen { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Checking,
    Resolved,
}

/// Whether a call made after a session resolved starts a fresh check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecheckPolicy {
    /// One check per coordinator; later calls get the first outcome.
    #[default]
    Never,
    AfterResolution,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Everything the pipeline talks to.
pub struct Collaborators {
    pub store: MetadataStore,
    pub dialog: Arc<dyn Dialog>,
    pub launcher: Arc<dyn LinkLauncher>,
    pub identity: Arc<dyn AppIdentity>,
    pub readiness: Arc<dyn ReadinessSignal>,
    pub translator: Option<Arc<dyn Translator>>,
    /// `None` when the running platform is not a recognized one.
    pub platform: Option<PlatformId>,
}

/// Pause between opening the store link and showing the mandatory alert
/// again. Bounds how often the link opens when a dialog answers instantly.
const MANDATORY_RESHOW_DELAY: Duration = Duration::from_millis(250);

type SessionReceiver = watch::Receiver<Option<GateOutcome>>;

pub struct ValidationCoordinator {
    pipeline: Arc<Collaborators>,
    recheck: RecheckPolicy,
    session: Mutex<Option<SessionReceiver>>,
}

impl ValidationCoordinator {
    #[must_use]
    pub fn new(collaborators: Collaborators, recheck: RecheckPolicy) -> Self {
        Self {
            pipeline: Arc::new(collaborators),
            recheck,
            session: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        match session.as_ref() {
            None => SessionState::Idle,
            Some(receiver) if receiver.borrow().is_none() => SessionState::Checking,
            Some(_) => SessionState::Resolved,
        }
    }

    /// Run the update check, or join the one already started.
    ///
    /// Resolves once the application may continue. For mandatory updates and
    /// maintenance mode this future never resolves; callers block for good.
    /// Must be called from within a Tokio runtime.
    pub async fn validate(&self) -> GateOutcome {
        let mut receiver = self.session();
        let settled = match receiver.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).clone(),
            Err(_) => None,
        };
        if let Some(outcome) = settled {
            return outcome;
        }
        // The session task keeps its sender alive until it publishes, so
        // this is only reached while the runtime is shutting down.
        std::future::pending().await
    }

    fn session(&self) -> SessionReceiver {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(receiver) = session.as_ref() {
            let resolved = receiver.borrow().is_some();
            if !resolved || self.recheck == RecheckPolicy::Never {
                debug!("Joining existing update check");
                return receiver.clone();
            }
            debug!("Previous update check resolved, starting a new one");
        }

        let (sender, receiver) = watch::channel(None);
        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move {
            let outcome = match tokio::spawn(async move { pipeline.run().await }).await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    error!("Update check task failed: {join_error}");
                    GateOutcome::FailedOpen {
                        reason: join_error.to_string(),
                    }
                }
            };
            sender.send_replace(Some(outcome));
        });

        *session = Some(receiver.clone());
        receiver
    }
}

impl Collaborators {
    async fn run(&self) -> GateOutcome {
        match self.check().await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("Update check failed, letting the app continue: {error}");
                GateOutcome::FailedOpen {
                    reason: error.to_string(),
                }
            }
        }
    }

    async fn check(&self) -> Result<GateOutcome, PipelineError> {
        self.readiness.ready().await;

        let metadata = self.store.fetch().await?;
        let policy = select_platform(Some(&metadata), self.platform)?;
        let running = self.identity.version().await;
        let classification = classify(&policy, &running).inspect_err(|error| {
            error!("Update policy has an unusable version: {error}");
        })?;
        info!("Update check for version {running}: {classification}");

        if classification == Classification::Proceed {
            return Ok(GateOutcome::UpToDate);
        }

        let app_name = self.identity.name().await;
        match build_alert(classification, &policy, &app_name, self.translator.as_deref()) {
            Some(alert) => Ok(self.present(&alert).await),
            None => Ok(GateOutcome::UpToDate),
        }
    }

    async fn present(&self, alert: &Alert) -> GateOutcome {
        loop {
            let choice = self.dialog.show(alert).await;
            match (alert.kind, choice) {
                (AlertKind::Optional, DialogChoice::Later) => {
                    debug!("Optional update deferred");
                    return GateOutcome::UpdateDeferred;
                }
                (AlertKind::Optional, DialogChoice::Update) => {
                    self.launcher.open(&alert.update_url);
                    break;
                }
                // The mandatory alert stays up after opening the store link.
                (AlertKind::Mandatory, DialogChoice::Update) => {
                    self.launcher.open(&alert.update_url);
                    tokio::time::sleep(MANDATORY_RESHOW_DELAY).await;
                }
                (AlertKind::Mandatory | AlertKind::Maintenance, _) => break,
            }
        }

        debug!("Blocking on {:?} alert", alert.kind);
        std::future::pending().await
    }
}
