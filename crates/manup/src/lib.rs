//! Host wiring for the update gate.
//!
//! [`GateBuilder`] turns [`GateSettings`] plus the host's dialog and app
//! identity into a ready [`manup_core::ValidationCoordinator`], filling the
//! remaining seams with the adapters in this crate.

mod browser;
mod cache;
mod error;
mod gate;
mod logging;
mod settings;

pub use browser::SystemBrowser;
pub use cache::FileCacheStore;
pub use error::{GateError, SettingsError};
pub use gate::GateBuilder;
pub use logging::{init_logging, set_logging_enabled};
pub use settings::GateSettings;

pub use manup_core::{GateOutcome, RecheckPolicy, SessionState, ValidationCoordinator};
