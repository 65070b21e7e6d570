//! Decision engine of the update gate.
//!
//! This crate holds the logic that is independent of any host UI:
//! - Semantic version comparison.
//! - Policy document retrieval with cached fallback.
//! - Platform branch selection and outcome classification.
//! - Alert text rendering with optional translations.
//! - Single-flight coordination of the whole check.

mod alert;
mod coordinator;
mod decision;
mod readiness;
mod select;
mod source;
mod store;
#[cfg(test)]
mod testing;
mod version;

/// Localized alert rendering.
pub use alert::build_alert;
/// Check orchestration and its outcomes.
pub use coordinator::{
    Collaborators, GateOutcome, PipelineError, RecheckPolicy, SessionState,
    ValidationCoordinator,
};
/// Outcome classification for a platform policy.
pub use decision::{Classification, classify};
/// Readiness latch for hosts without their own signal.
pub use readiness::ReadyFlag;
/// Platform branch selection.
pub use select::{SelectError, select_platform};
/// HTTP policy source.
pub use source::HttpMetadataSource;
/// Fetch-with-fallback metadata store and an in-memory cache.
pub use store::{MemoryCacheStore, MetadataStore, StoreError};
/// Version comparison helpers.
pub use version::{VersionError, compare_versions, parse_version};
