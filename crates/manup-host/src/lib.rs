//! Host-facing seams of the update gate.
//!
//! Everything the gate needs from the embedding application is expressed as
//! a trait here: where the policy document comes from, where it is cached,
//! how alerts are shown and translated, how update links are opened, when
//! the host is ready, and which version is running. The document and alert
//! types shared across those seams live here too.

mod error;
mod traits;
mod types;

pub use error::{CacheError, NetworkStage, SourceError};
pub use traits::{
    AlwaysReady, AppIdentity, CacheStore, Dialog, LinkLauncher, MetadataSource, ReadinessSignal,
    StaticIdentity, Translator,
};
pub use types::{
    Alert, AlertButton, AlertKind, DialogChoice, PlatformPolicy, PolicyMetadata, TranslationKey,
};
