use std::cmp::Ordering;
use std::fmt;

use manup_host::{AlertKind, PlatformPolicy};

use crate::version::{VersionError, compare_versions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Proceed,
    Optional,
    Mandatory,
    Disabled,
}

impl Classification {
    /// The alert shown for this outcome; `Proceed` shows nothing.
    #[must_use]
    pub fn alert_kind(self) -> Option<AlertKind> {
        match self {
            Classification::Proceed => None,
            Classification::Optional => Some(AlertKind::Optional),
            Classification::Mandatory => Some(AlertKind::Mandatory),
            Classification::Disabled => Some(AlertKind::Maintenance),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Proceed => "proceed",
            Classification::Optional => "optional update",
            Classification::Mandatory => "mandatory update",
            Classification::Disabled => "maintenance",
        };
        f.write_str(label)
    }
}

/// Classify `running` against a platform policy.
///
/// A disabled policy wins without looking at versions. A version equal to a
/// threshold satisfies it.
///
/// # Errors
/// Returns [`VersionError`] when a compared version is malformed.
pub fn classify(policy: &PlatformPolicy, running: &str) -> Result<Classification, VersionError> {
    if !policy.enabled {
        return Ok(Classification::Disabled);
    }

    if compare_versions(running, &policy.minimum_version)? == Ordering::Less {
        return Ok(Classification::Mandatory);
    }

    if compare_versions(running, &policy.latest_version)? == Ordering::Less {
        return Ok(Classification::Optional);
    }

    Ok(Classification::Proceed)
}
