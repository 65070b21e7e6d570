use manup_host::{PlatformPolicy, PolicyMetadata};
use manup_platform::PlatformId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("policy metadata is missing")]
    MetadataMissing,
    #[error("no update policy for platform {}", .platform.map_or("unknown", PlatformId::as_str))]
    UnsupportedPlatform { platform: Option<PlatformId> },
    #[error("update policy for platform {platform} is malformed: {details}")]
    MalformedPolicy {
        platform: PlatformId,
        details: String,
    },
}

/// Pick the policy branch for `platform`.
///
/// `None` for `platform` means the running platform is not one the gate
/// recognizes. Branches are never borrowed from another platform.
///
/// # Errors
/// [`SelectError::MetadataMissing`] without a document,
/// [`SelectError::UnsupportedPlatform`] when there is no branch and
/// [`SelectError::MalformedPolicy`] when the branch does not decode.
pub fn select_platform(
    metadata: Option<&PolicyMetadata>,
    platform: Option<PlatformId>,
) -> Result<PlatformPolicy, SelectError> {
    let metadata = metadata.ok_or(SelectError::MetadataMissing)?;
    let Some(platform) = platform else {
        return Err(SelectError::UnsupportedPlatform { platform: None });
    };
    metadata
        .platform(platform)
        .map_err(|error| SelectError::MalformedPolicy {
            platform,
            details: error.to_string(),
        })?
        .ok_or(SelectError::UnsupportedPlatform {
            platform: Some(platform),
        })
}
