use std::cmp::Ordering;

use semver::{BuildMetadata, Version};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid version format: {version:?}")]
    InvalidFormat { version: String },
}

/// Compare two version strings by semantic-version precedence.
///
/// A leading `v` and the short forms `1` and `1.2` are accepted. Build
/// metadata does not take part in the ordering.
///
/// # Errors
/// Returns [`VersionError::InvalidFormat`] when either side is not a
/// semantic version.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionError> {
    let a = parse_version(a)?;
    let b = parse_version(b)?;
    Ok(a.cmp(&b))
}

/// Parse a version string, normalizing short forms to `major.minor.patch`.
///
/// # Errors
/// Returns [`VersionError::InvalidFormat`] when the string cannot be read as
/// a semantic version.
pub fn parse_version(version: &str) -> Result<Version, VersionError> {
    let mut parsed = parse_semver(version).ok_or_else(|| VersionError::InvalidFormat {
        version: version.to_string(),
    })?;
    parsed.build = BuildMetadata::EMPTY;
    Ok(parsed)
}

fn parse_semver(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let version = trimmed.strip_prefix('v').unwrap_or(trimmed);

    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }

    let (core, suffix) = split_semver_core_and_suffix(version);
    let mut parts = core.split('.');
    let major = parts.next()?.parse::<u64>().ok()?;
    let minor = parts.next().map(str::parse::<u64>).transpose().ok()?;
    let patch = parts.next().map(str::parse::<u64>).transpose().ok()?;

    if parts.next().is_some() {
        return None;
    }

    let normalized = match (minor, patch) {
        (None, None) => format!("{major}.0.0{suffix}"),
        (Some(minor), None) => format!("{major}.{minor}.0{suffix}"),
        (Some(minor), Some(patch)) => format!("{major}.{minor}.{patch}{suffix}"),
        (None, Some(_)) => return None,
    };

    Version::parse(&normalized).ok()
}

fn split_semver_core_and_suffix(version: &str) -> (&str, &str) {
    let suffix_idx = version.find(['-', '+']).unwrap_or(version.len());
    (&version[..suffix_idx], &version[suffix_idx..])
}
