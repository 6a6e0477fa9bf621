//! Version rules used by the chart test pipeline.
//!
//! Chart versions are compared with semantic-version precedence. Whether an
//! upgrade from the previously released revision is worth testing depends on
//! whether the new version stays inside the compatibility band of the old
//! one: caret (`^`) for versions `>= 1.0.0`, tilde (`~`) for `0.x`.

mod error;

use std::cmp::Ordering;
use std::fmt;

use semver::{Comparator, Op, Version, VersionReq};

pub use error::VersionError;

pub type Result<T> = std::result::Result<T, VersionError>;

/// Parses a chart version, tolerating a leading `v`.
///
/// # Errors
///
/// Returns [`VersionError::Parse`] if the string is not a semantic version.
pub fn parse_version(version: &str) -> Result<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).map_err(|source| VersionError::Parse {
        version: version.to_string(),
        source,
    })
}

/// Compares two versions by semver precedence. Build metadata is ignored.
///
/// # Errors
///
/// Returns [`VersionError::Parse`] if either version fails to parse.
pub fn compare_versions(left: &str, right: &str) -> Result<Ordering> {
    let left = parse_version(left)?;
    let right = parse_version(right)?;
    Ok(left.cmp_precedence(&right))
}

/// Outcome of the breaking-change gate for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakingChange {
    /// No previous revision exists; there is nothing to upgrade from.
    NewChart,
    /// The new version leaves the compatibility band of the old one.
    Breaking,
    /// The new version stays inside the compatibility band of the old one.
    Compatible,
}

impl BreakingChange {
    /// Whether a breaking change is allowed, which means upgrade testing from
    /// the previous revision is skipped.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        !matches!(self, Self::Compatible)
    }
}

impl fmt::Display for BreakingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NewChart => "chart is new, no previous revision to upgrade from",
            Self::Breaking => "version bump crosses the compatibility band",
            Self::Compatible => "version stays within the compatibility band",
        };
        write!(f, "{s}")
    }
}

/// Builds the compatibility requirement anchored at `version`.
#[must_use]
pub fn compatibility_band(version: &Version) -> VersionReq {
    let op = if version.major == 0 {
        Op::Tilde
    } else {
        Op::Caret
    };
    VersionReq {
        comparators: vec![Comparator {
            op,
            major: version.major,
            minor: Some(version.minor),
            patch: Some(version.patch),
            pre: version.pre.clone(),
        }],
    }
}

/// Decides whether the change from `old_version` to `new_version` is breaking.
///
/// An empty `old_version` means the chart has no previous revision and yields
/// [`BreakingChange::NewChart`].
///
/// Pre-release versions follow semver requirement matching: a pre-release of
/// a different `major.minor.patch` never satisfies the band, so for example
/// `1.2.0 -> 1.2.1-rc.1` counts as breaking while
/// `1.2.0-rc.1 -> 1.2.0` is compatible.
///
/// # Errors
///
/// Returns [`VersionError::Parse`] if either version fails to parse.
pub fn breaking_change_allowed(old_version: &str, new_version: &str) -> Result<BreakingChange> {
    if old_version.trim().is_empty() {
        return Ok(BreakingChange::NewChart);
    }

    let old = parse_version(old_version)?;
    let new = parse_version(new_version)?;

    if compatibility_band(&old).matches(&new) {
        Ok(BreakingChange::Compatible)
    } else {
        Ok(BreakingChange::Breaking)
    }
}

/// Whether `new_version` is strictly greater than `old_version`.
///
/// # Errors
///
/// Returns [`VersionError::Parse`] if either version fails to parse.
pub fn is_version_incremented(old_version: &str, new_version: &str) -> Result<bool> {
    Ok(compare_versions(old_version, new_version)? == Ordering::Less)
}
