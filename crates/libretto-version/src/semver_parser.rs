use crate::{Constraint, VersionError, VersionParser};
use semver::{Version, VersionReq};
use std::sync::Arc;

/// `VersionParser` backed by the semver crate.
///
/// Manifests are allowed to abbreviate versions ("1.0", "v2"); `normalize`
/// pads the missing components and returns the canonical three-component
/// rendering, keeping any pre-release or build suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverParser;

impl SemverParser {
    pub fn new() -> Self {
        Self
    }
}

impl VersionParser for SemverParser {
    fn normalize(&self, raw: &str) -> Result<String, VersionError> {
        let padded =
            pad_version(raw).ok_or_else(|| VersionError::InvalidVersion(raw.to_owned()))?;
        let version =
            Version::parse(&padded).map_err(|_| VersionError::InvalidVersion(raw.to_owned()))?;
        Ok(version.to_string())
    }

    fn parse_constraints(&self, raw: &str) -> Result<Arc<dyn Constraint>, VersionError> {
        let req =
            VersionReq::parse(raw).map_err(|_| VersionError::InvalidConstraint(raw.to_owned()))?;
        Ok(Arc::new(SemverConstraint {
            text: raw.trim().to_owned(),
            req,
        }))
    }
}

#[derive(Debug, Clone)]
struct SemverConstraint {
    text: String,
    req: VersionReq,
}

impl Constraint for SemverConstraint {
    fn matches(&self, version: &str) -> bool {
        let Some(padded) = pad_version(version) else {
            return false;
        };
        Version::parse(&padded).is_ok_and(|v| self.req.matches(&v))
    }

    fn as_text(&self) -> &str {
        &self.text
    }
}

/// Expand an abbreviated version to `major.minor.patch`, preserving any
/// `-pre` or `+build` suffix. Returns `None` for shapes that can never be
/// a version.
fn pad_version(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    let core_end = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(core_end);
    match core.chars().filter(|c| *c == '.').count() {
        0 => Some(format!("{core}.0.0{suffix}")),
        1 => Some(format!("{core}.0{suffix}")),
        2 => Some(format!("{core}{suffix}")),
        _ => None,
    }
}
