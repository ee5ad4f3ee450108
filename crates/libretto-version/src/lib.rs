//! Version normalization and constraint parsing seam for libretto.
//!
//! The loader consumes versions through the narrow `VersionParser` trait:
//! `normalize` turns a raw version string into its canonical form, and
//! `parse_constraints` turns a constraint expression into an opaque
//! `Constraint` matcher. Callers wire a concrete implementation explicitly;
//! `SemverParser` is the one shipped here.

pub mod semver_parser;

pub use semver_parser::SemverParser;

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid version string '{0}'")]
    InvalidVersion(String),
    #[error("invalid version constraint '{0}'")]
    InvalidConstraint(String),
}

/// An opaque version matcher produced from a constraint expression.
///
/// Links hold these as `Arc<dyn Constraint>`; equality between links is
/// defined over `as_text`, never over matcher internals.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Whether a candidate version satisfies this constraint.
    fn matches(&self, version: &str) -> bool;

    /// The constraint expression this matcher was parsed from.
    fn as_text(&self) -> &str;
}

/// Normalizes version strings and parses constraint expressions.
pub trait VersionParser: Send + Sync {
    fn normalize(&self, raw: &str) -> Result<String, VersionError>;

    fn parse_constraints(&self, raw: &str) -> Result<Arc<dyn Constraint>, VersionError>;
}
