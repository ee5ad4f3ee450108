//! Package entity, relation links, and the manifest loader for libretto.
//!
//! This crate turns a schema-validated raw manifest into the typed
//! `Package` entity the rest of the tool consumes: identity (name and
//! normalized version), source/dist descriptors, and the six ordered
//! relation groups (`require`, `conflict`, `provide`, `replace`,
//! `recommend`, `suggest`) expressed as name-keyed `Link`s.

pub mod loader;
pub mod package;

pub use loader::{ManifestSource, PackageLoader};
pub use package::{
    DistDescriptor, License, Link, Package, RelationKind, SourceDescriptor,
};

use libretto_schema::{SchemaError, Violation};
use libretto_version::VersionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("manifest '{path}' failed schema validation: {}", .violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    SchemaValidation {
        path: String,
        violations: Vec<Violation>,
    },
    #[error("package source should be specified as {{\"type\": ..., \"url\": ...}}, {0} given")]
    MalformedSource(String),
    #[error("package dist should be specified as {{\"type\": ..., \"url\": ..., \"shasum\": ...}}, {0} given")]
    MalformedDist(String),
    #[error("{kind} block must map package names to constraint strings, {fragment} given")]
    MalformedRelation {
        kind: &'static str,
        fragment: String,
    },
    #[error("manifest is missing required key '{0}'")]
    MissingField(&'static str),
    #[error(transparent)]
    Version(#[from] VersionError),
}
