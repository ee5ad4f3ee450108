//! Raw manifest document model and schema validation for libretto.
//!
//! This crate defines the untrusted input side of the loader pipeline: the
//! untyped `RawManifest` document, the `SchemaValidator` that checks it
//! against the fixed package-manifest schema and reports every violation
//! found, and the `ManifestResource` capability for documents that live
//! behind a readable resource such as a file.

pub mod resource;
pub mod validate;

pub use resource::{ManifestFile, ManifestResource};
pub use validate::{SchemaValidator, Violation};

use thiserror::Error;

/// An untyped, nested manifest document as read from disk or handed in by
/// a caller. Transient; it carries no identity of its own.
pub type RawManifest = serde_json::Value;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseJson(#[from] serde_json::Error),
}
