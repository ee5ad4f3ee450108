use crate::{RawManifest, SchemaError};
use std::fs;
use std::path::{Path, PathBuf};

/// A manifest document that lives behind a readable resource.
///
/// The loader validates the raw form returned by `read_raw` before it
/// parses anything into a working document, so a malformed manifest is
/// rejected with its identifying path intact.
pub trait ManifestResource: Send + Sync {
    /// Read the resource into an untyped document without interpreting it.
    fn read_raw(&self) -> Result<RawManifest, SchemaError>;

    /// The identifying path of the resource, for diagnostics.
    fn path(&self) -> &Path;
}

/// A manifest stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ManifestResource for ManifestFile {
    fn read_raw(&self) -> Result<RawManifest, SchemaError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
