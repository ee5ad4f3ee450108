use crate::package::{
    DistDescriptor, License, Link, Package, RelationKind, SourceDescriptor,
};
use crate::LoadError;
use libretto_schema::{ManifestResource, RawManifest, SchemaValidator};
use libretto_version::VersionParser;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Identifying path reported for documents handed in already parsed.
const DOCUMENT_ORIGIN: &str = "<document>";

/// The two ways a manifest reaches the loader.
pub enum ManifestSource<'a> {
    /// An already-parsed document.
    Document(&'a RawManifest),
    /// A loadable resource; its raw form is schema-validated before any
    /// further interpretation.
    Resource(&'a dyn ManifestResource),
}

/// Turns raw manifest documents into validated `Package` entities.
///
/// Both collaborators are wired explicitly; there is no implicit default
/// parser or validator.
pub struct PackageLoader {
    parser: Arc<dyn VersionParser>,
    validator: SchemaValidator,
}

impl PackageLoader {
    pub fn new(parser: Arc<dyn VersionParser>, validator: SchemaValidator) -> Self {
        Self { parser, validator }
    }

    /// Load a package from either an already-parsed document or a loadable
    /// resource. Schema validation is enforced on both paths; no partially
    /// populated `Package` escapes any failure.
    pub fn load(&self, source: ManifestSource<'_>) -> Result<Package, LoadError> {
        match source {
            ManifestSource::Resource(resource) => {
                let doc = resource.read_raw()?;
                self.check_schema(&doc, &resource.path().display().to_string())?;
                self.build(&doc)
            }
            ManifestSource::Document(doc) => {
                self.check_schema(doc, DOCUMENT_ORIGIN)?;
                self.build(doc)
            }
        }
    }

    fn check_schema(&self, doc: &RawManifest, origin: &str) -> Result<(), LoadError> {
        let violations = self.validator.validate(doc);
        if violations.is_empty() {
            debug!(origin, "manifest passed schema validation");
            Ok(())
        } else {
            debug!(origin, count = violations.len(), "manifest failed schema validation");
            Err(LoadError::SchemaValidation {
                path: origin.to_owned(),
                violations,
            })
        }
    }

    fn build(&self, doc: &RawManifest) -> Result<Package, LoadError> {
        let name = str_field(doc, "name")
            .ok_or(LoadError::MissingField("name"))?
            .to_lowercase();
        let raw_version = str_field(doc, "version").ok_or(LoadError::MissingField("version"))?;
        let version = self.parser.normalize(raw_version)?;

        let mut package = Package::new(name, version);
        if let Some(kind) = str_field(doc, "type") {
            package.kind = kind.to_owned();
        }
        package.description = str_field(doc, "description").map(ToOwned::to_owned);
        package.extra = doc.get("extra").cloned();
        package.license = doc.get("license").map(load_license);
        package.source = doc.get("source").map(load_source).transpose()?;
        package.dist = doc.get("dist").map(load_dist).transpose()?;

        for kind in RelationKind::ALL {
            if let Some(block) = doc.get(kind.as_key()) {
                package.relations[kind.index()] =
                    self.load_links(&package.name, kind, block)?;
            }
        }

        Ok(package)
    }

    fn load_links(
        &self,
        source_name: &str,
        kind: RelationKind,
        block: &Value,
    ) -> Result<Vec<Link>, LoadError> {
        let entries = block.as_object().ok_or_else(|| LoadError::MalformedRelation {
            kind: kind.as_key(),
            fragment: block.to_string(),
        })?;

        let mut links = Vec::with_capacity(entries.len());
        for (target, expr) in entries {
            let expr = expr.as_str().ok_or_else(|| LoadError::MalformedRelation {
                kind: kind.as_key(),
                fragment: block.to_string(),
            })?;
            let constraint = self.parser.parse_constraints(expr)?;
            links.push(Link {
                source: source_name.to_owned(),
                target: target.to_lowercase(),
                constraint,
                kind,
            });
        }
        Ok(links)
    }
}

fn str_field<'a>(doc: &'a RawManifest, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

fn load_license(value: &Value) -> License {
    match value {
        Value::Array(items) => License::Multiple(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect(),
        ),
        other => License::Single(other.as_str().unwrap_or_default().to_owned()),
    }
}

fn load_source(fragment: &Value) -> Result<SourceDescriptor, LoadError> {
    match (
        fragment.get("type").and_then(Value::as_str),
        fragment.get("url").and_then(Value::as_str),
    ) {
        (Some(kind), Some(url)) => Ok(SourceDescriptor {
            kind: kind.to_owned(),
            url: url.to_owned(),
            reference: fragment
                .get("reference")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
        }),
        _ => Err(LoadError::MalformedSource(fragment.to_string())),
    }
}

fn load_dist(fragment: &Value) -> Result<DistDescriptor, LoadError> {
    match (
        fragment.get("type").and_then(Value::as_str),
        fragment.get("url").and_then(Value::as_str),
        fragment.get("shasum").and_then(Value::as_str),
    ) {
        (Some(kind), Some(url), Some(shasum)) => Ok(DistDescriptor {
            kind: kind.to_owned(),
            url: url.to_owned(),
            reference: fragment
                .get("reference")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
            shasum: shasum.to_owned(),
        }),
        _ => Err(LoadError::MalformedDist(fragment.to_string())),
    }
}
