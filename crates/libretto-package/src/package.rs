use libretto_version::Constraint;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The six kinds of relationship a package may declare toward another,
/// in the fixed order the loader processes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Require,
    Conflict,
    Provide,
    Replace,
    Recommend,
    Suggest,
}

impl RelationKind {
    pub const ALL: [RelationKind; 6] = [
        RelationKind::Require,
        RelationKind::Conflict,
        RelationKind::Provide,
        RelationKind::Replace,
        RelationKind::Recommend,
        RelationKind::Suggest,
    ];

    /// The manifest key this relation is declared under.
    pub fn as_key(self) -> &'static str {
        match self {
            RelationKind::Require => "require",
            RelationKind::Conflict => "conflict",
            RelationKind::Provide => "provide",
            RelationKind::Replace => "replace",
            RelationKind::Recommend => "recommend",
            RelationKind::Suggest => "suggest",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            RelationKind::Require => 0,
            RelationKind::Conflict => 1,
            RelationKind::Provide => 2,
            RelationKind::Replace => 3,
            RelationKind::Recommend => 4,
            RelationKind::Suggest => 5,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            RelationKind::Require => "requires",
            RelationKind::Conflict => "conflicts with",
            RelationKind::Provide => "provides",
            RelationKind::Replace => "replaces",
            RelationKind::Recommend => "recommends",
            RelationKind::Suggest => "suggests",
        };
        f.write_str(verb)
    }
}

/// Where a package's sources can be checked out from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub kind: String,
    pub url: String,
    pub reference: Option<String>,
}

/// Where a package's distribution archive can be downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistDescriptor {
    pub kind: String,
    pub url: String,
    pub reference: Option<String>,
    pub shasum: String,
}

/// A manifest may declare its license as one string or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum License {
    Single(String),
    Multiple(Vec<String>),
}

/// One declared relationship edge: the source package points at a target
/// package name under a version constraint.
///
/// Targets are name-keyed references, never pointers into other `Package`
/// entities; resolving them is the solver's job.
#[derive(Debug, Clone)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub constraint: Arc<dyn Constraint>,
    pub kind: RelationKind,
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.kind == other.kind
            && self.constraint.as_text() == other.constraint.as_text()
    }
}

impl Eq for Link {}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.source,
            self.kind,
            self.target,
            self.constraint.as_text()
        )
    }
}

/// A validated, typed package entity. Identity is (name, normalized
/// version); the loader constructs one per successful load and never
/// revalidates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) kind: String,
    pub(crate) description: Option<String>,
    pub(crate) extra: Option<Value>,
    pub(crate) license: Option<License>,
    pub(crate) source: Option<SourceDescriptor>,
    pub(crate) dist: Option<DistDescriptor>,
    pub(crate) relations: [Vec<Link>; 6],
}

impl Package {
    /// A bare package with just an identity. Repositories hand these out;
    /// fully populated entities come from the loader.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind: "library".to_owned(),
            description: None,
            extra: None,
            license: None,
            source: None,
            dist: None,
            relations: Default::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn extra(&self) -> Option<&Value> {
        self.extra.as_ref()
    }

    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }

    pub fn source(&self) -> Option<&SourceDescriptor> {
        self.source.as_ref()
    }

    pub fn dist(&self) -> Option<&DistDescriptor> {
        self.dist.as_ref()
    }

    /// The ordered links declared under one relation kind.
    pub fn links(&self, kind: RelationKind) -> &[Link] {
        &self.relations[kind.index()]
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
