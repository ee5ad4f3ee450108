use crate::RawManifest;
use serde_json::Value;
use std::fmt;

/// The six relation keys a manifest may declare, in the order the loader
/// processes them.
pub const RELATION_KEYS: [&str; 6] = [
    "require",
    "conflict",
    "provide",
    "replace",
    "recommend",
    "suggest",
];

/// A single schema violation, locating the offending key and describing
/// what was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// What shape a known top-level manifest key must have.
#[derive(Debug, Clone, Copy)]
enum KeyShape {
    String,
    Object,
    StringOrStringList,
    RelationMap,
}

const REQUIRED_KEYS: [(&str, KeyShape); 2] =
    [("name", KeyShape::String), ("version", KeyShape::String)];

const OPTIONAL_KEYS: [(&str, KeyShape); 6] = [
    ("type", KeyShape::String),
    ("description", KeyShape::String),
    ("license", KeyShape::StringOrStringList),
    ("extra", KeyShape::Object),
    ("source", KeyShape::Object),
    ("dist", KeyShape::Object),
];

/// Checks a raw manifest document against the fixed package-manifest
/// schema. Collects every violation found rather than stopping at the
/// first, and never mutates the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, doc: &RawManifest) -> Vec<Violation> {
        let mut violations = Vec::new();

        let Some(map) = doc.as_object() else {
            violations.push(Violation {
                path: "$".to_owned(),
                message: "manifest must be a JSON object".to_owned(),
            });
            return violations;
        };

        for (key, shape) in REQUIRED_KEYS {
            match map.get(key) {
                None => violations.push(Violation {
                    path: key.to_owned(),
                    message: "required key is missing".to_owned(),
                }),
                Some(value) => check_shape(key, value, shape, &mut violations),
            }
        }

        for (key, shape) in OPTIONAL_KEYS {
            if let Some(value) = map.get(key) {
                check_shape(key, value, shape, &mut violations);
            }
        }

        for key in RELATION_KEYS {
            if let Some(value) = map.get(key) {
                check_shape(key, value, KeyShape::RelationMap, &mut violations);
            }
        }

        for key in map.keys() {
            if !is_known_key(key) {
                violations.push(Violation {
                    path: key.clone(),
                    message: "unknown key".to_owned(),
                });
            }
        }

        violations
    }
}

fn is_known_key(key: &str) -> bool {
    REQUIRED_KEYS.iter().any(|(k, _)| *k == key)
        || OPTIONAL_KEYS.iter().any(|(k, _)| *k == key)
        || RELATION_KEYS.contains(&key)
}

fn check_shape(key: &str, value: &Value, shape: KeyShape, violations: &mut Vec<Violation>) {
    match shape {
        KeyShape::String => {
            if !value.is_string() {
                violations.push(Violation {
                    path: key.to_owned(),
                    message: "expected a string".to_owned(),
                });
            }
        }
        KeyShape::Object => {
            if !value.is_object() {
                violations.push(Violation {
                    path: key.to_owned(),
                    message: "expected an object".to_owned(),
                });
            }
        }
        KeyShape::StringOrStringList => {
            let ok = match value {
                Value::String(_) => true,
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            };
            if !ok {
                violations.push(Violation {
                    path: key.to_owned(),
                    message: "expected a string or a list of strings".to_owned(),
                });
            }
        }
        KeyShape::RelationMap => {
            let Some(entries) = value.as_object() else {
                violations.push(Violation {
                    path: key.to_owned(),
                    message: "expected an object mapping package names to constraints".to_owned(),
                });
                return;
            };
            for (target, constraint) in entries {
                if !constraint.is_string() {
                    violations.push(Violation {
                        path: format!("{key}.{target}"),
                        message: "constraint must be a string".to_owned(),
                    });
                }
            }
        }
    }
}
