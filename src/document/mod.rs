//! Schema-less brand profile document.
//!
//! A `ConfigDocument` is a keyed tree of JSON values (string, number,
//! boolean, null, list, nested section). Any brand may carry keys this build
//! knows nothing about; they ride along untouched through every edit.
//!
//! Mutation is copy-on-write: `with_value_at` returns a fresh tree and leaves
//! the receiver intact, so a caller can keep the previous snapshot for
//! comparison or rollback. Profiles are small, so an O(document) clone per
//! edit is the chosen trade-off over a persistent tree.

pub mod fields;
pub mod raw;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::DocumentError;

/// How to treat an intermediate path segment that currently holds a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntermediatePolicy {
    /// Replace any non-section value (absent, scalar or list) with an empty
    /// section and keep descending.
    #[default]
    Coerce,
    /// Refuse to overwrite a list; absent values and scalars are still
    /// replaced.
    RejectSequences,
}

/// Ordered list of keys locating a value inside a `ConfigDocument`.
///
/// Always has at least one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    parents: Vec<String>,
    leaf: String,
}

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Result<Self, DocumentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parents: Vec<String> = segments.into_iter().map(Into::into).collect();
        if let Some(index) = parents.iter().position(|s| s.is_empty()) {
            return Err(DocumentError::EmptySegment { index });
        }
        let leaf = parents.pop().ok_or(DocumentError::EmptyPath)?;
        Ok(Self { parents, leaf })
    }

    /// Parse a dotted path such as `colors.primary`.
    pub fn parse(dotted: &str) -> Result<Self, DocumentError> {
        if dotted.trim().is_empty() {
            return Err(DocumentError::EmptyPath);
        }
        Self::new(dotted.split('.').map(str::trim))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.parents
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.leaf.as_str()))
    }

    pub fn len(&self) -> usize {
        self.parents.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn leaf(&self) -> &str {
        &self.leaf
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<&str> = self.segments().collect();
        f.write_str(&joined.join("."))
    }
}

/// A brand's AI generation profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Accept a JSON value as a document. Only keyed objects qualify.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DocumentError::RootNotObject {
                found: kind_name(&other),
            }),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let mut cursor = &self.0;
        for segment in &path.parents {
            cursor = cursor.get(segment)?.as_object()?;
        }
        cursor.get(&path.leaf)
    }

    /// Write `value` at `path`, coercing any non-section intermediate into
    /// an empty section. Returns the new document; `self` is unchanged.
    pub fn with_value_at(&self, path: &FieldPath, value: Value) -> Self {
        let mut root = self.0.clone();
        coerce_write(&mut root, &path.parents, &path.leaf, value);
        Self(root)
    }

    /// Like [`with_value_at`](Self::with_value_at) but honoring `policy`.
    pub fn try_with_value_at(
        &self,
        path: &FieldPath,
        value: Value,
        policy: IntermediatePolicy,
    ) -> Result<Self, DocumentError> {
        if policy == IntermediatePolicy::RejectSequences {
            self.check_no_sequence(path)?;
        }
        Ok(self.with_value_at(path, value))
    }

    /// Copy of `self` whose top-level `keys` are taken from `source`.
    /// Keys `source` lacks are removed.
    pub fn with_top_level_from(&self, source: &ConfigDocument, keys: &[&str]) -> Self {
        let mut root = self.0.clone();
        for key in keys {
            match source.0.get(*key) {
                Some(value) => {
                    root.insert(key.to_string(), value.clone());
                }
                None => {
                    root.remove(*key);
                }
            }
        }
        Self(root)
    }

    fn check_no_sequence(&self, path: &FieldPath) -> Result<(), DocumentError> {
        let mut cursor = &self.0;
        for segment in &path.parents {
            match cursor.get(segment) {
                Some(Value::Object(child)) => cursor = child,
                Some(Value::Array(_)) => {
                    return Err(DocumentError::SequenceInPath {
                        segment: segment.clone(),
                    });
                }
                // Anything else gets replaced by a fresh section below it.
                _ => return Ok(()),
            }
        }
        Ok(())
    }
}

/// Functional form of [`ConfigDocument::with_value_at`].
pub fn set_at_path(document: &ConfigDocument, path: &FieldPath, value: Value) -> ConfigDocument {
    document.with_value_at(path, value)
}

fn coerce_write(map: &mut Map<String, Value>, parents: &[String], leaf: &str, value: Value) {
    let Some((head, rest)) = parents.split_first() else {
        map.insert(leaf.to_string(), value);
        return;
    };
    let slot = map.entry(head.clone()).or_insert(Value::Null);
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(child) = slot {
        coerce_write(child, rest, leaf, value);
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a keyed document",
    }
}
