use crate::errors::PatchError;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A key path such as `a.b.c`.
///
/// Segments are split on every `.`, so `a..b` has an empty middle key and
/// an empty string is a path to the `""` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedPath {
    parents: Vec<String>,
    leaf: String,
}

impl DottedPath {
    /// Parses a dotted path.
    pub fn parse(raw: &str) -> Self {
        let mut parents: Vec<String> = raw.split('.').map(str::to_owned).collect();
        let leaf = parents.pop().unwrap_or_default();
        Self { parents, leaf }
    }

    /// Returns the path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.parents
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.leaf.as_str()))
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// One `key.path=<json>` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Where to write.
    pub path: DottedPath,
    /// What to write.
    pub value: Value,
}

impl Assignment {
    /// Parses `key.path=<json>`, splitting at the first `=`.
    ///
    /// # Errors
    ///
    /// - [`PatchError::MissingEquals`] if there is no `=`
    /// - [`PatchError::InvalidValue`] if the value is not JSON
    pub fn parse(raw: &str) -> Result<Self, PatchError> {
        let (key, literal) = raw
            .split_once('=')
            .ok_or_else(|| PatchError::MissingEquals(raw.to_string()))?;
        let path = DottedPath::parse(key);
        let value = serde_json::from_str(literal).map_err(|source| PatchError::InvalidValue {
            path: key.to_string(),
            source,
        })?;
        Ok(Self { path, value })
    }
}

impl FromStr for Assignment {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Writes `assignment.value` at `assignment.path` inside `doc`.
///
/// Missing intermediate keys become empty objects. An intermediate value
/// that is not an object is replaced by one, discarding it.
///
/// # Errors
///
/// Returns [`PatchError::RootNotObject`] if `doc` is not an object.
pub fn apply(doc: &mut Value, assignment: &Assignment) -> Result<(), PatchError> {
    let mut current = doc.as_object_mut().ok_or(PatchError::RootNotObject)?;

    for key in &assignment.path.parents {
        let slot = current
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            debug!(key = %key, "replacing non-object value on path");
            *slot = Value::Object(Map::new());
        }
        current = slot.as_object_mut().ok_or(PatchError::RootNotObject)?;
    }

    current.insert(assignment.path.leaf.clone(), assignment.value.clone());
    Ok(())
}
