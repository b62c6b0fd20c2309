//! Property paths - where in the input a validator is currently looking.
//!
//! A [`Path`] starts at the run name (`input` by default) and grows one
//! [`Accessor`] at a time as validators descend into sub-properties.
//! Quantified positions use [`Accessor::Dynamic`], rendered as `[*]`, which
//! marks the path as non-addressable for error trimming.

use serde_json::Value;
use smallvec::{SmallVec, smallvec};

use crate::show;

/// A single step into a value: an object key, an array index, or the
/// wildcard position used by quantifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// Object key (also `length` on arrays and strings).
    Key(String),
    /// Array index.
    Index(usize),
    /// Quantified position, rendered as `[*]`.
    Dynamic,
}

impl Accessor {
    /// Renders this accessor the way it appears in a property trace,
    /// e.g. `.name`, `["odd key"]`, `[3]` or `[*]`.
    #[must_use]
    pub fn render(&self) -> String {
        show::accessor(self)
    }
}

impl From<&str> for Accessor {
    fn from(key: &str) -> Self {
        Accessor::Key(key.to_owned())
    }
}

impl From<String> for Accessor {
    fn from(key: String) -> Self {
        Accessor::Key(key)
    }
}

impl From<usize> for Accessor {
    fn from(index: usize) -> Self {
        Accessor::Index(index)
    }
}

/// The location a validator is currently validating, starting at the run
/// name and descending through sub-properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: SmallVec<[Accessor; 4]>,
}

impl Path {
    /// Creates a root path from the run name.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self {
            segments: smallvec![Accessor::Key(name.to_owned())],
        }
    }

    /// Returns a new path with `accessor` appended.
    #[must_use]
    pub fn child(&self, accessor: Accessor) -> Self {
        let mut segments = self.segments.clone();
        segments.push(accessor);
        Self { segments }
    }

    /// The run name this path is rooted at.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.segments[0] {
            Accessor::Key(name) => name,
            Accessor::Index(_) | Accessor::Dynamic => "?",
        }
    }

    /// All segments, root included.
    #[must_use]
    pub fn segments(&self) -> &[Accessor] {
        &self.segments
    }

    /// True when any segment is a quantified `[*]` position.
    #[must_use]
    pub fn contains_dynamic(&self) -> bool {
        self.segments.contains(&Accessor::Dynamic)
    }

    /// Renders the full property trace, root name raw and every further
    /// segment through its accessor form, e.g. `input.user.tags[0]`.
    #[must_use]
    pub fn property(&self) -> String {
        let mut out = self.name().to_owned();
        for accessor in &self.segments[1..] {
            out.push_str(&accessor.render());
        }
        out
    }
}

/// Looks up the sub-value an accessor refers to, yielding `Null` for
/// anything unaddressable.
///
/// Beyond plain object-key and array-index lookup this mirrors the
/// property model validators rely on: `length` on arrays and strings,
/// character indexing into strings, and numeric keys on objects.
#[must_use]
pub fn resolve(value: &Value, accessor: &Accessor) -> Value {
    match (value, accessor) {
        (Value::Object(map), Accessor::Key(key)) => map.get(key).cloned().unwrap_or(Value::Null),
        (Value::Array(items), Accessor::Index(i)) => {
            items.get(*i).cloned().unwrap_or(Value::Null)
        }
        (Value::Array(items), Accessor::Key(key)) if key == "length" => Value::from(items.len()),
        (Value::String(s), Accessor::Key(key)) if key == "length" => {
            Value::from(s.chars().count())
        }
        (Value::String(s), Accessor::Index(i)) => s
            .chars()
            .nth(*i)
            .map(|c| Value::String(c.to_string()))
            .unwrap_or(Value::Null),
        (Value::Object(map), Accessor::Index(i)) => {
            map.get(&i.to_string()).cloned().unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_renders_identifier_keys_with_dots() {
        let path = Path::root("input")
            .child(Accessor::Key("user".into()))
            .child(Accessor::Index(0));
        assert_eq!(path.property(), "input.user[0]");
    }

    #[test]
    fn property_quotes_non_identifier_keys() {
        let path = Path::root("input").child(Accessor::Key("odd key".into()));
        assert_eq!(path.property(), "input['odd key']");
    }

    #[test]
    fn property_renders_dynamic_as_star() {
        let path = Path::root("input").child(Accessor::Dynamic);
        assert_eq!(path.property(), "input[*]");
        assert!(path.contains_dynamic());
    }

    #[test]
    fn resolve_length_of_array_and_string() {
        let length = Accessor::Key("length".into());
        assert_eq!(resolve(&json!([1, 2, 3]), &length), json!(3));
        assert_eq!(resolve(&json!("héllo"), &length), json!(5));
    }

    #[test]
    fn resolve_string_index_yields_single_char() {
        assert_eq!(resolve(&json!("abc"), &Accessor::Index(1)), json!("b"));
        assert_eq!(resolve(&json!("abc"), &Accessor::Index(9)), Value::Null);
    }

    #[test]
    fn resolve_numeric_key_on_object() {
        assert_eq!(resolve(&json!({"0": "x"}), &Accessor::Index(0)), json!("x"));
    }

    #[test]
    fn resolve_missing_becomes_null() {
        assert_eq!(resolve(&json!({"a": 1}), &"b".into()), Value::Null);
        assert_eq!(resolve(&json!(true), &"a".into()), Value::Null);
    }
}
