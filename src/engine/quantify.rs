//! Collection quantifiers - `every` and `some` over array and object
//! entries.
//!
//! Both quantifiers share one entry model: arrays yield `(index, element)`
//! pairs and objects `(key, value)` pairs, and a [`Select`] picks which
//! component the inner validator sees. Transformed components are written
//! into a rebuilt container so quantifiers compose with `map`.

use serde_json::{Map, Value};

use crate::engine::{Outcome, State, Validator};
use crate::path::Accessor;
use crate::tree::{Kind, Node};

/// Which component of an entry the inner validator runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Select {
    /// The key (array index or object key).
    Key,
    /// The value.
    Value,
}

fn entries(value: &Value) -> Vec<(Value, Value)> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (Value::from(i), item.clone()))
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (Value::String(k.clone()), v.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

fn key_accessor(key: &Value) -> Accessor {
    match key {
        Value::Number(n) => n
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .map_or(Accessor::Dynamic, Accessor::Index),
        Value::String(s) => Accessor::Key(s.clone()),
        _ => Accessor::Dynamic,
    }
}

/// Rebuilds a container of the same shape as `original` from `entries`.
fn rebuild(original: &Value, entries: Vec<(Value, Value)>) -> Value {
    match original {
        Value::Array(_) => {
            let mut items: Vec<Value> = Vec::new();
            for (key, value) in entries {
                if let Some(i) = key.as_u64().and_then(|i| usize::try_from(i).ok()) {
                    if i >= items.len() {
                        items.resize(i + 1, Value::Null);
                    }
                    items[i] = value;
                }
            }
            Value::Array(items)
        }
        _ => {
            let mut map = Map::new();
            for (key, value) in entries {
                let key = match key {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                map.insert(key, value);
            }
            Value::Object(map)
        }
    }
}

/// Quantifies `inner` over all entries of the current collection.
///
/// Vacuously succeeds on an empty collection. Entries validate in their
/// original order; validating values extends the path with the real
/// key so failures point at the precise entry, validating keys uses the
/// `[*]` wildcard. The first failing entry decides the outcome, reported
/// under a `where every <name> is` heading at the collection.
pub(crate) fn every(select: Select, name: &'static str, inner: Validator) -> Validator {
    Validator::from_fn(move |state| {
        let inner = inner.clone();
        Box::pin(async move {
            let all = entries(&state.value);
            let mut new_entries: Vec<(Value, Value)> = Vec::with_capacity(all.len());
            let mut any_mapped = false;
            let mut last_expected = Node::empty(state.path.clone());

            for (key, value) in all {
                let accessor = match select {
                    Select::Value => key_accessor(&key),
                    Select::Key => Accessor::Dynamic,
                };
                let sub_path = state.path.child(accessor);
                let component = match select {
                    Select::Value => value.clone(),
                    Select::Key => key.clone(),
                };
                let sub = State {
                    value: component,
                    path: sub_path.clone(),
                    expected: Node::empty(sub_path),
                    mapped: false,
                    is_async: state.is_async,
                };
                match inner.attempt(sub).await {
                    Outcome::Pass(x, ist) => {
                        any_mapped |= ist.mapped;
                        last_expected = ist.expected;
                        new_entries.push(match select {
                            Select::Value => (key, x),
                            Select::Key => (x, value),
                        });
                    }
                    Outcome::Fail(ist) => {
                        return Outcome::Fail(State {
                            value: state.value,
                            path: state.path,
                            expected: ist.expected.prefix(&format!("where every {name} is")),
                            mapped: state.mapped,
                            is_async: state.is_async,
                        });
                    }
                }
            }

            let mapped = state.mapped || any_mapped;
            let value = if mapped {
                rebuild(&state.value, new_entries)
            } else {
                state.value.clone()
            };
            Outcome::Pass(
                value.clone(),
                State {
                    value,
                    path: state.path,
                    expected: last_expected.prefix(&format!("where every {name} is")),
                    mapped,
                    is_async: state.is_async,
                },
            )
        })
    })
}

/// Requires `inner` to accept at least one entry of the current
/// collection.
///
/// Fails outright on an empty collection with a `with at least one <name>`
/// expectation carrying the caller's kind. Entries are tried in order
/// under the `[*]` wildcard path; the first success short-circuits,
/// rebuilding the container with only that entry replaced when it was
/// transformed. When every entry fails, the last entry's expectation is
/// reported under a `where some <name> is` heading.
pub(crate) fn some(select: Select, name: &'static str, kind: Kind, inner: Validator) -> Validator {
    Validator::from_fn(move |state| {
        let inner = inner.clone();
        Box::pin(async move {
            let all = entries(&state.value);
            if all.is_empty() {
                let leaf = Node::leaf(
                    format!("with at least one {name}"),
                    false,
                    state.path.clone(),
                    Some(kind),
                );
                return Outcome::Fail(State {
                    value: state.value,
                    path: state.path,
                    expected: leaf,
                    mapped: state.mapped,
                    is_async: state.is_async,
                });
            }

            let mut last_expected = Node::empty(state.path.clone());
            for (key, value) in &all {
                let sub_path = state.path.child(Accessor::Dynamic);
                let component = match select {
                    Select::Value => value.clone(),
                    Select::Key => key.clone(),
                };
                let sub = State {
                    value: component,
                    path: sub_path.clone(),
                    expected: Node::empty(sub_path),
                    mapped: false,
                    is_async: state.is_async,
                };
                match inner.attempt(sub).await {
                    Outcome::Pass(x, ist) => {
                        let mapped = state.mapped || ist.mapped;
                        let value = if mapped {
                            let replaced = all
                                .iter()
                                .map(|(k, v)| {
                                    if k == key {
                                        match select {
                                            Select::Value => (k.clone(), x.clone()),
                                            Select::Key => (x.clone(), v.clone()),
                                        }
                                    } else {
                                        (k.clone(), v.clone())
                                    }
                                })
                                .collect();
                            rebuild(&state.value, replaced)
                        } else {
                            state.value.clone()
                        };
                        return Outcome::Pass(
                            value.clone(),
                            State {
                                value,
                                path: state.path,
                                expected: ist.expected.prefix(&format!("where some {name} is")),
                                mapped,
                                is_async: state.is_async,
                            },
                        );
                    }
                    Outcome::Fail(ist) => {
                        last_expected = ist.expected;
                    }
                }
            }

            Outcome::Fail(State {
                value: state.value,
                path: state.path,
                expected: last_expected.prefix(&format!("where some {name} is")),
                mapped: state.mapped,
                is_async: state.is_async,
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn number() -> Validator {
        Validator::check(Value::is_number).label("a number")
    }

    #[test]
    fn every_is_vacuous_on_an_empty_array() {
        let v = every(Select::Value, "element", number());
        assert!(v.run(json!([])).is_ok());
    }

    #[test]
    fn every_reports_the_failing_entry() {
        let v = Validator::check(Value::is_array)
            .label("an array")
            .and(every(Select::Value, "element", number()));
        let err = v.run(json!([1, "x", 3])).unwrap_err();
        assert_eq!(err.property(), "input[1]");
        assert_eq!(err.actual(), &json!("x"));
    }

    #[test]
    fn every_rebuilds_when_the_inner_validator_maps() {
        let v = every(
            Select::Value,
            "element",
            number().map(|x| json!(x.as_i64().unwrap_or(0) * 2)),
        );
        assert_eq!(v.run(json!([1, 2, 3])).unwrap(), json!([2, 4, 6]));
    }

    #[test]
    fn some_fails_empty_with_a_canned_expectation() {
        let kind = Kind::new("an array");
        let v = Validator::check(Value::is_array)
            .label_kind("an array", Some(kind))
            .and(some(Select::Value, "element", kind, number()));
        let err = v.run(json!([])).unwrap_err();
        assert_eq!(err.expected(), "an array with at least one element");
    }

    #[test]
    fn some_short_circuits_and_replaces_only_the_match() {
        let v = some(
            Select::Value,
            "element",
            Kind::new("an array"),
            number().map(|x| json!(x.as_i64().unwrap_or(0) + 10)),
        );
        assert_eq!(v.run(json!(["a", 2, 3])).unwrap(), json!(["a", 12, 3]));
    }
}
