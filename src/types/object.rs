//! Object validators and object templates.

use serde_json::{Map, Value};

use crate::engine::quantify::{self, Select};
use crate::engine::Validator;
use crate::macros::declare_type;
use crate::path::Accessor;
use crate::tree::Kind;
use crate::types::leaf;

const KIND: Kind = Kind::new("an object");

declare_type! {
    /// Typed validator for JSON objects.
    pub struct ObjectValidator / NegatedObjectValidator : KIND;
}

impl ObjectValidator {
    /// Requires `validator` to accept every key. Vacuously true for an
    /// empty object.
    #[must_use]
    pub fn every_key(self, validator: impl Into<Validator>) -> Self {
        Self::from_validator(
            self.into_validator()
                .and(quantify::every(Select::Key, "key", validator.into())),
        )
    }

    /// Requires `validator` to accept every value. Vacuously true for an
    /// empty object. When the inner validator transforms values, a new
    /// object with the transformed values is yielded.
    #[must_use]
    pub fn every_value(self, validator: impl Into<Validator>) -> Self {
        Self::from_validator(
            self.into_validator()
                .and(quantify::every(Select::Value, "value", validator.into())),
        )
    }

    /// Requires `validator` to accept at least one key; an empty object
    /// fails.
    #[must_use]
    pub fn some_key(self, validator: impl Into<Validator>) -> Self {
        Self::from_validator(self.into_validator().and(quantify::some(
            Select::Key,
            "key",
            KIND,
            validator.into(),
        )))
    }

    /// Requires `validator` to accept at least one value; an empty object
    /// fails.
    #[must_use]
    pub fn some_value(self, validator: impl Into<Validator>) -> Self {
        Self::from_validator(self.into_validator().and(quantify::some(
            Select::Value,
            "value",
            KIND,
            validator.into(),
        )))
    }
}

/// Succeeds when the input is an object.
#[must_use]
pub fn object() -> ObjectValidator {
    ObjectValidator::from_validator(leaf(Value::is_object, "an object".into(), KIND))
}

/// Succeeds when the input is an object whose properties pass the
/// validators under the matching keys of `template`. Yields a new object
/// holding only the templated keys, so extra properties are dropped and
/// inner transformations stick.
#[must_use]
pub fn object_of<I, K, V>(template: I) -> ObjectValidator
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Validator>,
{
    let mut validator = object()
        .into_validator()
        .chain(|_| Validator::emit(Value::Object(Map::new())));

    for (key, inner) in template {
        let key: String = key.into();
        let inner: Validator = inner.into();
        validator = validator.chain(move |result| {
            let result = result.clone();
            let key = key.clone();
            let inner = inner.clone();
            Validator::at(Accessor::Key(key.clone()), inner).chain(move |x| {
                let mut map = result.as_object().cloned().unwrap_or_default();
                map.insert(key.clone(), x.clone());
                Validator::emit_mapped(Value::Object(map))
            })
        });
    }

    ObjectValidator::from_validator(validator)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::types::number::{number, NumberExt};
    use crate::types::string::{string, StringExt};

    #[test]
    fn rejects_non_objects() {
        let err = object().run(json!([1])).unwrap_err();
        assert_eq!(err.expected(), "an object");
    }

    #[test]
    fn every_value_checks_all_properties() {
        let validator = object().every_value(number());
        assert!(validator.run(json!({"a": 1, "b": 2})).is_ok());
        assert!(validator.run(json!({})).is_ok());

        let err = validator.run(json!({"a": 1, "b": "x"})).unwrap_err();
        assert_eq!(err.expected(), "a number");
        assert_eq!(err.actual(), &json!("x"));
    }

    #[test]
    fn every_key_sees_the_keys_as_strings() {
        let validator = object().every_key(string().matching(
            regex::Regex::new(r"^[a-z]+$").unwrap(),
        ));
        assert!(validator.run(json!({"ab": 1, "cd": 2})).is_ok());
        assert!(validator.run(json!({"Ab": 1})).is_err());
    }

    #[test]
    fn some_value_fails_on_empty() {
        let err = object().some_value(number()).run(json!({})).unwrap_err();
        assert_eq!(err.expected(), "an object with at least one value");
    }

    #[test]
    fn template_projects_the_listed_keys() {
        let validator = object_of([
            ("x", number().into_validator()),
            ("y", number().into_validator()),
        ]);
        assert_eq!(
            validator.run(json!({"x": 1, "y": 2, "z": 3})).unwrap(),
            json!({"x": 1, "y": 2})
        );
    }

    #[test]
    fn template_reports_failures_under_the_key() {
        let validator = object_of([("x", number().gt(0.0))]);
        let err = validator.run(json!({"x": -1})).unwrap_err();
        assert_eq!(err.property(), "input.x");
        assert_eq!(err.expected(), "a number greater than 0");
        assert_eq!(err.actual(), &json!(-1));
    }

    #[test]
    fn template_keeps_inner_transformations() {
        let upper = string().map(|x| match x {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        });
        let validator = object_of([("name", upper)]);
        assert_eq!(
            validator.run(json!({"name": "ada", "age": 36})).unwrap(),
            json!({"name": "ADA"})
        );
    }

    #[test]
    fn missing_template_keys_fail() {
        let err = object_of([("x", number().into_validator())])
            .run(json!({}))
            .unwrap_err();
        assert_eq!(err.property(), "input.x");
        assert_eq!(err.actual(), &json!(null));
    }
}
