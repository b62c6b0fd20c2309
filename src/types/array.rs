//! Array validators and array templates.

use serde_json::Value;

use crate::engine::quantify::{self, Select};
use crate::engine::Validator;
use crate::macros::declare_type;
use crate::tree::Kind;
use crate::types::leaf;

const KIND: Kind = Kind::new("an array");

declare_type! {
    /// Typed validator for JSON arrays.
    pub struct ArrayValidator / NegatedArrayValidator : KIND;
}

impl ArrayValidator {
    /// Requires `validator` to accept every element. Vacuously true for an
    /// empty array. When the inner validator transforms elements, a new
    /// array with the transformed elements is yielded.
    #[must_use]
    pub fn every_element(self, validator: impl Into<Validator>) -> Self {
        Self::from_validator(
            self.into_validator()
                .and(quantify::every(Select::Value, "element", validator.into())),
        )
    }

    /// Requires `validator` to accept at least one element; an empty array
    /// fails. Stops at the first accepted element.
    #[must_use]
    pub fn some_element(self, validator: impl Into<Validator>) -> Self {
        Self::from_validator(self.into_validator().and(quantify::some(
            Select::Value,
            "element",
            KIND,
            validator.into(),
        )))
    }
}

/// Succeeds when the input is an array.
#[must_use]
pub fn array() -> ArrayValidator {
    ArrayValidator::from_validator(leaf(Value::is_array, "an array".into(), KIND))
}

/// Succeeds when the input is an array whose elements pass the validators
/// at the matching indices of `template`. Yields a new array holding only
/// the templated indices, in template order, so extra trailing elements are
/// dropped and inner transformations stick.
#[must_use]
pub fn array_of<I>(template: I) -> ArrayValidator
where
    I: IntoIterator,
    I::Item: Into<Validator>,
{
    let inners: Vec<Validator> = template.into_iter().map(Into::into).collect();
    let len = inners.len();

    let mut validator = array().into_validator();
    for (i, inner) in inners.into_iter().enumerate() {
        validator = validator.field(i, inner);
    }

    let validator = validator.chain(move |result| {
        let projection: Vec<Value> = (0..len)
            .map(|i| result.get(i).cloned().unwrap_or(Value::Null))
            .collect();
        Validator::of(Value::Array(projection))
    });
    ArrayValidator::from_validator(validator)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::types::number::number;
    use crate::types::string::string;

    #[test]
    fn rejects_non_arrays() {
        let err = array().run(json!({"0": 1})).unwrap_err();
        assert_eq!(err.expected(), "an array");
    }

    #[test]
    fn every_element_reports_the_first_offender() {
        let validator = array().every_element(number());
        assert!(validator.run(json!([1, 2, 3])).is_ok());
        assert!(validator.run(json!([])).is_ok());

        let err = validator.run(json!([1, "x", 3])).unwrap_err();
        assert_eq!(err.property(), "input[1]");
        assert_eq!(err.expected(), "a number");
        assert_eq!(err.actual(), &json!("x"));
    }

    #[test]
    fn some_element_fails_on_empty() {
        let validator = array().some_element(number());
        let err = validator.run(json!([])).unwrap_err();
        assert_eq!(err.expected(), "an array with at least one element");
    }

    #[test]
    fn some_element_reports_at_the_collection() {
        let err = array()
            .some_element(number())
            .run(json!(["a", "b"]))
            .unwrap_err();
        assert_eq!(err.property(), "input");
        assert_eq!(err.expected(), "an array where some element is a number");
    }

    #[test]
    fn template_projects_the_listed_indices() {
        let validator = array_of([number().into_validator(), number().into_validator()]);
        assert_eq!(validator.run(json!([0, 1, 2])).unwrap(), json!([0, 1]));
    }

    #[test]
    fn template_checks_each_index() {
        let validator = array_of([
            number().into_validator(),
            string().into_validator(),
        ]);
        assert!(validator.run(json!([1, "two"])).is_ok());

        let err = validator.run(json!([1, 2])).unwrap_err();
        assert_eq!(err.property(), "input[1]");
        assert_eq!(err.expected(), "a string");
    }

    #[test]
    fn template_keeps_inner_transformations() {
        let validator = array_of([number().map(|x| json!(x.as_i64().unwrap_or(0) + 1))]);
        assert_eq!(validator.run(json!([1, 9])).unwrap(), json!([2]));
    }

    #[test]
    fn missing_template_indices_fail() {
        let err = array_of([number().into_validator(), number().into_validator()])
            .run(json!([1]))
            .unwrap_err();
        assert_eq!(err.property(), "input[1]");
        assert_eq!(err.actual(), &json!(null));
    }
}
