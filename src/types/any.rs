//! The catch-all validator.

use serde_json::Value;

use crate::macros::declare_type;
use crate::tree::Kind;
use crate::types::{leaf, Restrict};

const KIND: Kind = Kind::new("anything");

declare_type! {
    /// Typed validator accepting any JSON value, the usual starting point
    /// for purely structural checks.
    pub struct AnyValidator / NegatedAnyValidator : KIND;
}

/// Succeeds on every input.
#[must_use]
pub fn any() -> AnyValidator {
    AnyValidator::from_validator(leaf(|_| true, "anything".into(), KIND))
}

/// Loose truthiness: null, false, zero and the empty string are falsy,
/// everything else (arrays and objects included, even empty ones) is
/// truthy.
fn truthy(x: &Value) -> bool {
    match x {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Restrictions available on any value.
pub trait AnyExt: Restrict {
    /// The value must be truthy.
    #[must_use]
    fn truthy(self) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(truthy, "truthy".into(), kind))
    }

    /// The value must be falsy.
    #[must_use]
    fn falsy(self) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(|x| !truthy(x), "falsy".into(), kind))
    }

    /// The value must be null.
    #[must_use]
    fn nullish(self) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(Value::is_null, "nullish".into(), kind))
    }
}

impl AnyExt for AnyValidator {}
impl AnyExt for NegatedAnyValidator {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_everything() {
        for input in [json!(null), json!(0), json!(""), json!([]), json!({})] {
            assert_eq!(any().run(input.clone()).unwrap(), input);
        }
    }

    #[test]
    fn truthy_follows_loose_semantics() {
        let validator = any().truthy();
        assert!(validator.run(json!(1)).is_ok());
        assert!(validator.run(json!([])).is_ok());
        assert!(validator.run(json!(0)).is_err());
        assert!(validator.run(json!("")).is_err());
        assert!(validator.run(json!(null)).is_err());

        let err = validator.run(json!(0)).unwrap_err();
        assert_eq!(err.expected(), "anything truthy");
    }

    #[test]
    fn not_nullish_rejects_null_only() {
        let validator = any().not().nullish();
        assert!(validator.run(json!(0)).is_ok());
        let err = validator.run(json!(null)).unwrap_err();
        assert_eq!(err.expected(), "anything not nullish");
    }
}
