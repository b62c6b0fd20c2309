//! The null validator.

use serde_json::Value;

use crate::macros::declare_type;
use crate::tree::Kind;
use crate::types::leaf;

const KIND: Kind = Kind::new("null");

declare_type! {
    /// Typed validator accepting only JSON null.
    pub struct NullValidator / NegatedNullValidator : KIND;
}

/// Succeeds when the input is null.
#[must_use]
pub fn null() -> NullValidator {
    NullValidator::from_validator(leaf(Value::is_null, "null".into(), KIND))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn only_null_passes() {
        assert!(null().run(json!(null)).is_ok());
        let err = null().run(json!(0)).unwrap_err();
        assert_eq!(err.expected(), "null");
        assert_eq!(err.to_string(), "invalid input, expected input to be null");
    }
}
