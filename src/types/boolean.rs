//! Boolean validators.

use serde_json::Value;

use crate::macros::declare_type;
use crate::tree::Kind;
use crate::types::{leaf, Restrict};

const KIND: Kind = Kind::new("a boolean");

declare_type! {
    /// Typed validator for JSON booleans.
    pub struct BooleanValidator / NegatedBooleanValidator : KIND;
}

/// Succeeds when the input is a boolean.
#[must_use]
pub fn boolean() -> BooleanValidator {
    BooleanValidator::from_validator(leaf(Value::is_boolean, "a boolean".into(), KIND))
}

/// Restrictions on boolean validators.
pub trait BooleanExt: Restrict {
    /// The value must be `true`.
    #[must_use]
    fn is_true(self) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(|x| x.as_bool() == Some(true), "true".into(), kind))
    }

    /// The value must be `false`.
    #[must_use]
    fn is_false(self) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(|x| x.as_bool() == Some(false), "false".into(), kind))
    }
}

impl BooleanExt for BooleanValidator {}
impl BooleanExt for NegatedBooleanValidator {}
