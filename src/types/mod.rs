//! Typed validator surface.
//!
//! Each submodule holds one factory (`number()`, `string()`, ...) returning
//! a typed wrapper around the core [`Validator`], plus an extension trait
//! with the restrictions that make sense for that type. The wrappers exist
//! for two reasons: restrictions only appear where they type-check, and
//! `not` flips restrictions rather than the whole validator, so
//! `number().not().gt(0.0)` reads "a number not greater than 0" instead of
//! rejecting numbers outright.

use serde_json::Value;

use crate::engine::Validator;
use crate::tree::Kind;

pub mod any;
pub mod array;
pub mod boolean;
pub mod date;
pub mod null;
pub mod number;
pub mod object;
pub mod string;
pub mod url;

pub use any::{AnyExt, AnyValidator, NegatedAnyValidator};
pub use array::{ArrayValidator, NegatedArrayValidator};
pub use boolean::{BooleanExt, BooleanValidator, NegatedBooleanValidator};
pub use date::{DateExt, DateValidator, NegatedDateValidator};
pub use null::{NegatedNullValidator, NullValidator};
pub use number::{Inclusivity, NegatedNumberValidator, NumberExt, NumberValidator};
pub use object::{NegatedObjectValidator, ObjectValidator};
pub use string::{NegatedStringValidator, StringExt, StringValidator};
pub use url::{NegatedUrlValidator, UrlValidator};

/// Hook the per-type extension traits build on.
///
/// The positive half of a typed pair applies restrictions directly; the
/// negated half swaps `restrict` and `restrict_not` and reports a negated
/// [`Kind`], which is what scopes the rendered "not" to the restriction.
/// Both halves land back on the positive type.
pub trait Restrict: Sized {
    /// The positive typed validator restrictions produce.
    type Target;

    /// Kind restrictions built through this receiver are tagged with.
    fn kind(&self) -> Kind;

    /// Sequences a restriction that must hold.
    fn restrict(self, validator: Validator) -> Self::Target;

    /// Sequences a restriction that must fail.
    fn restrict_not(self, validator: Validator) -> Self::Target;
}

/// A labeled single-expectation check carrying a type kind.
pub(crate) fn leaf<F>(pred: F, label: String, kind: Kind) -> Validator
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Validator::check(pred).label_kind(label, Some(kind))
}
