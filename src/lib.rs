//! Composable, monadic validation for JSON values.
//!
//! A [`Validator`] is a small program over [`serde_json::Value`]: it checks
//! the input, may transform it, and records what it expected along the way,
//! so a failed run explains itself:
//!
//! ```rust
//! use vouch::is;
//! use vouch::types::{NumberExt, StringExt};
//!
//! let validator = is::object_of([
//!     ("name", is::string().not().empty().into_validator()),
//!     ("age", is::number().gte(0.0).into_validator()),
//! ]);
//!
//! let ok = validator.run(serde_json::json!({"name": "Ada", "age": 36}))?;
//! assert_eq!(ok, serde_json::json!({"name": "Ada", "age": 36}));
//!
//! let err = validator
//!     .run(serde_json::json!({"name": "Ada", "age": -1}))
//!     .unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "invalid input, expected input.age to be a number greater than or equal to 0",
//! );
//! # Ok::<(), vouch::ValidationError>(())
//! ```
//!
//! Validators compose with `and`, `or`, `map`, and `chain`; typed entry
//! points live under [`is`] and their restrictions in [`types`]. `.not()`
//! on a typed validator negates restrictions, not the type check, so
//! `is::number().not().gt(0.0)` still requires a number. Transformations
//! applied with `map` flow through: the value a run yields is the
//! transformed one, including inside arrays and objects.

#![allow(clippy::result_large_err)]

mod macros;

pub mod engine;
pub mod path;
pub mod show;
pub mod tree;
pub mod types;

pub mod prelude;

pub use engine::{Format, RunOptions, ValidationError, Validator};

/// Type validator factories, meant to be read qualified: `is::string()`.
pub mod is {
    pub use crate::types::any::any;
    pub use crate::types::array::{array, array_of};
    pub use crate::types::boolean::boolean;
    pub use crate::types::date::date;
    pub use crate::types::null::null;
    pub use crate::types::number::number;
    pub use crate::types::object::{object, object_of};
    pub use crate::types::string::string;
    pub use crate::types::url::{url, url_with_base};
}
