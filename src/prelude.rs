//! One-stop import for typical use.
//!
//! ```rust
//! use vouch::prelude::*;
//!
//! let validator = is::number().between(0.0, 1.0, Inclusivity::Closed);
//! assert!(validator.run(serde_json::json!(0.5)).is_ok());
//! ```

pub use crate::engine::{Format, RunOptions, ValidationError, Validator};
pub use crate::is;
pub use crate::path::{Accessor, Path};
pub use crate::tree::{Kind, Node};
pub use crate::types::{
    AnyExt, AnyValidator, ArrayValidator, BooleanExt, BooleanValidator, DateExt, DateValidator,
    Inclusivity, NullValidator, NumberExt, NumberValidator, ObjectValidator, Restrict, StringExt,
    StringValidator, UrlValidator,
};
