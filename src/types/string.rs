//! String validators.

use regex::Regex;
use serde_json::Value;

use crate::macros::declare_type;
use crate::show;
use crate::tree::Kind;
use crate::types::{leaf, Restrict};

const KIND: Kind = Kind::new("a string");

declare_type! {
    /// Typed validator for JSON strings.
    pub struct StringValidator / NegatedStringValidator : KIND;
}

/// Succeeds when the input is a string.
#[must_use]
pub fn string() -> StringValidator {
    StringValidator::from_validator(leaf(Value::is_string, "a string".into(), KIND))
}

fn on_str<F>(pred: F) -> impl Fn(&Value) -> bool + Send + Sync + 'static
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    move |x| x.as_str().is_some_and(&pred)
}

/// Restrictions on string validators.
pub trait StringExt: Restrict {
    /// The string must be empty.
    #[must_use]
    fn empty(self) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(on_str(str::is_empty), "empty".into(), kind))
    }

    /// The string must match `re` somewhere.
    #[must_use]
    fn matching(self, re: Regex) -> Self::Target {
        let kind = self.kind();
        let label = format!("matching {}", show::regexp(&re));
        self.restrict(leaf(on_str(move |s| re.is_match(s)), label, kind))
    }

    /// The string must contain `part` as a substring.
    #[must_use]
    fn contains(self, part: &str) -> Self::Target {
        let kind = self.kind();
        let label = format!("containing {}", show::string(part, show::DEFAULT_LIMIT));
        let part = part.to_owned();
        self.restrict(leaf(on_str(move |s| s.contains(&part)), label, kind))
    }

    /// The string must equal `expected`.
    #[must_use]
    fn eq(self, expected: &str) -> Self::Target {
        let kind = self.kind();
        let label = format!("equal to {}", show::string(expected, show::DEFAULT_LIMIT));
        let expected = expected.to_owned();
        self.restrict(leaf(on_str(move |s| s == expected), label, kind))
    }

    /// The string must differ from `expected`. Renders as a single
    /// `not equal to` expectation rather than a negated one.
    #[must_use]
    fn ne(self, expected: &str) -> Self::Target {
        let kind = self.kind();
        let label = format!(
            "not equal to {}",
            show::string(expected, show::DEFAULT_LIMIT)
        );
        let expected = expected.to_owned();
        self.restrict(leaf(on_str(move |s| s != expected), label, kind))
    }

    /// The string must be one of `choices`.
    #[must_use]
    fn one_of(self, choices: &[&str]) -> Self::Target {
        let kind = self.kind();
        let shown = Value::Array(choices.iter().map(|s| Value::from(*s)).collect());
        let choices: Vec<String> = choices.iter().map(|s| (*s).to_owned()).collect();
        self.restrict(leaf(
            on_str(move |s| choices.iter().any(|c| c.as_str() == s)),
            format!("in {}", show::describe(&shown)),
            kind,
        ))
    }
}

impl StringExt for StringValidator {}
impl StringExt for NegatedStringValidator {}
