//! Number validators.

use serde_json::Value;

use crate::macros::declare_type;
use crate::show;
use crate::tree::Kind;
use crate::types::{leaf, Restrict};

const KIND: Kind = Kind::new("a number");

declare_type! {
    /// Typed validator for JSON numbers.
    pub struct NumberValidator / NegatedNumberValidator : KIND;
}

/// Succeeds when the input is a number.
#[must_use]
pub fn number() -> NumberValidator {
    NumberValidator::from_validator(leaf(Value::is_number, "a number".into(), KIND))
}

/// Which ends of a [`between`](NumberExt::between) range are included.
///
/// The rendered expectation uses interval notation, so `Closed` reads
/// `between [0, 1]` and `Open` reads `between (0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inclusivity {
    /// Both ends included.
    #[default]
    Closed,
    /// Both ends excluded.
    Open,
    /// Start included, end excluded.
    ClosedOpen,
    /// Start excluded, end included.
    OpenClosed,
}

impl Inclusivity {
    pub(crate) fn brackets(self) -> (char, char) {
        match self {
            Self::Closed => ('[', ']'),
            Self::Open => ('(', ')'),
            Self::ClosedOpen => ('[', ')'),
            Self::OpenClosed => ('(', ']'),
        }
    }

    pub(crate) fn contains<T: PartialOrd>(self, start: T, end: T, x: T) -> bool {
        let lower = match self {
            Self::Closed | Self::ClosedOpen => x >= start,
            Self::Open | Self::OpenClosed => x > start,
        };
        let upper = match self {
            Self::Closed | Self::OpenClosed => x <= end,
            Self::Open | Self::ClosedOpen => x < end,
        };
        lower && upper
    }
}

fn compare<F>(cmp: F) -> impl Fn(&Value) -> bool + Send + Sync + 'static
where
    F: Fn(f64) -> bool + Send + Sync + 'static,
{
    move |x| x.as_f64().is_some_and(&cmp)
}

/// Restrictions on number validators.
pub trait NumberExt: Restrict {
    /// The value must be strictly greater than `n`.
    #[must_use]
    fn gt(self, n: f64) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x > n),
            format!("greater than {}", show::number(n)),
            kind,
        ))
    }

    /// The value must be greater than or equal to `n`.
    #[must_use]
    fn gte(self, n: f64) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x >= n),
            format!("greater than or equal to {}", show::number(n)),
            kind,
        ))
    }

    /// The value must equal `n`.
    #[must_use]
    fn eq(self, n: f64) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x == n),
            format!("equal to {}", show::number(n)),
            kind,
        ))
    }

    /// The value must not equal `n`.
    #[must_use]
    fn ne(self, n: f64) -> Self::Target {
        let kind = self.kind().negate();
        self.restrict_not(leaf(
            compare(move |x| x == n),
            format!("equal to {}", show::number(n)),
            kind,
        ))
    }

    /// The value must be strictly less than `n`.
    #[must_use]
    fn lt(self, n: f64) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x < n),
            format!("less than {}", show::number(n)),
            kind,
        ))
    }

    /// The value must be less than or equal to `n`.
    #[must_use]
    fn lte(self, n: f64) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x <= n),
            format!("less than or equal to {}", show::number(n)),
            kind,
        ))
    }

    /// The value must lie between `start` and `end`, unordered, with the
    /// ends included per `inclusivity`.
    #[must_use]
    fn between(self, start: f64, end: f64, inclusivity: Inclusivity) -> Self::Target {
        let kind = self.kind();
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let (open, close) = inclusivity.brackets();
        self.restrict(leaf(
            compare(move |x| inclusivity.contains(start, end, x)),
            format!(
                "between {open}{}, {}{close}",
                show::number(start),
                show::number(end)
            ),
            kind,
        ))
    }

    /// The value must be one of `choices`.
    #[must_use]
    fn one_of(self, choices: &[f64]) -> Self::Target {
        let kind = self.kind();
        let shown = Value::Array(choices.iter().copied().map(Value::from).collect());
        let choices = choices.to_vec();
        self.restrict(leaf(
            compare(move |x| choices.contains(&x)),
            format!("in {}", show::describe(&shown)),
            kind,
        ))
    }

    /// The value must be finite. Always holds for numbers parsed from
    /// JSON text, but values built programmatically may carry no f64
    /// representation at all.
    #[must_use]
    fn finite(self) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            |x| x.as_f64().is_some_and(f64::is_finite),
            "finite".into(),
            kind,
        ))
    }

    /// The value must be a whole number.
    #[must_use]
    fn integer(self) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            |x| {
                x.as_i64().is_some()
                    || x.as_u64().is_some()
                    || x.as_f64().is_some_and(|f| f.fract() == 0.0)
            },
            "integral".into(),
            kind,
        ))
    }
}

impl NumberExt for NumberValidator {}
impl NumberExt for NegatedNumberValidator {}
