//! Date validators, over RFC 3339 timestamp strings.
//!
//! JSON has no date type, so these validate strings that parse as RFC 3339
//! and compare them by instant. Offsets are respected: `+01:00` and the
//! equivalent `Z` time are equal.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::macros::declare_type;
use crate::tree::Kind;
use crate::types::number::Inclusivity;
use crate::types::{leaf, Restrict};

const KIND: Kind = Kind::new("a date");

declare_type! {
    /// Typed validator for RFC 3339 timestamp strings.
    pub struct DateValidator / NegatedDateValidator : KIND;
}

fn parse(x: &Value) -> Option<DateTime<Utc>> {
    let s = x.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn shown(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Succeeds when the input is an RFC 3339 timestamp string.
#[must_use]
pub fn date() -> DateValidator {
    DateValidator::from_validator(leaf(|x| parse(x).is_some(), "a date".into(), KIND))
}

fn compare<F>(cmp: F) -> impl Fn(&Value) -> bool + Send + Sync + 'static
where
    F: Fn(DateTime<Utc>) -> bool + Send + Sync + 'static,
{
    move |x| parse(x).is_some_and(&cmp)
}

/// Restrictions on date validators. Comparisons are by instant.
pub trait DateExt: Restrict {
    /// The date must be strictly after `bound`.
    #[must_use]
    fn gt(self, bound: DateTime<Utc>) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x > bound),
            format!("greater than {}", shown(bound)),
            kind,
        ))
    }

    /// The date must be at or after `bound`.
    #[must_use]
    fn gte(self, bound: DateTime<Utc>) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x >= bound),
            format!("greater than or equal to {}", shown(bound)),
            kind,
        ))
    }

    /// The date must denote the same instant as `bound`.
    #[must_use]
    fn eq(self, bound: DateTime<Utc>) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x == bound),
            format!("equal to {}", shown(bound)),
            kind,
        ))
    }

    /// The date must denote a different instant than `bound`.
    #[must_use]
    fn ne(self, bound: DateTime<Utc>) -> Self::Target {
        let kind = self.kind().negate();
        self.restrict_not(leaf(
            compare(move |x| x == bound),
            format!("equal to {}", shown(bound)),
            kind,
        ))
    }

    /// The date must be strictly before `bound`.
    #[must_use]
    fn lt(self, bound: DateTime<Utc>) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x < bound),
            format!("less than {}", shown(bound)),
            kind,
        ))
    }

    /// The date must be at or before `bound`.
    #[must_use]
    fn lte(self, bound: DateTime<Utc>) -> Self::Target {
        let kind = self.kind();
        self.restrict(leaf(
            compare(move |x| x <= bound),
            format!("less than or equal to {}", shown(bound)),
            kind,
        ))
    }

    /// The date must lie between `min` and `max`, unordered, with the ends
    /// included per `inclusivity`.
    #[must_use]
    fn between(
        self,
        min: DateTime<Utc>,
        max: DateTime<Utc>,
        inclusivity: Inclusivity,
    ) -> Self::Target {
        let kind = self.kind();
        let (start, end) = if min <= max { (min, max) } else { (max, min) };
        let (open, close) = inclusivity.brackets();
        self.restrict(leaf(
            compare(move |x| inclusivity.contains(start, end, x)),
            format!("between {open}{}, {}{close}", shown(start), shown(end)),
            kind,
        ))
    }
}

impl DateExt for DateValidator {}
impl DateExt for NegatedDateValidator {}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single().unwrap()
    }

    #[test]
    fn rejects_strings_that_are_not_timestamps() {
        assert!(date().run(json!("2024-06-01T12:00:00Z")).is_ok());
        let err = date().run(json!("yesterday")).unwrap_err();
        assert_eq!(err.expected(), "a date");
    }

    #[test]
    fn comparisons_are_by_instant() {
        let validator = date().gte(at(2024));
        // one hour past midnight UTC, expressed with an offset
        assert!(validator.run(json!("2024-01-01T02:00:00+01:00")).is_ok());
        assert!(validator.run(json!("2023-12-31T23:30:00Z")).is_err());
    }

    #[test]
    fn bounds_render_in_millis_utc() {
        let err = date().lt(at(2020)).run(json!("2021-01-01T00:00:00Z")).unwrap_err();
        assert_eq!(err.expected(), "a date less than 2020-01-01T00:00:00.000Z");
    }

    #[test]
    fn between_swaps_unordered_bounds() {
        let validator = date().between(at(2025), at(2020), Inclusivity::Closed);
        assert!(validator.run(json!("2022-06-01T00:00:00Z")).is_ok());
        let err = validator.run(json!("2026-01-01T00:00:00Z")).unwrap_err();
        // the bound label is too long for a one-line render
        assert_eq!(
            err.expected(),
            "a date\n    between [2020-01-01T00:00:00.000Z, 2025-01-01T00:00:00.000Z]"
        );
    }

    #[test]
    fn ne_renders_scoped() {
        let err = date().ne(at(2020)).run(json!("2020-01-01T00:00:00Z")).unwrap_err();
        assert_eq!(err.expected(), "a date not equal to 2020-01-01T00:00:00.000Z");
    }
}
