//! End-to-end runs through the public surface.

use pretty_assertions::assert_eq;
use regex::Regex;
use serde_json::{json, Value};

use vouch::prelude::*;
use vouch::types::{NumberExt, StringExt};

fn trim_string(x: Value) -> Value {
    match x {
        Value::String(s) => Value::String(s.trim().to_owned()),
        other => other,
    }
}

#[test]
fn a_passing_run_yields_the_transformed_value() {
    let validator = is::string()
        .map(trim_string)
        .field("length", is::number().gt(0.0))
        .matching(Regex::new(r"^\d+$").unwrap());
    assert_eq!(validator.run(json!(" 12 ")).unwrap(), json!("12"));
}

#[test]
fn a_failing_run_reports_the_whole_trace() {
    // the passing where-'length' stage is trimmed out of the report
    let validator = is::string()
        .map(trim_string)
        .field("length", is::number().gt(0.0))
        .matching(Regex::new(r"^\d+$").unwrap());
    let err = validator.run(json!(" 1a ")).unwrap_err();
    assert_eq!(
        err.to_string(),
        r"invalid input, expected input to be a string, map ' 1a ' -> '1a' and matching /^\d+$/"
    );
    // the transformation already happened when the match failed
    assert_eq!(err.actual(), &json!("1a"));
}

#[test]
fn the_tree_format_draws_checkmarks() {
    let validator = is::string()
        .map(trim_string)
        .matching(Regex::new(r"^\d+$").unwrap());
    let err = validator
        .run_with(json!(" 1a "), "input", RunOptions::tree())
        .unwrap_err();
    assert_eq!(
        err.expected(),
        "✔ a string\n├─ ✔ map ' 1a ' -> '1a'\n└─ ✘ matching /^\\d+$/"
    );
    assert!(err.message().ends_with('\n'));
}

#[test]
fn map_can_change_the_value_type() {
    let validator = is::string()
        .matching(Regex::new(r"^\d+$").unwrap())
        .map(|x| match x.as_str().and_then(|s| s.parse::<i64>().ok()) {
            Some(n) => json!(n),
            None => x,
        })
        .then(is::number().gt(0.0));
    assert_eq!(validator.run(json!("123")).unwrap(), json!(123));

    let err = validator.run(json!("12a")).unwrap_err();
    assert_eq!(err.expected(), r"a string matching /^\d+$/");
}

#[test]
fn run_with_names_the_input() {
    let err = is::number()
        .run_with(json!("x"), "age", RunOptions::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid age, expected age to be a number");
}

#[test]
fn or_lists_all_alternatives() {
    let validator = is::string().or(is::number()).or(is::array());
    assert!(validator.run(json!("s")).is_ok());
    assert!(validator.run(json!(1)).is_ok());
    assert!(validator.run(json!([])).is_ok());

    let err = validator.run(json!(true)).unwrap_err();
    assert_eq!(
        err.expected(),
        "either a string, a number or an array"
    );
}

#[test]
fn and_not_negates_the_whole_validator() {
    let validator = is::any()
        .into_validator()
        .and_not(is::number().lt(0.0).into_validator());
    assert!(validator.run(json!(1)).is_ok());
    // non-numbers pass too: the negated validator fails its type check
    assert!(validator.run(json!("x")).is_ok());
    assert!(validator.run(json!(-1)).is_err());
}

#[test]
fn failures_under_a_property_trim_to_that_property() {
    let validator = is::object().field("scores", is::array().every_element(is::number()));
    let err = validator
        .run(json!({"scores": [1, "x"]}))
        .unwrap_err();
    assert_eq!(err.property(), "input.scores[1]");
    assert_eq!(err.expected(), "a number");
    assert_eq!(err.actual(), &json!("x"));
}

#[test]
fn field_transformations_rebuild_the_container() {
    let validator = is::object().field("name", is::string().map(trim_string));
    assert_eq!(
        validator.run(json!({"name": " ada ", "age": 3})).unwrap(),
        json!({"name": "ada", "age": 3})
    );
}

#[test]
fn mapped_sub_results_need_a_container_to_write_into() {
    // checking a scalar's property is fine
    let checking = is::string().field("length", is::number().gt(0.0));
    assert_eq!(checking.run(json!("abc")).unwrap(), json!("abc"));

    // transforming it has nowhere to land, so the run fails
    let doubling = is::string().field(
        "length",
        is::number().map(|x| json!(x.as_i64().unwrap_or(0) * 2)),
    );
    let err = doubling.run(json!("abc")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid input, expected input.length to be writable"
    );
    assert_eq!(err.actual(), &json!(3));
}

#[test]
fn satisfy_names_show_in_the_trace() {
    let validator = is::number().satisfy_named("even", |x| {
        x.as_i64().is_some_and(|n| n % 2 == 0)
    });
    let err = validator.run(json!(3)).unwrap_err();
    assert_eq!(err.expected(), "a number satisfying function even");

    let err = is::number()
        .satisfy(|x| x.as_i64().is_some_and(|n| n % 2 == 0))
        .run(json!(3))
        .unwrap_err();
    assert_eq!(err.expected(), "a number satisfying anonymous function");
}

#[test]
fn label_replaces_the_trace_wholesale() {
    let validator = is::string().not().empty().label("a non-empty string");
    let err = validator.run(json!("")).unwrap_err();
    assert_eq!(err.expected(), "a non-empty string");
}

#[test]
fn validators_are_reusable_across_runs() {
    let validator = is::number().gt(0.0);
    for i in 1..4 {
        assert!(validator.run(json!(i)).is_ok());
    }
    assert!(validator.run(json!(-1)).is_err());
}

#[test]
fn long_traces_fall_back_to_multiple_lines() {
    let validator = is::array().some_element(is::number().one_of(&[0.0, 1.0, 2.0]));
    let err = validator.run(json!([7])).unwrap_err();
    assert_eq!(
        err.expected(),
        "an array\n    where some element is a number in [0, 1, 2]"
    );
}
