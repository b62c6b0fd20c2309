//! Threaded validation state and the two-arm attempt outcome.

use serde_json::Value;

use crate::path::Path;
use crate::tree::Node;

/// Everything a validator threads through an attempt. Immutable by
/// replacement: combinators build a new state rather than mutating.
#[derive(Debug, Clone)]
pub(crate) struct State {
    /// The value currently under validation.
    pub value: Value,
    /// Where in the input that value lives.
    pub path: Path,
    /// The expectation tree accumulated so far.
    pub expected: Node,
    /// Whether any transformation has been applied on this branch.
    pub mapped: bool,
    /// Whether asynchronous transformations are allowed to suspend.
    pub is_async: bool,
}

impl State {
    /// Seeds the state for a fresh run.
    pub fn root(value: Value, name: &str, is_async: bool) -> Self {
        let path = Path::root(name);
        Self {
            value,
            expected: Node::empty(path.clone()),
            path,
            mapped: false,
            is_async,
        }
    }
}

/// Result of one attempt: the success arm carries the yielded value next to
/// the state, the failure arm carries the state whose expectation tree
/// documents what went wrong.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// The validator accepted; the `Value` is what it yielded.
    Pass(Value, State),
    /// The validator rejected.
    Fail(State),
}
