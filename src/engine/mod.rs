//! The validation engine - a monadic combinator core over JSON values.
//!
//! A [`Validator`] wraps a single attempt function from state to a two-arm
//! [`Outcome`]: pass with a yielded value, or fail with the expectation
//! tree documenting why. Every combinator composes attempt functions;
//! nothing runs until [`Validator::run`] or [`Validator::run_async`] seeds
//! a fresh state. Validators are cheap to clone, reusable, and safe to run
//! concurrently since each run owns its state.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vouch::is;
//!
//! let v = is::string().map(|s| s.trim().into());
//! let trimmed = v.run("  hi  ")?;
//! ```

mod error;
pub(crate) mod quantify;
mod state;

pub use error::{Format, RunOptions, ValidationError};
pub(crate) use state::{Outcome, State};

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::path::{self, Accessor};
use crate::show;
use crate::tree::{Kind, Node};

type AttemptFn = dyn Fn(State) -> BoxFuture<'static, Outcome> + Send + Sync;

/// A composable validator over [`serde_json::Value`].
///
/// Built once and reusable; cloning is an `Arc` bump. Combinator methods
/// consume `self` and return a new validator.
#[derive(Clone)]
pub struct Validator {
    attempt: Arc<AttemptFn>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

impl Validator {
    pub(crate) fn from_fn<F>(f: F) -> Self
    where
        F: Fn(State) -> BoxFuture<'static, Outcome> + Send + Sync + 'static,
    {
        Self {
            attempt: Arc::new(f),
        }
    }

    pub(crate) fn attempt(&self, state: State) -> BoxFuture<'static, Outcome> {
        (self.attempt)(state)
    }

    // ========================================================================
    // PRIMITIVES
    // ========================================================================

    /// A validator that always succeeds yielding `value` and marks the run
    /// as transformed. Templates use this to emit their projection.
    #[must_use]
    pub fn of(value: Value) -> Self {
        Self::from_fn(move |state| {
            let value = value.clone();
            async move {
                Outcome::Pass(
                    value.clone(),
                    State {
                        value,
                        path: state.path,
                        expected: state.expected,
                        mapped: true,
                        is_async: state.is_async,
                    },
                )
            }
            .boxed()
        })
    }

    /// Always succeeds yielding `value`, leaving the state untouched.
    pub(crate) fn emit(value: Value) -> Self {
        Self::from_fn(move |state| {
            let value = value.clone();
            async move { Outcome::Pass(value, state) }.boxed()
        })
    }

    /// Always succeeds yielding `value` and sets the transformed flag, but
    /// leaves the threaded value alone so later sub-property lookups still
    /// see the original input.
    pub(crate) fn emit_mapped(value: Value) -> Self {
        Self::from_fn(move |state| {
            let value = value.clone();
            async move {
                Outcome::Pass(
                    value,
                    State {
                        mapped: true,
                        ..state
                    },
                )
            }
            .boxed()
        })
    }

    /// A bare predicate check with no expectation label of its own.
    pub(crate) fn check<F>(pred: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let pred = Arc::new(pred);
        Self::from_fn(move |state| {
            let pred = Arc::clone(&pred);
            async move {
                if pred(&state.value) {
                    let value = state.value.clone();
                    Outcome::Pass(value, state)
                } else {
                    Outcome::Fail(state)
                }
            }
            .boxed()
        })
    }

    /// Succeeds when `pred` holds for the current value; reports as
    /// `satisfying anonymous function`.
    #[must_use]
    pub fn satisfy<F>(pred: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::check(pred).label("satisfying anonymous function")
    }

    /// Like [`Validator::satisfy`], reporting as `satisfying function
    /// <name>`.
    #[must_use]
    pub fn satisfy_named<F>(name: &str, pred: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::check(pred).label(format!("satisfying function {name}"))
    }

    // ========================================================================
    // COMBINATORS
    // ========================================================================

    /// On success applies `f` to the yielded value, records a
    /// `map <old> -> <new>` expectation, and yields the transformed value.
    ///
    /// Panics inside `f` are the caller's: they are not caught.
    #[must_use]
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::from_fn(move |state| {
            let prev = self.clone();
            let f = Arc::clone(&f);
            async move {
                match prev.attempt(state).await {
                    Outcome::Pass(x, st) => {
                        let before = show::describe(&x);
                        let y = f(x);
                        let leaf = Node::leaf(
                            format!("map {before} -> {}", show::describe(&y)),
                            true,
                            st.path.clone(),
                            None,
                        );
                        Outcome::Pass(
                            y.clone(),
                            State {
                                value: y,
                                path: st.path,
                                expected: st.expected.and(leaf),
                                mapped: true,
                                is_async: st.is_async,
                            },
                        )
                    }
                    fail @ Outcome::Fail(_) => fail,
                }
            }
            .boxed()
        })
    }

    /// Like [`Validator::map`] with an asynchronous transformation.
    ///
    /// The future is awaited only under [`Validator::run_async`]; a
    /// synchronous [`Validator::run`] fails the attempt with a
    /// `mapped asynchronously (requires run_async)` expectation instead of
    /// suspending.
    #[must_use]
    pub fn map_async<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        let f = Arc::new(f);
        Self::from_fn(move |state| {
            let prev = self.clone();
            let f = Arc::clone(&f);
            async move {
                match prev.attempt(state).await {
                    Outcome::Pass(x, st) => {
                        if !st.is_async {
                            let leaf = Node::leaf(
                                "mapped asynchronously (requires run_async)",
                                false,
                                st.path.clone(),
                                None,
                            );
                            return Outcome::Fail(State {
                                value: st.value,
                                path: st.path,
                                expected: st.expected.and(leaf),
                                mapped: st.mapped,
                                is_async: st.is_async,
                            });
                        }
                        let before = show::describe(&x);
                        let y = f(x).await;
                        let leaf = Node::leaf(
                            format!("map {before} -> {}", show::describe(&y)),
                            true,
                            st.path.clone(),
                            None,
                        );
                        Outcome::Pass(
                            y.clone(),
                            State {
                                value: y,
                                path: st.path,
                                expected: st.expected.and(leaf),
                                mapped: true,
                                is_async: st.is_async,
                            },
                        )
                    }
                    fail @ Outcome::Fail(_) => fail,
                }
            }
            .boxed()
        })
    }

    /// Monadic bind: on success feeds the yielded value to `f` and runs
    /// the returned validator. Expectation trees of the two stages merge
    /// with `and` (skipped when the second stage left the tree untouched);
    /// the transformed flags merge with or.
    #[must_use]
    pub fn chain<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> Validator + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::from_fn(move |state| {
            let prev = self.clone();
            let f = Arc::clone(&f);
            async move {
                match prev.attempt(state).await {
                    Outcome::Pass(x, st) => {
                        let inner = f(&x);
                        let before_expected = st.expected.clone();
                        let before_mapped = st.mapped;
                        let merge = move |st2: State| {
                            if st2.expected == before_expected {
                                st2
                            } else {
                                State {
                                    value: st2.value,
                                    path: st2.path,
                                    expected: before_expected.and(st2.expected),
                                    mapped: before_mapped || st2.mapped,
                                    is_async: st2.is_async,
                                }
                            }
                        };
                        match inner.attempt(st).await {
                            Outcome::Pass(y, st2) => Outcome::Pass(y, merge(st2)),
                            Outcome::Fail(st2) => Outcome::Fail(merge(st2)),
                        }
                    }
                    fail @ Outcome::Fail(_) => fail,
                }
            }
            .boxed()
        })
    }

    /// Sequences two validators; both must pass.
    #[must_use]
    pub fn and(self, other: impl Into<Validator>) -> Self {
        let other = other.into();
        self.chain(move |_| other.clone())
    }

    /// Alias for [`Validator::and`] reading better after a `map`.
    #[must_use]
    pub fn then(self, other: impl Into<Validator>) -> Self {
        self.and(other)
    }

    /// Tries `self` first; on failure retries `other` against the original
    /// pre-attempt state. Both expectation trees merge with `or` when the
    /// second arm decides the outcome.
    #[must_use]
    pub fn or(self, other: impl Into<Validator>) -> Self {
        let other = other.into();
        Self::from_fn(move |state| {
            let prev = self.clone();
            let other = other.clone();
            async move {
                let original = state.clone();
                match prev.attempt(state).await {
                    pass @ Outcome::Pass(..) => pass,
                    Outcome::Fail(st1) => {
                        let first_expected = st1.expected;
                        match other.attempt(original).await {
                            Outcome::Pass(x, st2) => Outcome::Pass(
                                x,
                                State {
                                    value: st2.value,
                                    path: st2.path,
                                    expected: first_expected.or(st2.expected),
                                    mapped: st2.mapped,
                                    is_async: st2.is_async,
                                },
                            ),
                            Outcome::Fail(st2) => Outcome::Fail(State {
                                value: st2.value,
                                path: st2.path,
                                expected: first_expected.or(st2.expected),
                                mapped: st2.mapped,
                                is_async: st2.is_async,
                            }),
                        }
                    }
                }
            }
            .boxed()
        })
    }

    /// Inverts a whole validator: succeeds when it fails and vice versa,
    /// negating the expectation tree it produced.
    #[must_use]
    pub fn not(validator: impl Into<Validator>) -> Self {
        let validator = validator.into();
        Self::from_fn(move |state| {
            let v = validator.clone();
            async move {
                match v.attempt(state).await {
                    Outcome::Pass(_, st) => Outcome::Fail(State {
                        value: st.value,
                        path: st.path,
                        expected: st.expected.not(),
                        mapped: st.mapped,
                        is_async: st.is_async,
                    }),
                    Outcome::Fail(st) => {
                        let value = st.value.clone();
                        Outcome::Pass(
                            value,
                            State {
                                value: st.value,
                                path: st.path,
                                expected: st.expected.not(),
                                mapped: st.mapped,
                                is_async: st.is_async,
                            },
                        )
                    }
                }
            }
            .boxed()
        })
    }

    /// Sequences `self` with the inversion of `validator`. This negates
    /// the whole given validator, unlike the restriction-scoped `.not()`
    /// on typed validators.
    #[must_use]
    pub fn and_not(self, validator: impl Into<Validator>) -> Self {
        self.and(Validator::not(validator))
    }

    /// Validates the sub-property at `accessor` in isolation: the inner
    /// validator sees the sub-value at the extended path with a fresh
    /// expectation tree. Yields the validated sub-value; the outer value
    /// and path are restored, and the sub-tree comes back under a
    /// `where <property> is` heading.
    #[must_use]
    pub fn at(accessor: impl Into<Accessor>, validator: impl Into<Validator>) -> Self {
        let accessor = accessor.into();
        let validator = validator.into();
        Self::from_fn(move |state| {
            let accessor = accessor.clone();
            let v = validator.clone();
            async move {
                let heading = format!("where {} is", shown_property(&accessor));
                let sub_value = path::resolve(&state.value, &accessor);
                let sub_path = state.path.child(accessor);
                let sub = State {
                    value: sub_value,
                    path: sub_path.clone(),
                    expected: Node::empty(sub_path),
                    mapped: false,
                    is_async: state.is_async,
                };
                match v.attempt(sub).await {
                    Outcome::Pass(x, ist) => Outcome::Pass(
                        x,
                        State {
                            value: state.value,
                            path: state.path,
                            expected: ist.expected.prefix(&heading),
                            mapped: ist.mapped,
                            is_async: state.is_async,
                        },
                    ),
                    Outcome::Fail(ist) => Outcome::Fail(State {
                        value: state.value,
                        path: state.path,
                        expected: ist.expected.prefix(&heading),
                        mapped: ist.mapped,
                        is_async: state.is_async,
                    }),
                }
            }
            .boxed()
        })
    }

    /// Sequenced form of [`Validator::at`] with write-back: when the inner
    /// validator transformed the sub-value, the outer container is cloned
    /// with that one entry replaced.
    ///
    /// Write-back covers arrays and objects only. Any other outer value
    /// (say, a string whose `length` was validated) has nowhere to store
    /// a transformed sub-value, so a mapped result fails the run; an
    /// inner validator that merely checks passes through unchanged.
    #[must_use]
    pub fn field(self, accessor: impl Into<Accessor>, validator: impl Into<Validator>) -> Self {
        let accessor = accessor.into();
        let at = Validator::at(accessor.clone(), validator);
        self.and(Self::from_fn(move |state| {
            let at = at.clone();
            let accessor = accessor.clone();
            async move {
                match at.attempt(state).await {
                    Outcome::Pass(x, st) => {
                        if !st.mapped {
                            let value = st.value.clone();
                            return Outcome::Pass(value, st);
                        }
                        if writable(&st.value, &accessor) {
                            let value = write_back(st.value, &accessor, x);
                            Outcome::Pass(
                                value.clone(),
                                State {
                                    value,
                                    path: st.path,
                                    expected: st.expected,
                                    mapped: st.mapped,
                                    is_async: st.is_async,
                                },
                            )
                        } else {
                            let leaf = Node::leaf(
                                "writable",
                                false,
                                st.path.child(accessor.clone()),
                                None,
                            );
                            Outcome::Fail(State {
                                value: st.value,
                                path: st.path,
                                expected: st.expected.and(leaf),
                                mapped: st.mapped,
                                is_async: st.is_async,
                            })
                        }
                    }
                    fail @ Outcome::Fail(_) => fail,
                }
            }
            .boxed()
        }))
    }

    /// Replaces whatever expectation tree has accumulated with a single
    /// leaf reading `msg`, on both arms.
    #[must_use]
    pub fn label(self, msg: impl Into<String>) -> Self {
        self.label_kind(msg, None)
    }

    pub(crate) fn label_kind(self, msg: impl Into<String>, kind: Option<Kind>) -> Self {
        let msg: Arc<str> = Arc::from(msg.into());
        Self::from_fn(move |state| {
            let prev = self.clone();
            let msg = Arc::clone(&msg);
            async move {
                match prev.attempt(state).await {
                    Outcome::Pass(x, st) => {
                        let leaf = Node::leaf(msg.as_ref(), true, st.path.clone(), kind);
                        Outcome::Pass(
                            x,
                            State {
                                value: st.value,
                                path: st.path,
                                expected: leaf,
                                mapped: st.mapped,
                                is_async: st.is_async,
                            },
                        )
                    }
                    Outcome::Fail(st) => {
                        let leaf = Node::leaf(msg.as_ref(), false, st.path.clone(), kind);
                        Outcome::Fail(State {
                            value: st.value,
                            path: st.path,
                            expected: leaf,
                            mapped: st.mapped,
                            is_async: st.is_async,
                        })
                    }
                }
            }
            .boxed()
        })
    }

    // ========================================================================
    // EXECUTION
    // ========================================================================

    /// Runs the validator against `input`, named `input` in error output.
    /// Returns the (possibly transformed) value.
    pub fn run(&self, input: impl Into<Value>) -> Result<Value, ValidationError> {
        self.run_with(input, "input", RunOptions::default())
    }

    /// Runs the validator with an explicit run name and options.
    pub fn run_with(
        &self,
        input: impl Into<Value>,
        name: &str,
        options: RunOptions,
    ) -> Result<Value, ValidationError> {
        let state = State::root(input.into(), name, false);
        match self.attempt(state).now_or_never() {
            Some(Outcome::Pass(value, _)) => Ok(value),
            Some(Outcome::Fail(state)) => Err(ValidationError::from_failure(&state, options)),
            // map_async is the only suspension point and it fails fast in
            // synchronous mode
            None => unreachable!("synchronous validation suspended"),
        }
    }

    /// Async version of [`Validator::run`], awaiting any `map_async`
    /// transformations.
    pub async fn run_async(&self, input: impl Into<Value>) -> Result<Value, ValidationError> {
        self.run_async_with(input, "input", RunOptions::default())
            .await
    }

    /// Async version of [`Validator::run_with`].
    pub async fn run_async_with(
        &self,
        input: impl Into<Value>,
        name: &str,
        options: RunOptions,
    ) -> Result<Value, ValidationError> {
        let state = State::root(input.into(), name, true);
        match self.attempt(state).await {
            Outcome::Pass(value, _) => Ok(value),
            Outcome::Fail(state) => Err(ValidationError::from_failure(&state, options)),
        }
    }
}

/// How a property reads inside a `where ... is` heading: string keys
/// quoted, indices bare.
fn shown_property(accessor: &Accessor) -> String {
    match accessor {
        Accessor::Key(key) => show::string(key, 80),
        Accessor::Index(i) => i.to_string(),
        Accessor::Dynamic => "*".to_owned(),
    }
}

fn writable(container: &Value, accessor: &Accessor) -> bool {
    matches!(
        (container, accessor),
        (Value::Array(_), Accessor::Index(_))
            | (Value::Object(_), Accessor::Key(_) | Accessor::Index(_))
    )
}

fn write_back(container: Value, accessor: &Accessor, item: Value) -> Value {
    match (container, accessor) {
        (Value::Array(mut items), Accessor::Index(i)) => {
            if *i >= items.len() {
                items.resize(*i + 1, Value::Null);
            }
            items[*i] = item;
            Value::Array(items)
        }
        (Value::Object(mut map), Accessor::Key(key)) => {
            map.insert(key.clone(), item);
            Value::Object(map)
        }
        (Value::Object(mut map), Accessor::Index(i)) => {
            map.insert(i.to_string(), item);
            Value::Object(map)
        }
        (other, _) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn of_yields_and_marks_transformed() {
        let v = Validator::satisfy(|_| true).chain(|_| Validator::of(json!(42)));
        assert_eq!(v.run(json!("anything")).unwrap(), json!(42));
    }

    #[test]
    fn or_retries_from_the_original_state() {
        let v = Validator::satisfy(Value::is_string)
            .map(|_| json!("mapped"))
            .or(Validator::satisfy(Value::is_number));
        // the first arm maps, but the second arm must still see the raw input
        assert_eq!(v.run(json!(7)).unwrap(), json!(7));
    }

    #[test]
    fn not_inverts_an_outcome() {
        let v = Validator::not(Validator::satisfy(Value::is_string));
        assert!(v.run(json!(1)).is_ok());
        assert!(v.run(json!("s")).is_err());
    }

    #[test]
    fn field_without_transform_keeps_the_container() {
        let v = Validator::satisfy(Value::is_object)
            .field("x", Validator::satisfy(Value::is_number));
        assert_eq!(v.run(json!({"x": 1})).unwrap(), json!({"x": 1}));
    }

    #[test]
    fn field_with_transform_writes_back() {
        let v = Validator::satisfy(Value::is_object).field(
            "x",
            Validator::satisfy(Value::is_number).map(|x| json!(x.as_i64().unwrap_or(0) + 1)),
        );
        assert_eq!(v.run(json!({"x": 1, "y": 2})).unwrap(), json!({"x": 2, "y": 2}));
    }

    #[test]
    fn field_on_a_scalar_drops_the_write_back() {
        let v = Validator::satisfy(Value::is_string)
            .field("length", Validator::satisfy(Value::is_number).map(|_| json!(0)));
        assert_eq!(v.run(json!("abc")).unwrap(), json!("abc"));
    }

    #[test]
    fn label_replaces_the_accumulated_tree() {
        let v = Validator::satisfy(Value::is_string)
            .and(Validator::satisfy(|x| !x.as_str().unwrap_or("").is_empty()))
            .label("a non-empty string");
        let err = v.run(json!(1)).unwrap_err();
        assert_eq!(err.expected(), "a non-empty string");
    }
}
