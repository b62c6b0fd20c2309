//! The macro behind the typed validator surface.
//!
//! [`declare_type!`] generates a positive/negated struct pair around one
//! inner [`Validator`](crate::engine::Validator): the positive type carries
//! the full combinator surface and stays typed through `and`/`map`/`chain`,
//! `not` crosses between the two, and both implement
//! [`Restrict`](crate::types::Restrict) so the per-type restriction traits
//! work on either - negating just the restriction, never the whole
//! validator.

macro_rules! declare_type {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident / $negated:ident : $kind:expr;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            inner: $crate::engine::Validator,
        }

        #[doc = concat!(
            "Restriction-negated counterpart of [`", stringify!($name),
            "`]: every restriction applied through it asserts its opposite."
        )]
        #[derive(Debug, Clone)]
        $vis struct $negated {
            inner: $crate::engine::Validator,
        }

        impl $name {
            pub(crate) fn from_validator(inner: $crate::engine::Validator) -> Self {
                Self { inner }
            }

            /// Unwraps into the untyped core validator.
            #[must_use]
            pub fn into_validator(self) -> $crate::engine::Validator {
                self.inner
            }

            /// Sequences another validator; both must pass.
            #[must_use]
            pub fn and(self, other: impl Into<$crate::engine::Validator>) -> Self {
                Self::from_validator(self.inner.and(other.into()))
            }

            /// Alias for `and`, reading better after a `map`.
            #[must_use]
            pub fn then(self, other: impl Into<$crate::engine::Validator>) -> Self {
                self.and(other)
            }

            /// Falls back to `other` when this validator fails. Returns the
            /// untyped core validator since the alternative may accept a
            /// different type.
            #[must_use]
            pub fn or(
                self,
                other: impl Into<$crate::engine::Validator>,
            ) -> $crate::engine::Validator {
                self.inner.or(other.into())
            }

            /// Crosses to the restriction-negated type.
            #[must_use]
            pub fn not(self) -> $negated {
                $negated { inner: self.inner }
            }

            /// Sequences with the inversion of the whole given validator.
            #[must_use]
            pub fn and_not(self, other: impl Into<$crate::engine::Validator>) -> Self {
                Self::from_validator(self.inner.and_not(other.into()))
            }

            /// Transforms the value on success; see
            /// [`Validator::map`](crate::engine::Validator::map).
            #[must_use]
            pub fn map<F>(self, f: F) -> Self
            where
                F: Fn(serde_json::Value) -> serde_json::Value + Send + Sync + 'static,
            {
                Self::from_validator(self.inner.map(f))
            }

            /// Asynchronous [`map`](Self::map); only
            /// [`run_async`](Self::run_async) can drive it.
            #[must_use]
            pub fn map_async<F, Fut>(self, f: F) -> Self
            where
                F: Fn(serde_json::Value) -> Fut + Send + Sync + 'static,
                Fut: ::std::future::Future<Output = serde_json::Value> + Send + 'static,
            {
                Self::from_validator(self.inner.map_async(f))
            }

            /// Monadic bind on the yielded value.
            #[must_use]
            pub fn chain<F>(self, f: F) -> Self
            where
                F: Fn(&serde_json::Value) -> $crate::engine::Validator + Send + Sync + 'static,
            {
                Self::from_validator(self.inner.chain(f))
            }

            /// Requires `pred` to hold for the current value.
            #[must_use]
            pub fn satisfy<F>(self, pred: F) -> Self
            where
                F: Fn(&serde_json::Value) -> bool + Send + Sync + 'static,
            {
                Self::from_validator(self.inner.and(
                    $crate::engine::Validator::check(pred)
                        .label_kind("satisfying anonymous function", Some($kind)),
                ))
            }

            /// Like [`satisfy`](Self::satisfy) with a predicate name for
            /// the error trace.
            #[must_use]
            pub fn satisfy_named<F>(self, pred_name: &str, pred: F) -> Self
            where
                F: Fn(&serde_json::Value) -> bool + Send + Sync + 'static,
            {
                Self::from_validator(self.inner.and(
                    $crate::engine::Validator::check(pred).label_kind(
                        format!("satisfying function {pred_name}"),
                        Some($kind),
                    ),
                ))
            }

            /// Replaces the accumulated expectation with `msg`.
            #[must_use]
            pub fn label(self, msg: impl Into<String>) -> Self {
                Self::from_validator(self.inner.label_kind(msg, Some($kind)))
            }

            /// Validates a sub-property, writing a transformed result back
            /// into the container; see
            /// [`Validator::field`](crate::engine::Validator::field).
            #[must_use]
            pub fn field(
                self,
                accessor: impl Into<$crate::path::Accessor>,
                validator: impl Into<$crate::engine::Validator>,
            ) -> Self {
                Self::from_validator(self.inner.field(accessor, validator.into()))
            }

            /// Runs against `input`; see
            /// [`Validator::run`](crate::engine::Validator::run).
            pub fn run(
                &self,
                input: impl Into<serde_json::Value>,
            ) -> Result<serde_json::Value, $crate::engine::ValidationError> {
                self.inner.run(input)
            }

            /// Runs with an explicit run name and options.
            pub fn run_with(
                &self,
                input: impl Into<serde_json::Value>,
                name: &str,
                options: $crate::engine::RunOptions,
            ) -> Result<serde_json::Value, $crate::engine::ValidationError> {
                self.inner.run_with(input, name, options)
            }

            /// Async [`run`](Self::run).
            pub async fn run_async(
                &self,
                input: impl Into<serde_json::Value>,
            ) -> Result<serde_json::Value, $crate::engine::ValidationError> {
                self.inner.run_async(input).await
            }

            /// Async [`run_with`](Self::run_with).
            pub async fn run_async_with(
                &self,
                input: impl Into<serde_json::Value>,
                name: &str,
                options: $crate::engine::RunOptions,
            ) -> Result<serde_json::Value, $crate::engine::ValidationError> {
                self.inner.run_async_with(input, name, options).await
            }
        }

        impl $negated {
            /// Crosses back to the positive type.
            #[must_use]
            pub fn not(self) -> $name {
                $name { inner: self.inner }
            }
        }

        impl From<$name> for $crate::engine::Validator {
            fn from(validator: $name) -> Self {
                validator.inner
            }
        }

        impl From<$negated> for $crate::engine::Validator {
            fn from(validator: $negated) -> Self {
                validator.inner
            }
        }

        impl $crate::types::Restrict for $name {
            type Target = $name;

            fn kind(&self) -> $crate::tree::Kind {
                $kind
            }

            fn restrict(self, validator: $crate::engine::Validator) -> $name {
                $name::from_validator(self.inner.and(validator))
            }

            fn restrict_not(self, validator: $crate::engine::Validator) -> $name {
                $name::from_validator(self.inner.and_not(validator))
            }
        }

        impl $crate::types::Restrict for $negated {
            type Target = $name;

            fn kind(&self) -> $crate::tree::Kind {
                $kind.negate()
            }

            fn restrict(self, validator: $crate::engine::Validator) -> $name {
                $name::from_validator(self.inner.and_not(validator))
            }

            fn restrict_not(self, validator: $crate::engine::Validator) -> $name {
                $name::from_validator(self.inner.and(validator))
            }
        }
    };
}

pub(crate) use declare_type;
