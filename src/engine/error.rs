//! The public validation error and run options.

use serde_json::Value;
use thiserror::Error;

use crate::engine::State;
use crate::path::{self, Path};

/// How a failed run renders its expectation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Prose, on one line when it fits.
    #[default]
    Text,
    /// Checkmarked tree with box-drawing connectors.
    Tree,
}

/// Options for a validator run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Trace rendering for error output.
    pub format: Format,
}

impl RunOptions {
    /// Options rendering the trace as a checkmarked tree.
    #[must_use]
    pub fn tree() -> Self {
        Self {
            format: Format::Tree,
        }
    }
}

/// A failed validation: where the failure happened, what was expected
/// there, and what was actually found.
///
/// The message reads `invalid <name>, expected <property> to be <trace>`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    path: Path,
    property: String,
    expected: String,
    actual: Value,
}

impl ValidationError {
    pub(crate) fn from_failure(state: &State, options: RunOptions) -> Self {
        let trimmed = state.expected.clone().trim();
        let path = trimmed.path().clone();
        let property = path.property();

        let trace = match options.format {
            Format::Text => trimmed.render_text(),
            Format::Tree => trimmed.render_tree(),
        };

        let mut message = format!(
            "invalid {}, expected {property} to be {trace}",
            path.name()
        );
        if trace.contains('\n') {
            message.push('\n');
        }

        let actual = path.segments()[1..]
            .iter()
            .fold(state.value.clone(), |value, accessor| {
                path::resolve(&value, accessor)
            });

        Self {
            message,
            path,
            property,
            expected: trace,
            actual,
        }
    }

    /// The trimmed path of the failing expectation.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The failing location rendered as a property trace, e.g.
    /// `input.user[0]`.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The rendered expectation trace.
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// The value actually found at the failing location. Resolved from
    /// the run's working value, so earlier transformations show through.
    #[must_use]
    pub fn actual(&self) -> &Value {
        &self.actual
    }

    /// The full error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
