//! Validation issue and result types shared across the workspace.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// A single path-qualified validation finding.
///
/// `path` uses dotted notation with `[i]` for sequence indices, e.g.
/// `classAttributes.warrior.hp` or `progression[2].abilities[0]`. The root of a
/// document is the empty path.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Outcome of validating a document against a [`crate::Spec`].
///
/// Exactly one of the two arms carries a value; warnings may accompany either.
/// `Valid.value` is the sanitized document: unknown fields are stripped (or
/// rejected, depending on [`crate::ValidateOptions`]) and it re-validates
/// cleanly against the same spec.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationResult {
    Valid { value: Value, warnings: Vec<Issue> },
    Invalid { errors: Vec<Issue>, warnings: Vec<Issue> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// All errors found. Empty for a valid result.
    pub fn errors(&self) -> &[Issue] {
        match self {
            Self::Valid { .. } => &[],
            Self::Invalid { errors, .. } => errors,
        }
    }

    /// Non-fatal advisories collected during validation.
    pub fn warnings(&self) -> &[Issue] {
        match self {
            Self::Valid { warnings, .. } | Self::Invalid { warnings, .. } => warnings,
        }
    }

    /// Extracts the sanitized value, or a [`SchemaError`] carrying the full
    /// issue list ("parse-or-throw").
    pub fn into_value(self, spec_name: &str) -> Result<Value, SchemaError> {
        match self {
            Self::Valid { value, .. } => Ok(value),
            Self::Invalid { errors, warnings } => Err(SchemaError {
                spec: spec_name.to_string(),
                errors,
                warnings,
            }),
        }
    }
}

/// Structured validation failure raised by the "parse-or-throw" entry points.
///
/// Carries every issue found in one pass so callers can report all problems at
/// once instead of fixing them one re-run at a time.
#[derive(Clone, Debug, Error)]
#[error("{spec}: validation failed with {} error(s): {}", errors.len(), summarize(errors))]
pub struct SchemaError {
    /// Name of the spec the document was checked against.
    pub spec: String,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

fn summarize(errors: &[Issue]) -> String {
    const MAX_SHOWN: usize = 4;
    let mut parts: Vec<String> = errors.iter().take(MAX_SHOWN).map(Issue::to_string).collect();
    if errors.len() > MAX_SHOWN {
        parts.push(format!("(+{} more)", errors.len() - MAX_SHOWN));
    }
    parts.join("; ")
}
