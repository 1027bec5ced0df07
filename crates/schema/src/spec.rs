//! Specifications: a schema root plus named refinement invariants.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Issue, SchemaError, ValidationResult};
use crate::schema::Schema;
use crate::validate::{ValidateOptions, check};

/// Whether a failed refinement fails validation or only advises.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A named invariant evaluated on the structurally valid, sanitized value.
///
/// Refinements run only after structural validation succeeds, so predicates
/// can assume the shape promised by the schema. Each carries its own failure
/// message and field path, and they are all evaluated — a failing refinement
/// does not suppress the ones after it.
#[derive(Clone)]
pub struct Refinement {
    name: String,
    path: String,
    message: String,
    severity: Severity,
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Refinement {
    /// Error-severity refinement.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
            predicate: Arc::new(predicate),
        }
    }

    /// Warning-severity refinement: reported but never fails validation.
    pub fn warning(
        name: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::new(name, path, message, predicate)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Evaluates this refinement in isolation, for unit-testing invariants.
    pub fn holds(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

/// A complete specification for one configuration domain.
#[derive(Clone, Debug)]
pub struct Spec {
    name: String,
    root: Schema,
    refinements: Vec<Refinement>,
}

impl Spec {
    pub fn new(name: impl Into<String>, root: Schema) -> Self {
        Self {
            name: name.into(),
            root,
            refinements: Vec::new(),
        }
    }

    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Schema {
        &self.root
    }

    pub fn refinements(&self) -> &[Refinement] {
        &self.refinements
    }

    /// Validates with default options (unknown fields stripped).
    pub fn validate(&self, document: &Value) -> ValidationResult {
        self.validate_with(document, &ValidateOptions::default())
    }

    /// Validates a document: structural pass first (collecting every error),
    /// then all refinements on the sanitized value.
    pub fn validate_with(&self, document: &Value, opts: &ValidateOptions) -> ValidationResult {
        let mut errors = Vec::new();
        let sanitized = check(&self.root, document, "", opts, &mut errors);

        let Some(value) = sanitized else {
            return ValidationResult::Invalid {
                errors,
                warnings: Vec::new(),
            };
        };
        debug_assert!(errors.is_empty());

        let mut warnings = Vec::new();
        for refinement in &self.refinements {
            if !refinement.holds(&value) {
                let issue = Issue::new(refinement.path.clone(), refinement.message.clone());
                match refinement.severity {
                    Severity::Error => errors.push(issue),
                    Severity::Warning => warnings.push(issue),
                }
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid { value, warnings }
        } else {
            ValidationResult::Invalid { errors, warnings }
        }
    }

    /// Parse-or-throw: validate (strip mode), then decode into `T`.
    pub fn parse<T: DeserializeOwned>(&self, document: &Value) -> Result<T, SchemaError> {
        let value = self.validate(document).into_value(&self.name)?;
        serde_json::from_value(value).map_err(|e| SchemaError {
            spec: self.name.clone(),
            errors: vec![Issue::new("", format!("failed to decode validated value: {e}"))],
            warnings: Vec::new(),
        })
    }

    /// Derives a spec where every top-level record field is optional.
    ///
    /// Refinements are dropped: they span fields a partial payload may
    /// legitimately omit. Intended for PATCH-style shape checks.
    pub fn partial(&self) -> Spec {
        Spec::new(format!("{}.partial", self.name), self.root.partial())
    }

    /// Derives a spec where every record field, recursively, is optional.
    pub fn deep_partial(&self) -> Spec {
        Spec::new(format!("{}.deepPartial", self.name), self.root.deep_partial())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::field;

    fn chance_spec() -> Spec {
        let root = Schema::record([
            field("baseChance", Schema::float().min(0.0).max(1.0)),
            field("maxChance", Schema::float().min(0.0).max(1.0)),
        ]);
        Spec::new("chance", root).with_refinement(Refinement::new(
            "max-covers-base",
            "maxChance",
            "must be >= baseChance",
            |v| v["maxChance"].as_f64() >= v["baseChance"].as_f64(),
        ))
    }

    #[test]
    fn refinement_failure_points_at_offending_field() {
        let result = chance_spec().validate(&json!({"baseChance": 0.5, "maxChance": 0.2}));
        let ValidationResult::Invalid { errors, .. } = result else {
            panic!("expected failure");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "maxChance");
    }

    #[test]
    fn refinements_skip_when_structure_is_invalid() {
        // No partial value reaches the refinement when structure fails.
        let result = chance_spec().validate(&json!({"baseChance": "high", "maxChance": 0.2}));
        let ValidationResult::Invalid { errors, .. } = result else {
            panic!("expected failure");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "baseChance");
    }

    #[test]
    fn valid_value_revalidates_unchanged() {
        let spec = chance_spec();
        let first = spec.validate(&json!({"baseChance": 0.1, "maxChance": 0.4, "junk": 1}));
        let ValidationResult::Valid { value, .. } = first else {
            panic!("expected success");
        };
        // Round-trip: sanitized output is stable under re-validation.
        let second = spec.validate(&value);
        let ValidationResult::Valid { value: again, .. } = second else {
            panic!("expected success");
        };
        assert_eq!(value, again);
    }

    #[test]
    fn warning_refinements_do_not_fail_validation() {
        let spec = Spec::new(
            "tags",
            Schema::record([field("tags", Schema::seq(Schema::string()))]),
        )
        .with_refinement(Refinement::warning(
            "has-tags",
            "tags",
            "has zero entries",
            |v| !v["tags"].as_array().is_none_or(Vec::is_empty),
        ));

        let result = spec.validate(&json!({"tags": []}));
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(result.warnings()[0].path, "tags");
    }

    #[test]
    fn parse_decodes_into_typed_value() {
        #[derive(Debug, serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Chance {
            base_chance: f64,
            max_chance: f64,
        }

        let parsed: Chance = chance_spec()
            .parse(&json!({"baseChance": 0.1, "maxChance": 0.4}))
            .expect("valid document");
        assert_eq!(parsed.base_chance, 0.1);
        assert_eq!(parsed.max_chance, 0.4);

        let err = chance_spec()
            .parse::<Chance>(&json!({"baseChance": 0.5, "maxChance": 0.1}))
            .unwrap_err();
        assert_eq!(err.errors.len(), 1);
    }

    #[test]
    fn partial_spec_accepts_sparse_payloads() {
        let patch = chance_spec().partial();
        assert!(patch.validate(&json!({"maxChance": 0.9})).is_valid());
        // Refinements are dropped for partial shapes.
        assert!(patch.validate(&json!({"baseChance": 0.9, "maxChance": 0.1})).is_valid());
    }
}
