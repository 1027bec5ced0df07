//! The validation core shared by every call shape.

use coven_schema::{SchemaError, Spec, ValidateOptions, ValidationResult};
use serde_json::Value;

use crate::error::MiddlewareError;
use crate::sanitize::flatten_messages;

/// Instance-level policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct MiddlewareOptions {
    /// Reject unknown fields instead of stripping them.
    pub strict: bool,
    /// Emit a warn-level log line per failure, with path-qualified messages.
    pub log_validation_errors: bool,
    /// Return `Err` on failure instead of an `Invalid` result.
    pub throw_on_error: bool,
}

/// Per-call overrides; unset fields fall back to the instance policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct CallOptions {
    pub throw_on_error: Option<bool>,
}

/// Transport-agnostic wrapper around spec validation.
///
/// One instance carries one failure policy; the request and event guard
/// factories in this crate stamp that policy into closures a transport layer
/// can install. The pre-built constructors cover the common combinations.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationMiddleware {
    options: MiddlewareOptions,
}

pub(crate) fn validate_options(options: &MiddlewareOptions) -> ValidateOptions {
    if options.strict {
        ValidateOptions::strict()
    } else {
        ValidateOptions::default()
    }
}

pub(crate) fn log_failure(spec: &Spec, result: &ValidationResult) {
    tracing::warn!(
        "Validation against {} failed: {}",
        spec.name(),
        flatten_messages(result).join("; ")
    );
}

impl ValidationMiddleware {
    pub fn new(options: MiddlewareOptions) -> Self {
        Self { options }
    }

    /// Failures become `Err` and are logged.
    pub fn fail_loud() -> Self {
        Self::new(MiddlewareOptions {
            log_validation_errors: true,
            throw_on_error: true,
            ..MiddlewareOptions::default()
        })
    }

    /// Failures are logged but returned as `Invalid` results.
    pub fn logged() -> Self {
        Self::new(MiddlewareOptions {
            log_validation_errors: true,
            ..MiddlewareOptions::default()
        })
    }

    /// Failures are returned as `Invalid` results, nothing logged.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn options(&self) -> MiddlewareOptions {
        self.options
    }

    /// Validates `data` against `spec` under this instance's policy.
    ///
    /// `call` overrides the throw policy for this one call. With throwing off
    /// the `Err` arm is unreachable and callers may match on the result alone.
    pub fn validate(
        &self,
        data: &Value,
        spec: &Spec,
        call: Option<CallOptions>,
    ) -> Result<ValidationResult, MiddlewareError> {
        let result = spec.validate_with(data, &validate_options(&self.options));

        if !result.is_valid() && self.options.log_validation_errors {
            log_failure(spec, &result);
        }

        let throw = call
            .and_then(|c| c.throw_on_error)
            .unwrap_or(self.options.throw_on_error);
        if throw {
            if let ValidationResult::Invalid { errors, warnings } = result {
                return Err(SchemaError {
                    spec: spec.name().to_string(),
                    errors,
                    warnings,
                }
                .into());
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use coven_schema::{Schema, field};
    use serde_json::json;

    use super::*;

    fn spec() -> Spec {
        Spec::new(
            "joinRoom",
            Schema::record([field("name", Schema::string().non_empty())]),
        )
    }

    #[test]
    fn silent_instance_returns_invalid_without_throwing() {
        let mw = ValidationMiddleware::silent();
        let result = mw.validate(&json!({"name": ""}), &spec(), None).unwrap();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].path, "name");
    }

    #[test]
    fn fail_loud_instance_throws() {
        let mw = ValidationMiddleware::fail_loud();
        let err = mw.validate(&json!({}), &spec(), None).unwrap_err();
        let MiddlewareError::Validation(err) = err;
        assert_eq!(err.spec, "joinRoom");
    }

    #[test]
    fn call_options_override_the_instance_policy() {
        let mw = ValidationMiddleware::silent();
        let call = CallOptions {
            throw_on_error: Some(true),
        };
        assert!(mw.validate(&json!({}), &spec(), Some(call)).is_err());

        let mw = ValidationMiddleware::fail_loud();
        let call = CallOptions {
            throw_on_error: Some(false),
        };
        let result = mw.validate(&json!({}), &spec(), Some(call)).unwrap();
        assert!(!result.is_valid());
    }

    #[test]
    fn strict_instance_rejects_unknown_fields() {
        let mw = ValidationMiddleware::new(MiddlewareOptions {
            strict: true,
            ..MiddlewareOptions::default()
        });
        let result = mw
            .validate(&json!({"name": "Maeve", "extra": 1}), &spec(), None)
            .unwrap();
        assert!(!result.is_valid());

        // Default policy strips instead.
        let result = ValidationMiddleware::silent()
            .validate(&json!({"name": "Maeve", "extra": 1}), &spec(), None)
            .unwrap();
        let ValidationResult::Valid { value, .. } = result else {
            panic!("expected success");
        };
        assert_eq!(value, json!({"name": "Maeve"}));
    }
}
