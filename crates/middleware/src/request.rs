//! Request-interceptor call shape.
//!
//! Transport-agnostic: [`RequestParts`] is whatever carrier the transport
//! deserializes an inbound request into. A guard validates one part and, on
//! success, replaces it in-place with the sanitized value, so downstream
//! handlers only ever see stripped payloads.

use std::fmt;

use coven_schema::{Spec, ValidationResult};
use serde_json::Value;

use crate::middleware::{ValidationMiddleware, log_failure, validate_options};
use crate::sanitize::flatten_messages;

/// Which part of an inbound request a guard checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestPart {
    Body,
    Params,
    Query,
}

impl fmt::Display for RequestPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Body => "body",
            Self::Params => "params",
            Self::Query => "query",
        })
    }
}

/// The three validatable pieces of an inbound request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestParts {
    pub body: Value,
    pub params: Value,
    pub query: Value,
}

impl RequestParts {
    pub fn part(&self, part: RequestPart) -> &Value {
        match part {
            RequestPart::Body => &self.body,
            RequestPart::Params => &self.params,
            RequestPart::Query => &self.query,
        }
    }

    pub fn part_mut(&mut self, part: RequestPart) -> &mut Value {
        match part {
            RequestPart::Body => &mut self.body,
            RequestPart::Params => &mut self.params,
            RequestPart::Query => &mut self.query,
        }
    }
}

/// Structured short-circuit response; the 400-equivalent.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Rejection {
    pub status: u16,
    pub error: String,
    pub messages: Vec<String>,
}

impl ValidationMiddleware {
    /// Builds a handler that validates `part` against `spec`.
    ///
    /// On success the part is replaced with the validated, stripped value; on
    /// failure the pipeline short-circuits with a [`Rejection`]. The guard
    /// owns everything it needs; it does not borrow the middleware.
    pub fn request_guard(
        &self,
        spec: Spec,
        part: RequestPart,
    ) -> impl Fn(&mut RequestParts) -> Result<(), Rejection> + use<> {
        let options = self.options();
        move |parts| {
            let result = spec.validate_with(parts.part(part), &validate_options(&options));
            match result {
                ValidationResult::Valid { value, .. } => {
                    *parts.part_mut(part) = value;
                    Ok(())
                }
                invalid => {
                    if options.log_validation_errors {
                        log_failure(&spec, &invalid);
                    }
                    Err(Rejection {
                        status: 400,
                        error: format!("invalid request {part} for {}", spec.name()),
                        messages: flatten_messages(&invalid),
                    })
                }
            }
        }
    }
}
